use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors (log file, listener socket, directory scans).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user or CLI.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Transport-level failure talking to the listing service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The listing service answered, but not with a usable listing.
    #[error("Listing service error: {0}")]
    Listing(String),

    /// The configured server URL could not be parsed.
    #[error("Invalid server URL: {0}")]
    ServerUrl(String),
}
