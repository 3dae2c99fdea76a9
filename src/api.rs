//! Wire types and HTTP client for the listing service.
//!
//! The service exposes a single endpoint:
//! `GET /api/files?path=<urlencoded>&sort=<asc|desc>` returning a JSON array
//! of [`DirectoryEntry`]. The server's ordering is authoritative; the client
//! never re-sorts.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Sort order for listing requests. Wire values are `asc` / `desc`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// The wire/query-string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

}

/// One file-system child reported by the listing service.
///
/// `path` is absolute and server-normalized; `size` is bytes, with a
/// directory's size meaning whatever the server decided (recursive sum here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
    pub size: u64,
    pub is_dir: bool,
}

/// HTTP client for the listing service.
///
/// Cheap to clone; clones share the underlying connection pool, so spawned
/// fetch tasks can each take their own copy.
#[derive(Debug, Clone)]
pub struct ListingClient {
    http: reqwest::Client,
    base: reqwest::Url,
}

impl ListingClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = reqwest::Url::parse(base_url)
            .map_err(|e| AppError::ServerUrl(format!("{base_url}: {e}")))?;
        // A trailing slash makes the relative join below keep any path
        // prefix in the base URL (http://host/files -> /files/api/files).
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// The listing endpoint, resolved against the base URL.
    fn endpoint(&self) -> Result<reqwest::Url> {
        self.base
            .join("api/files")
            .map_err(|e| AppError::ServerUrl(e.to_string()))
    }

    /// Fetch the children of `path` in the given order.
    ///
    /// A non-2xx status or an undecodable body is an error; the caller is
    /// expected to log it and keep whatever listing is already displayed.
    pub async fn fetch(&self, path: &str, order: SortOrder) -> Result<Vec<DirectoryEntry>> {
        let response = self
            .http
            .get(self.endpoint()?)
            .query(&[("path", path), ("sort", order.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Listing(format!(
                "server returned {}",
                response.status()
            )));
        }
        Ok(response.json::<Vec<DirectoryEntry>>().await?)
    }
}
