mod api;
mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod history;
mod navigator;
mod server;
mod theme;
mod tui;
mod ui;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::api::ListingClient;
use crate::app::App;
use crate::config::{AppConfig, GeneralConfig};
use crate::event::{Event, EventHandler};
use crate::tui::Tui;

/// Browse a remote file-listing service from the terminal.
#[derive(Parser, Debug)]
#[command(name = "rfs", version, about)]
struct Cli {
    /// Path to a config file (overrides the default lookup chain)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse a listing service (the default)
    Browse(BrowseArgs),
    /// Run the listing service over a local directory
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct BrowseArgs {
    /// Listing service base URL
    #[arg(long)]
    url: Option<String>,

    /// Starting path on the server (as if opened via `?path=...`)
    #[arg(long)]
    path: Option<String>,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Log file (the terminal is busy; defaults to the state directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Directory to serve listings from
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Commands::Browse(BrowseArgs::default())) {
        Commands::Serve(args) => {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::INFO)
                .init();
            server::run(args.root, args.bind).await
        }
        Commands::Browse(args) => browse(cli.config.as_deref(), args).await,
    }
}

async fn browse(config_path: Option<&Path>, args: BrowseArgs) -> error::Result<()> {
    let overrides = AppConfig {
        general: GeneralConfig {
            server_url: args.url.clone(),
            default_root: None,
            mouse: if args.no_mouse { Some(false) } else { None },
        },
        ..Default::default()
    };
    let config = AppConfig::load(config_path, Some(&overrides));

    init_browse_logging(args.log_file)?;

    // A bad server URL is a startup error, not something to limp past.
    let client = ListingClient::new(config.server_url())?;

    let initial_query = match args.path.as_deref() {
        Some(path) => navigator::nav_query(path),
        None => String::new(),
    };

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let mut app = App::new(
        client,
        &initial_query,
        config.default_root().to_string(),
        events.sender(),
        config.type_labels(),
        theme::resolve_theme(&config.theme),
    );

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::Listing(update) => app.handle_listing(update),
        }

        if app.should_quit {
            break;
        }
    }

    // Terminal restoration happens when `tui` drops.
    drop(tui);
    Ok(())
}

/// Route tracing output to a file while the TUI owns the terminal.
fn init_browse_logging(log_file: Option<PathBuf>) -> error::Result<()> {
    let path = match log_file {
        Some(path) => path,
        None => {
            let dir = dirs::state_dir()
                .or_else(dirs::cache_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join("rfs");
            std::fs::create_dir_all(&dir)?;
            dir.join("rfs.log")
        }
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
