use anyhow::{bail, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use alted_api::ApiClient;
use alted_core::AltedConfig;

/// alted — terminal editor for media attachment alt text.
///
/// Fetches media attachments from a Mastodon-compatible server, shows which
/// ones are missing accessibility captions, and lets you edit each caption in
/// a dialog with an inline preview of the media.
#[derive(Parser, Debug)]
#[command(name = "alted", version, about)]
struct Cli {
    /// Media attachment IDs to load.
    #[arg(required = true)]
    media_ids: Vec<String>,

    /// Server base URL (overrides the config file).
    #[arg(long)]
    instance: Option<String>,

    /// Access token with write:media scope (overrides the config file).
    #[arg(long)]
    token: Option<String>,

    /// Skip fetching and rendering media previews.
    #[arg(long)]
    no_previews: bool,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging.
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Log to a file to avoid corrupting the TUI output. If the log file
    // can't be opened, silently discard logs rather than polluting the
    // alternate screen buffer.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("alted");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("alted.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            // Fallback: discard all logs to avoid TUI corruption.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }

    // Load config and apply CLI overrides.
    let mut config = AltedConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
        AltedConfig::default()
    });
    if let Some(instance) = cli.instance {
        config.instance.base_url = instance;
    }
    if let Some(token) = cli.token {
        config.instance.access_token = token;
    }
    if cli.no_previews {
        config.ui.show_previews = false;
    }

    if config.instance.base_url.is_empty() {
        bail!(
            "No server configured. Pass --instance or set instance.base_url in {}",
            AltedConfig::config_path()?.display()
        );
    }
    if config.instance.access_token.is_empty() {
        bail!(
            "No access token configured. Pass --token or set instance.access_token in {}",
            AltedConfig::config_path()?.display()
        );
    }

    tracing::info!("Starting alted v{}", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(ApiClient::new(
        config.instance.base_url.clone(),
        config.instance.access_token.clone(),
    ));

    let mut app = alted_tui::App::new(client, cli.media_ids, config);
    app.run().await?;

    tracing::info!("alted exited cleanly");
    Ok(())
}
