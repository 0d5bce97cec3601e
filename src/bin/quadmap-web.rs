//! Quadmap Web Server Binary
//!
//! Starts the control plane: upload mapping files, choose one and push
//! its rendering to the display.
//!
//! # Usage
//!
//! ```bash
//! # Start with the configured host and port (0.0.0.0:8080 by default)
//! quadmap-web
//!
//! # Override port and sources directory
//! quadmap-web --port 9000 --sources ~/quadstick
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quadmap::config::Config;
use quadmap::web;

/// Quadmap Web Server - control plane for the mapping display
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (defaults to the configured port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (defaults to the configured host)
    #[arg(long)]
    host: Option<String>,

    /// Directory containing mapping CSV files.
    /// Defaults to the platform-specific sources directory:
    /// - Linux: ~/.config/Quadmap/sources/
    /// - macOS: ~/Library/Application Support/Quadmap/sources/
    /// - Windows: %APPDATA%\Quadmap\sources\
    #[arg(short, long)]
    sources: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(sources) = args.sources {
        config.paths.sources_dir = sources;
    }

    let sources_dir = &config.paths.sources_dir;
    std::fs::create_dir_all(sources_dir).context(format!(
        "Failed to create sources directory: {}",
        sources_dir.display()
    ))?;
    info!("Sources directory: {}", sources_dir.display());

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    web::run_server(config, addr).await
}
