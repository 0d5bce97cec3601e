//! Quadmap - Quadstick mapping renderer
//!
//! Renders a Quadstick CSV export to a dual-colour e-paper frame, or
//! inspects how the export is interpreted.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quadmap::cli::{CodesArgs, InspectArgs, ListArgs, RenderArgs};
use quadmap::config::Config;

/// Quadmap - Quadstick mapping renderer for e-paper displays
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a mapping file to the display sink
    Render(RenderArgs),
    /// Show normalized rows and decoded button states
    Inspect(InspectArgs),
    /// List stored mapping files
    List(ListArgs),
    /// Print the button-state token table
    Codes(CodesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Render(args) => args.execute(config),
        Command::Inspect(args) => args.execute(&config),
        Command::List(args) => args.execute(&config),
        Command::Codes(args) => args.execute(),
    }
}
