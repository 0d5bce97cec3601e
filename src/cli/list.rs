//! List command.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::constants::{APP_BINARY_NAME, SOURCE_EXTENSION};
use crate::source::{CsvDirectory, DataSource};

/// List mapping files in the sources directory
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self, config: &Config) -> Result<()> {
        let catalog = CsvDirectory::new(config.paths.sources_dir.clone());
        let sources = catalog.list().context(format!(
            "Failed to read sources directory: {}",
            catalog.root().display()
        ))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&sources)?);
            return Ok(());
        }

        if sources.is_empty() {
            println!("No sources in {}", catalog.root().display());
            println!("Copy .{SOURCE_EXTENSION} exports there or use {APP_BINARY_NAME}-web.");
            return Ok(());
        }

        for source in sources {
            println!(
                "{:<40} {:>8}  {}",
                source.filename,
                source.size,
                source.modified.unwrap_or_default()
            );
        }

        Ok(())
    }
}
