//! Inspect command: shows how a mapping file is interpreted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::button_state::{self, ButtonStateVector};
use crate::config::Config;
use crate::pipeline::Renderer;
use crate::source::load_csv_file;

/// Print the normalized rows of a mapping file
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to a Quadstick CSV export
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One row as the renderer sees it.
#[derive(Debug, Serialize)]
struct InspectRow {
    label: String,
    code: String,
    vector: Option<ButtonStateVector>,
}

/// JSON output of the inspect command.
#[derive(Debug, Serialize)]
struct InspectReport {
    name: String,
    label_column_width: u32,
    rows: Vec<InspectRow>,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self, config: &Config) -> Result<()> {
        let table = load_csv_file(&self.file)?;
        let renderer = Renderer::from_config(config).context("Failed to load render resources")?;
        let row_layout = renderer.layout_table(&table);

        let report = InspectReport {
            name: table.name,
            label_column_width: row_layout.label_column_width,
            rows: row_layout
                .rows
                .into_iter()
                .map(|row| InspectRow {
                    vector: button_state::decode(&row.code),
                    label: row.label,
                    code: row.code,
                })
                .collect(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("{} ({} rows)", report.name, report.rows.len());
        println!("Label column: {}px", report.label_column_width);
        println!();
        for row in &report.rows {
            let shape = row
                .vector
                .map_or_else(|| "text".to_string(), |vector| vector.to_string());
            println!("{:<24} {:<28} {shape}", row.label, row.code);
        }

        Ok(())
    }
}
