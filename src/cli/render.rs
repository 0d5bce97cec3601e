//! Render command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{Config, SinkKind};
use crate::display::sink_for;
use crate::pipeline::Renderer;
use crate::render::FitPolicy;
use crate::source::load_csv_file;

/// Render a mapping file and send it to the display sink
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Path to a Quadstick CSV export
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output directory (overrides the configured one)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write packed panel buffers instead of PNG files
    #[arg(long)]
    pub buffer: bool,
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self, mut config: Config) -> Result<()> {
        if let Some(output) = &self.output {
            config.paths.output_dir.clone_from(output);
        }
        if self.buffer {
            config.display.sink = SinkKind::Buffer;
        }

        let table = load_csv_file(&self.file)?;
        let renderer = Renderer::from_config(&config).context("Failed to load render resources")?;
        let (frame, report) = renderer.render_table(&table);

        let mut sink = sink_for(&config);
        let (primary, accent) = frame.into_planes();
        sink.display(primary, accent)
            .context(format!("Failed to send frame to {} sink", sink.name()))?;

        println!("{}: {} rows", report.name, report.rows);
        println!("Label column: {}px", report.label_column_width);
        if let FitPolicy::Downscaled { natural_height } = report.fit {
            let (width, height) = renderer.size();
            println!("Scaled from {width}x{natural_height} to {width}x{height}");
        }
        println!("Output: {}", config.paths.output_dir.display());

        Ok(())
    }
}
