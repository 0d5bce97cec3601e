//! Source table to frame.

use serde::Serialize;

use crate::config::Config;
use crate::error::{QuadmapError, QuadmapResult};
use crate::layout::{layout, LayoutOptions, RowLayout};
use crate::normalize::Normalizer;
use crate::render::{self, measure_text, FitPolicy, Frame, RenderResources, RowMetrics};
use crate::source::SourceTable;

/// Summary of one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    /// Display name of the source
    pub name: String,
    /// Rows drawn
    pub rows: usize,
    /// Label column width in pixels
    pub label_column_width: u32,
    /// How the content was fitted
    pub fit: FitPolicy,
    /// Height the rows needed before any resampling
    pub natural_height: u32,
}

/// Renders tables for one display geometry with one set of resources.
#[derive(Debug, Clone)]
pub struct Renderer {
    resources: RenderResources,
    normalizer: Normalizer<'static>,
    width: u32,
    height: u32,
    options: LayoutOptions,
}

impl Renderer {
    /// Creates a renderer using the built-in normalization rules.
    pub fn new(
        resources: RenderResources,
        width: u32,
        height: u32,
        options: LayoutOptions,
    ) -> QuadmapResult<Self> {
        Ok(Self {
            resources,
            normalizer: Normalizer::builtin()?,
            width,
            height,
            options,
        })
    }

    /// Loads resources and geometry from `config`.
    pub fn from_config(config: &Config) -> QuadmapResult<Self> {
        let (width, height) = (config.display.width, config.display.height);
        if width == 0 || height == 0 {
            return Err(QuadmapError::Config(format!(
                "display size must be positive, got {width}x{height}"
            )));
        }

        let resources = RenderResources::load(&config.render)?;
        Self::new(resources, width, height, config.render.layout_options())
    }

    /// Resources in use.
    #[must_use]
    pub const fn resources(&self) -> &RenderResources {
        &self.resources
    }

    /// Target size in pixels.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Normalizes and lays out `table` without drawing it.
    #[must_use]
    pub fn layout_table(&self, table: &SourceTable) -> RowLayout {
        let font = self.resources.body_font;
        layout(
            table.rows.iter().cloned(),
            &self.normalizer,
            |text| measure_text(font, text),
            self.width,
            &self.options,
        )
    }

    /// Renders `table` to a frame of the target size.
    #[must_use]
    pub fn render_table(&self, table: &SourceTable) -> (Frame, RenderReport) {
        let row_layout = self.layout_table(table);
        let row_height = RowMetrics::for_font(self.resources.body_font).row_height;
        let frame = render::render(&row_layout, &self.resources, self.width, self.height);

        let report = RenderReport {
            name: table.name.clone(),
            rows: row_layout.len(),
            label_column_width: row_layout.label_column_width,
            fit: frame.fit,
            natural_height: row_layout.natural_height(row_height),
        };
        (frame, report)
    }
}
