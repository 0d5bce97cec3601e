//! Rasterisation of mapping tables into two bilevel planes.
//!
//! The primary plane carries black ink, the accent plane carries the second
//! display colour (red on the supported e-paper panels).

pub mod canvas;
pub mod glyph;
pub mod metrics;
pub mod plane;
pub mod resources;
pub mod splash;

pub use canvas::{render, FitPolicy, Frame};
pub use glyph::{GlyphComposer, GlyphOutcome};
pub use metrics::RowMetrics;
pub use plane::Plane;
pub use resources::{font_by_name, Icon, RenderResources};

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{renderer::TextRenderer, Baseline},
};

/// Advance width of `text` set in `font`, in pixels.
#[must_use]
pub fn measure_text(font: &MonoFont<'_>, text: &str) -> u32 {
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let metrics = style.measure_string(text, Point::zero(), Baseline::Top);
    u32::try_from(metrics.next_position.x).unwrap_or(0)
}
