//! Canvas composition.
//!
//! Draws a laid-out table into a primary and an accent plane and, when the
//! rows need more height than the display has, shrinks the finished canvas
//! to fit instead of dropping rows.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use serde::Serialize;

use crate::layout::{LayoutRow, RowLayout};
use crate::render::glyph::{GlyphComposer, GlyphOutcome};
use crate::render::metrics::SEPARATOR_OFFSET;
use crate::render::plane::Plane;
use crate::render::resources::RenderResources;

/// How the drawn content was fitted to the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FitPolicy {
    /// Rows fit; the planes were allocated at the target height.
    Native,
    /// Rows overflowed; the planes were drawn at `natural_height` and box-filtered down.
    Downscaled {
        /// Height the rows needed before resampling
        natural_height: u32,
    },
}

impl FitPolicy {
    /// Returns true if the canvas was resampled.
    #[must_use]
    pub const fn is_downscaled(&self) -> bool {
        matches!(self, Self::Downscaled { .. })
    }
}

/// A finished two-plane frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Black (primary) plane
    pub primary: Plane,
    /// Red (accent) plane
    pub accent: Plane,
    /// How the content was fitted
    pub fit: FitPolicy,
    /// Per-row glyph outcome, in row order
    pub glyphs: Vec<GlyphOutcome>,
}

impl Frame {
    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.primary.width()
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.primary.height()
    }

    /// Splits the frame into its two planes.
    #[must_use]
    pub fn into_planes(self) -> (Plane, Plane) {
        (self.primary, self.accent)
    }
}

/// Renders `layout` onto a `canvas_width` x `target_height` frame.
#[must_use]
pub fn render(
    layout: &RowLayout,
    resources: &RenderResources,
    canvas_width: u32,
    target_height: u32,
) -> Frame {
    let composer = GlyphComposer::new(resources);
    let metrics = composer.metrics();
    let natural_height = layout.natural_height(metrics.row_height);

    let (draw_height, fit) = if natural_height > target_height {
        tracing::warn!(
            "{} rows need {natural_height}px of {target_height}px; downscaling",
            layout.len()
        );
        (natural_height, FitPolicy::Downscaled { natural_height })
    } else {
        (target_height, FitPolicy::Native)
    };

    let mut primary = Plane::new(canvas_width, draw_height);
    let mut accent = Plane::new(canvas_width, draw_height);
    let label_style = MonoTextStyle::new(resources.body_font, BinaryColor::On);

    tracing::info!("Drawing {} mapping rows", layout.len());
    let glyphs = layout
        .positioned(metrics.row_height)
        .map(|placed| {
            draw_row(
                &placed,
                &composer,
                label_style,
                canvas_width,
                &mut primary,
                &mut accent,
            )
        })
        .collect();

    if fit.is_downscaled() {
        primary = primary.downscale_box(canvas_width, target_height);
        accent = accent.downscale_box(canvas_width, target_height);
    }

    Frame {
        primary,
        accent,
        fit,
        glyphs,
    }
}

fn draw_row(
    placed: &LayoutRow<'_>,
    composer: &GlyphComposer<'_>,
    label_style: MonoTextStyle<'static, BinaryColor>,
    canvas_width: u32,
    primary: &mut Plane,
    accent: &mut Plane,
) -> GlyphOutcome {
    let metrics = composer.metrics();
    let top = placed.y as i32;
    let column = placed.label_column_x as i32;

    let Ok(_) = Text::with_baseline(
        &placed.row.label,
        Point::new(0, top),
        label_style,
        Baseline::Top,
    )
    .draw(primary);

    let origin = Point::new(
        column + metrics.row_height as i32,
        top + metrics.glyph_offset as i32,
    );
    let outcome = composer.compose_code(&placed.row.code, origin, primary, accent);

    // Two-tone separator: accent under the label, primary under the glyphs.
    let line_y = top + SEPARATOR_OFFSET as i32;
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let Ok(()) = Line::new(Point::new(0, line_y), Point::new(column, line_y))
        .into_styled(stroke)
        .draw(accent);
    let Ok(()) = Line::new(
        Point::new(column, line_y),
        Point::new(canvas_width as i32, line_y),
    )
    .into_styled(stroke)
    .draw(primary);

    outcome
}
