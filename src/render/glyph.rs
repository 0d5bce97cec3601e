//! Glyph cluster for one row.
//!
//! A decoded button state is drawn as three indicator discs (accent plane),
//! an airflow arrow (primary plane) and an optional "soft" tag. Codes that
//! are not button states are drawn as plain text instead.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyleBuilder, StrokeAlignment},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use serde::Serialize;

use crate::button_state::{self, ButtonStateVector};
use crate::render::metrics::{RowMetrics, CIRCLE_BORDER};
use crate::render::plane::Plane;
use crate::render::resources::RenderResources;

/// Word drawn after the arrow for soft actions.
pub const SOFT_LABEL: &str = "soft";

/// What the composer drew for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GlyphOutcome {
    /// Indicators and arrow were drawn; `next_x` is where the cluster ends.
    Icon {
        /// Decoded button state
        vector: ButtonStateVector,
        /// X coordinate after the last drawn element
        next_x: i32,
    },
    /// The code was drawn as literal text; the origin was not advanced.
    TextOnly {
        /// Unchanged origin x
        x: i32,
    },
}

impl GlyphOutcome {
    /// Returns true for the literal-text branch.
    #[must_use]
    pub const fn is_text_only(&self) -> bool {
        matches!(self, Self::TextOnly { .. })
    }

    /// X coordinate following the glyph cluster.
    #[must_use]
    pub const fn next_x(&self) -> i32 {
        match self {
            Self::Icon { next_x, .. } => *next_x,
            Self::TextOnly { x } => *x,
        }
    }
}

/// Draws glyph clusters with a fixed set of resources.
#[derive(Debug, Clone, Copy)]
pub struct GlyphComposer<'a> {
    resources: &'a RenderResources,
    metrics: RowMetrics,
}

impl<'a> GlyphComposer<'a> {
    /// Creates a composer drawing with `resources`.
    #[must_use]
    pub fn new(resources: &'a RenderResources) -> Self {
        Self {
            resources,
            metrics: RowMetrics::for_font(resources.body_font),
        }
    }

    /// Row metrics in use.
    #[must_use]
    pub const fn metrics(&self) -> RowMetrics {
        self.metrics
    }

    /// Decodes `code` and draws the matching glyph cluster at `origin`.
    pub fn compose_code(
        &self,
        code: &str,
        origin: Point,
        primary: &mut Plane,
        accent: &mut Plane,
    ) -> GlyphOutcome {
        let vector = button_state::decode(code);
        if vector.is_none() {
            tracing::debug!("Code {code} is not a mouthpiece button");
        }
        self.compose(vector, code, origin, primary, accent)
    }

    /// Draws the cluster for `vector`, or `literal` when there is no vector.
    ///
    /// `origin` is the vertical centre line of the row, already offset by
    /// the caller; every element is anchored on it.
    pub fn compose(
        &self,
        vector: Option<ButtonStateVector>,
        literal: &str,
        origin: Point,
        primary: &mut Plane,
        accent: &mut Plane,
    ) -> GlyphOutcome {
        let Some(vector) = vector else {
            self.draw_text(literal, origin, accent);
            return GlyphOutcome::TextOnly { x: origin.x };
        };

        let radius = self.metrics.radius as i32;
        let mut x = origin.x;

        for filled in vector.switches() {
            self.draw_indicator(Point::new(x, origin.y), filled, accent);
            x += self.metrics.indicator_advance() as i32;
        }

        let icon = self.resources.airflow_icon(vector.puff);
        icon.paste(primary, Point::new(x - radius, origin.y - radius));
        x += (icon.width() + CIRCLE_BORDER) as i32;

        if vector.soft {
            self.draw_text(SOFT_LABEL, Point::new(x, origin.y), primary);
        }

        GlyphOutcome::Icon { vector, next_x: x }
    }

    fn draw_indicator(&self, center: Point, filled: bool, plane: &mut Plane) {
        let mut style = PrimitiveStyleBuilder::new()
            .stroke_color(BinaryColor::On)
            .stroke_width(CIRCLE_BORDER)
            .stroke_alignment(StrokeAlignment::Inside);
        if filled {
            style = style.fill_color(BinaryColor::On);
        }

        let Ok(()) = Circle::with_center(center, self.metrics.radius * 2 + 1)
            .into_styled(style.build())
            .draw(plane);
    }

    fn draw_text(&self, text: &str, anchor: Point, plane: &mut Plane) {
        let character_style = MonoTextStyle::new(self.resources.body_font, BinaryColor::On);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Left)
            .baseline(Baseline::Middle)
            .build();
        let position = Point::new(
            anchor.x - self.metrics.radius as i32,
            anchor.y - self.metrics.text_lift as i32,
        );

        let Ok(_) = Text::with_text_style(text, position, character_style, text_style).draw(plane);
    }
}
