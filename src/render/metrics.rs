//! Row geometry derived from the body font.

use embedded_graphics::mono_font::MonoFont;

/// Ratio between the row height and the indicator radius.
pub const TEXT_SIZE_RATIO: f32 = 2.6;

/// Outline width of the indicator discs (also the gap after the icon).
pub const CIRCLE_BORDER: u32 = 3;

/// Gap between two indicator discs.
pub const INDICATOR_GAP: u32 = 4;

/// Offset of the separator line below the row top.
pub const SEPARATOR_OFFSET: u32 = 2;

/// Pixel measurements shared by the glyph and canvas composers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMetrics {
    /// Height of one table row
    pub row_height: u32,
    /// Radius of an indicator disc
    pub radius: u32,
    /// Distance from the row top to the glyph origin
    pub glyph_offset: u32,
    /// Lift applied to middle-anchored glyph text
    pub text_lift: u32,
}

impl RowMetrics {
    /// Metrics for rows of `row_height` pixels.
    #[must_use]
    pub fn for_row_height(row_height: u32) -> Self {
        let height = row_height as f32;
        let radius = (height / TEXT_SIZE_RATIO).ceil() as u32;
        let glyph_offset = row_height.saturating_sub((height / TEXT_SIZE_RATIO).floor() as u32);
        let text_lift = (radius as f32 / TEXT_SIZE_RATIO).ceil() as u32;

        Self {
            row_height,
            radius,
            glyph_offset,
            text_lift,
        }
    }

    /// Metrics for rows set in `font`.
    #[must_use]
    pub fn for_font(font: &MonoFont<'_>) -> Self {
        Self::for_row_height(font.character_size.height)
    }

    /// Horizontal advance after one indicator disc.
    #[must_use]
    pub const fn indicator_advance(&self) -> u32 {
        self.radius * 2 + INDICATOR_GAP
    }
}
