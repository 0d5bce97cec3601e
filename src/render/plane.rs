//! 1-bit pixel plane.
//!
//! A [`Plane`] is a packed, row-major bilevel raster. Bit 7 of each byte is
//! the leftmost pixel. A set bit is ink; the plane starts as blank paper and
//! only ever accumulates ink, so drawing [`BinaryColor::Off`] is a no-op.

use core::convert::Infallible;

use embedded_graphics::{
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
    prelude::*,
};

/// Minimum ink coverage for a downscaled pixel to stay inked.
pub const INK_THRESHOLD: f32 = 0.5;

/// Bilevel raster used for both the primary and the accent colour.
#[derive(Clone, PartialEq, Eq)]
pub struct Plane {
    width: u32,
    height: u32,
    line_bytes: usize,
    bits: Vec<u8>,
}

impl std::fmt::Debug for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plane")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ink", &self.ink_count())
            .finish()
    }
}

impl Plane {
    /// Creates a blank plane.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let line_bytes = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            line_bytes,
            bits: vec![0u8; line_bytes * height as usize],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Packed bytes, one padded line after another.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Inks a pixel. Returns `false` if it is out of bounds.
    pub fn set_ink(&mut self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }

        let (index, mask) = self.locate(x, y);
        self.bits[index] |= mask;
        true
    }

    /// Returns true if the pixel is inked (out of bounds reads as paper).
    #[must_use]
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }

        let (index, mask) = self.locate(x, y);
        self.bits[index] & mask != 0
    }

    /// Number of inked pixels.
    #[must_use]
    pub fn ink_count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Returns true if any pixel in row `y` is inked.
    #[must_use]
    pub fn row_has_ink(&self, y: u32) -> bool {
        if y >= self.height {
            return false;
        }
        let start = y as usize * self.line_bytes;
        self.bits[start..start + self.line_bytes]
            .iter()
            .any(|b| *b != 0)
    }

    /// Resamples the plane to `width` x `height` with an area-averaging filter.
    ///
    /// Each output pixel covers a rectangle of the source; it is inked when
    /// the inked fraction of that rectangle reaches [`INK_THRESHOLD`].
    #[must_use]
    pub fn downscale_box(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return out;
        }

        let scale_x = f64::from(self.width) / f64::from(width);
        let scale_y = f64::from(self.height) / f64::from(height);

        for oy in 0..height {
            let y0 = f64::from(oy) * scale_y;
            let y1 = f64::from(oy + 1) * scale_y;
            for ox in 0..width {
                let x0 = f64::from(ox) * scale_x;
                let x1 = f64::from(ox + 1) * scale_x;
                let coverage = self.coverage(x0, x1, y0, y1) / ((x1 - x0) * (y1 - y0));
                if coverage >= f64::from(INK_THRESHOLD) {
                    out.set_ink(ox, oy);
                }
            }
        }

        out
    }

    /// Packs the plane for an e-paper controller: MSB first, ink = 0.
    #[must_use]
    pub fn to_device_buffer(&self) -> Vec<u8> {
        let mut buffer: Vec<u8> = self.bits.iter().map(|b| !b).collect();

        // Padding bits past the right edge stay at paper (1).
        let tail_bits = self.width % 8;
        if tail_bits != 0 {
            let padding_mask = 0xFFu8 >> tail_bits;
            for line in buffer.chunks_mut(self.line_bytes) {
                if let Some(last) = line.last_mut() {
                    *last |= padding_mask;
                }
            }
        }

        buffer
    }

    /// Inked area (in source pixels) inside the fractional rectangle.
    fn coverage(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
        let mut inked = 0.0;
        let row_start = y0.floor() as u32;
        let row_end = (y1.ceil() as u32).min(self.height);
        let col_start = x0.floor() as u32;
        let col_end = (x1.ceil() as u32).min(self.width);

        for y in row_start..row_end {
            let wy = overlap(f64::from(y), y0, y1);
            if wy <= 0.0 || !self.row_has_ink(y) {
                continue;
            }
            for x in col_start..col_end {
                if self.is_ink(x, y) {
                    inked += wy * overlap(f64::from(x), x0, x1);
                }
            }
        }

        inked
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let index = y as usize * self.line_bytes + (x as usize / 8);
        (index, 1u8 << (7 - (x % 8)))
    }
}

/// Length of the intersection of `[cell, cell + 1)` with `[start, end)`.
fn overlap(cell: f64, start: f64, end: f64) -> f64 {
    ((cell + 1.0).min(end) - cell.max(start)).max(0.0)
}

impl DrawTarget for Plane {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_off() || point.x < 0 || point.y < 0 {
                continue;
            }

            // Pixels past the right or bottom edge are clipped by set_ink.
            self.set_ink(point.x as u32, point.y as u32);
        }

        Ok(())
    }
}

impl OriginDimensions for Plane {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
