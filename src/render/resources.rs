//! Fonts and icons used by the renderer.
//!
//! Resources are resolved once (at start-up or per render) and treated as
//! immutable afterwards. A missing font or unreadable image is a
//! [`QuadmapError::ResourceLoad`], which callers treat as fatal.

use std::path::Path;

use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::{ascii, MonoFont},
    pixelcolor::BinaryColor,
    prelude::*,
};
use image::{imageops::FilterType, DynamicImage};

use crate::config::RenderConfig;
use crate::error::{QuadmapError, QuadmapResult};
use crate::render::plane::Plane;

/// Names accepted for `body_font` / `title_font`.
pub const FONT_NAMES: &[&str] = &[
    "6x10",
    "6x13",
    "6x13_bold",
    "7x13",
    "7x13_bold",
    "8x13",
    "8x13_bold",
    "9x15",
    "9x15_bold",
    "9x18",
    "9x18_bold",
    "10x20",
];

/// Resolves a font name to one of the built-in monospaced fonts.
#[must_use]
pub fn font_by_name(name: &str) -> Option<&'static MonoFont<'static>> {
    let font = match name.trim().to_ascii_lowercase().as_str() {
        "6x10" => &ascii::FONT_6X10,
        "6x13" => &ascii::FONT_6X13,
        "6x13_bold" => &ascii::FONT_6X13_BOLD,
        "7x13" => &ascii::FONT_7X13,
        "7x13_bold" => &ascii::FONT_7X13_BOLD,
        "8x13" => &ascii::FONT_8X13,
        "8x13_bold" => &ascii::FONT_8X13_BOLD,
        "9x15" => &ascii::FONT_9X15,
        "9x15_bold" => &ascii::FONT_9X15_BOLD,
        "9x18" => &ascii::FONT_9X18,
        "9x18_bold" => &ascii::FONT_9X18_BOLD,
        "10x20" => &ascii::FONT_10X20,
        _ => return None,
    };
    Some(font)
}

/// A pre-rendered 1-bit bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    width: u32,
    height: u32,
    /// Row-aligned, MSB-first, set bit = ink
    data: Vec<u8>,
}

impl Icon {
    /// Builds an icon from an ink predicate.
    pub fn from_fn(width: u32, height: u32, ink: impl Fn(u32, u32) -> bool) -> Self {
        let line_bytes = (width as usize).div_ceil(8);
        let mut data = vec![0u8; line_bytes * height as usize];
        for y in 0..height {
            for x in 0..width {
                if ink(x, y) {
                    data[y as usize * line_bytes + x as usize / 8] |= 1u8 << (7 - (x % 8));
                }
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Scales `image` to `height` pixels (keeping its aspect ratio) and
    /// thresholds it: dark, opaque pixels become ink.
    #[must_use]
    pub fn from_image(image: &DynamicImage, height: u32) -> Self {
        let aspect = f64::from(image.width()) / f64::from(image.height().max(1));
        let width = ((aspect * f64::from(height)) as u32).max(1);
        let scaled = image
            .resize_exact(width, height, FilterType::Triangle)
            .to_luma_alpha8();

        Self::from_fn(width, height, |x, y| {
            let [luma, alpha] = scaled.get_pixel(x, y).0;
            alpha >= 128 && luma < 128
        })
    }

    /// The built-in airflow arrow, pointing left to right.
    #[must_use]
    pub fn airflow_arrow(height: u32) -> Self {
        let height = height.max(4);
        let width = height * 3 / 2;
        let head_len = height / 2;
        let head_start = width - head_len;
        let mid = (height as f32 - 1.0) / 2.0;
        let shaft = (height as f32 / 8.0).max(1.0);

        Self::from_fn(width, height, |x, y| {
            let dy = (y as f32 - mid).abs();
            if x < head_start {
                dy <= shaft
            } else {
                let remaining = (width - 1 - x) as f32;
                dy <= remaining * (height as f32 / 2.0) / head_len as f32
            }
        })
    }

    /// Returns a horizontally mirrored copy.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.is_ink(self.width - 1 - x, y)
        })
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

    /// Returns true if the pixel is inked.
    #[must_use]
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let line_bytes = (self.width as usize).div_ceil(8);
        self.data[y as usize * line_bytes + x as usize / 8] & (1u8 << (7 - (x % 8))) != 0
    }

    /// Pastes the icon's ink onto `plane` with its top-left corner at `top_left`.
    pub fn paste(&self, plane: &mut Plane, top_left: Point) {
        let raw = ImageRaw::<BinaryColor>::new(&self.data, self.width);
        let Ok(()) = Image::new(&raw, top_left).draw(plane);
    }
}

/// Everything the renderer draws with.
#[derive(Clone)]
pub struct RenderResources {
    /// Font for labels and glyph text
    pub body_font: &'static MonoFont<'static>,
    /// Font for the start-up screen
    pub title_font: &'static MonoFont<'static>,
    /// Arrow drawn for puff actions (mirrored)
    pub puff_icon: Icon,
    /// Arrow drawn for sip actions (as loaded)
    pub sip_icon: Icon,
    /// Optional start-up logo
    pub logo: Option<Icon>,
}

impl std::fmt::Debug for RenderResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderResources")
            .field("body_font", &self.body_font.character_size)
            .field("title_font", &self.title_font.character_size)
            .field("sip_icon", &(self.sip_icon.width(), self.sip_icon.height()))
            .field("logo", &self.logo.is_some())
            .finish()
    }
}

impl RenderResources {
    /// Resolves fonts and loads images named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadmapError::ResourceLoad`] for unknown font names or
    /// image files that cannot be opened or decoded.
    pub fn load(config: &RenderConfig) -> QuadmapResult<Self> {
        let body_font = font_by_name(&config.body_font)
            .ok_or_else(|| QuadmapError::resource(&config.body_font, "unknown font"))?;
        let title_font = font_by_name(&config.title_font)
            .ok_or_else(|| QuadmapError::resource(&config.title_font, "unknown font"))?;

        let icon_height = body_font.character_size.height;
        let arrow = match &config.icon {
            Some(path) => Icon::from_image(&open_image(path)?, icon_height),
            None => Icon::airflow_arrow(icon_height),
        };

        let logo = match &config.logo {
            Some(path) => {
                let image = open_image(path)?;
                Some(Icon::from_image(&image, image.height()))
            }
            None => None,
        };

        tracing::debug!(
            "Render resources ready: icon {}x{}",
            arrow.width(),
            arrow.height()
        );

        Ok(Self {
            body_font,
            title_font,
            puff_icon: arrow.mirrored(),
            sip_icon: arrow,
            logo,
        })
    }

    /// Built-in resources (default fonts, generated arrow, no logo).
    #[must_use]
    pub fn builtin() -> Self {
        let body_font = &ascii::FONT_9X18_BOLD;
        let arrow = Icon::airflow_arrow(body_font.character_size.height);
        Self {
            body_font,
            title_font: &ascii::FONT_10X20,
            puff_icon: arrow.mirrored(),
            sip_icon: arrow,
            logo: None,
        }
    }

    /// Arrow for the given airflow direction.
    #[must_use]
    pub fn airflow_icon(&self, puff: bool) -> &Icon {
        if puff {
            &self.puff_icon
        } else {
            &self.sip_icon
        }
    }
}

fn open_image(path: &Path) -> QuadmapResult<DynamicImage> {
    image::open(path).map_err(|e| QuadmapError::resource(path.display().to_string(), e.to_string()))
}
