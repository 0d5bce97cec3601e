//! Display sinks.
//!
//! A sink takes ownership of a rendered primary/accent pair. The panel
//! driver itself lives outside this crate; these sinks persist the planes
//! as PNG previews or as the packed buffers a panel driver consumes.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};

use crate::config::{Config, SinkKind};
use crate::error::{QuadmapError, QuadmapResult};
use crate::render::Plane;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const ACCENT: Rgb<u8> = Rgb([200, 0, 0]);

/// Receiver for finished frames.
pub trait DisplaySink {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Shows a frame. Both planes must have the same dimensions.
    fn display(&mut self, primary: Plane, accent: Plane) -> QuadmapResult<()>;
}

/// Builds the sink selected in `config`.
#[must_use]
pub fn sink_for(config: &Config) -> Box<dyn DisplaySink + Send> {
    let output_dir = config.paths.output_dir.clone();
    match config.display.sink {
        SinkKind::Png => Box::new(PngSink::new(output_dir)),
        SinkKind::Buffer => Box::new(BufferSink::new(output_dir)),
    }
}

fn check_dimensions(primary: &Plane, accent: &Plane) -> QuadmapResult<()> {
    if primary.width() != accent.width() || primary.height() != accent.height() {
        return Err(QuadmapError::Sink(format!(
            "plane size mismatch: primary {}x{}, accent {}x{}",
            primary.width(),
            primary.height(),
            accent.width(),
            accent.height()
        )));
    }
    Ok(())
}

/// Grayscale image of one plane, ink black on white paper.
#[must_use]
pub fn plane_image(plane: &Plane) -> GrayImage {
    GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
        if plane.is_ink(x, y) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Colour preview of a frame. Accent ink is drawn over primary ink.
#[must_use]
pub fn composite_image(primary: &Plane, accent: &Plane) -> RgbImage {
    RgbImage::from_fn(primary.width(), primary.height(), |x, y| {
        if accent.is_ink(x, y) {
            ACCENT
        } else if primary.is_ink(x, y) {
            INK
        } else {
            PAPER
        }
    })
}

/// PNG-encoded colour preview.
pub fn composite_png_bytes(primary: &Plane, accent: &Plane) -> QuadmapResult<Vec<u8>> {
    check_dimensions(primary, accent)?;
    let mut bytes = Cursor::new(Vec::new());
    composite_image(primary, accent)
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| QuadmapError::Sink(e.to_string()))?;
    Ok(bytes.into_inner())
}

/// Writes `primary.png`, `accent.png` and `composite.png`.
#[derive(Debug, Clone)]
pub struct PngSink {
    output_dir: PathBuf,
}

impl PngSink {
    /// Primary plane file name.
    pub const PRIMARY: &'static str = "primary.png";
    /// Accent plane file name.
    pub const ACCENT: &'static str = "accent.png";
    /// Colour preview file name.
    pub const COMPOSITE: &'static str = "composite.png";

    /// Creates a sink writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn save(&self, name: &str, result: image::ImageResult<()>) -> QuadmapResult<()> {
        result.map_err(|e| {
            QuadmapError::Sink(format!(
                "failed to write {}: {e}",
                self.output_dir.join(name).display()
            ))
        })
    }
}

impl DisplaySink for PngSink {
    fn name(&self) -> &'static str {
        "png"
    }

    fn display(&mut self, primary: Plane, accent: Plane) -> QuadmapResult<()> {
        check_dimensions(&primary, &accent)?;
        fs::create_dir_all(&self.output_dir)?;

        self.save(
            Self::PRIMARY,
            plane_image(&primary).save(self.output_dir.join(Self::PRIMARY)),
        )?;
        self.save(
            Self::ACCENT,
            plane_image(&accent).save(self.output_dir.join(Self::ACCENT)),
        )?;
        self.save(
            Self::COMPOSITE,
            composite_image(&primary, &accent).save(self.output_dir.join(Self::COMPOSITE)),
        )?;

        tracing::info!(
            "Wrote {}x{} frame to {}",
            primary.width(),
            primary.height(),
            self.output_dir.display()
        );
        Ok(())
    }
}

/// Writes packed panel buffers (`primary.bin`, `accent.bin`).
///
/// Each buffer is 1bpp, MSB-first, rows padded to whole bytes, with ink
/// as a 0 bit.
#[derive(Debug, Clone)]
pub struct BufferSink {
    output_dir: PathBuf,
}

impl BufferSink {
    /// Primary buffer file name.
    pub const PRIMARY: &'static str = "primary.bin";
    /// Accent buffer file name.
    pub const ACCENT: &'static str = "accent.bin";

    /// Creates a sink writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl DisplaySink for BufferSink {
    fn name(&self) -> &'static str {
        "buffer"
    }

    fn display(&mut self, primary: Plane, accent: Plane) -> QuadmapResult<()> {
        check_dimensions(&primary, &accent)?;
        fs::create_dir_all(&self.output_dir)?;
        fs::write(
            self.output_dir.join(Self::PRIMARY),
            primary.to_device_buffer(),
        )?;
        fs::write(self.output_dir.join(Self::ACCENT), accent.to_device_buffer())?;
        tracing::debug!("Wrote panel buffers to {}", self.output_dir.display());
        Ok(())
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Received frames, oldest first
    pub frames: Vec<(Plane, Plane)>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&(Plane, Plane)> {
        self.frames.last()
    }
}

impl DisplaySink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn display(&mut self, primary: Plane, accent: Plane) -> QuadmapResult<()> {
        check_dimensions(&primary, &accent)?;
        self.frames.push((primary, accent));
        Ok(())
    }
}
