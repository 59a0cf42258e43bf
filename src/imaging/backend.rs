//! Drawing backend trait and shared types.
//!
//! A [`DrawingBackend`] hands out [`GraphicContext`]s: stateful handles over a
//! freshly allocated RGBA buffer exposing the handful of primitives the
//! renderer needs (fill a rectangle, pick a font size, measure a string, fill
//! a string at a baseline position).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — `ab_glyph` outlines
//! rasterized onto `image` buffers. Tests use the recording
//! [`MockBackend`](tests::MockBackend), which needs no font file.

use image::{Rgba, RgbaImage};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid font {}: {source}", .path.display())]
    Font {
        path: PathBuf,
        source: ab_glyph::InvalidFont,
    },
    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Extent a rendered string occupies, relative to a baseline origin at `(0, 0)`.
///
/// `top` is negative for glyphs that rise above the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Stateful drawing handle over one pixel buffer.
pub trait GraphicContext {
    /// Color used by subsequent fill operations (rectangles and strings).
    fn set_fill_color(&mut self, color: Rgba<u8>);

    /// Fill an axis-aligned rectangle with the current fill color.
    fn fill_rectangle(&mut self, x: u32, y: u32, width: u32, height: u32);

    /// Font size in points for subsequent measure/fill calls.
    fn set_font_size(&mut self, size: f32);

    /// Bounding box of `text` laid out at the current font size.
    fn string_bounds(&self, text: &str) -> Bounds;

    /// Fill `text` with its baseline starting at `(x, y)`.
    fn fill_string_at(&mut self, text: &str, x: f32, y: f32);

    /// Flush pending work and hand back the finished buffer.
    fn finish(self: Box<Self>) -> RgbaImage;
}

/// Factory for drawing contexts.
///
/// `Send + Sync` so a single backend can be shared by every request handler.
pub trait DrawingBackend: Send + Sync {
    fn context(&self, width: u32, height: u32)
    -> Result<Box<dyn GraphicContext + '_>, BackendError>;
}

/// Default cap on canvas size, in pixels (100 MB of RGBA).
pub const DEFAULT_MAX_PIXELS: u64 = 25_000_000;

/// Allocate a zeroed RGBA buffer.
///
/// Sizes above `max_pixels`, byte lengths that overflow, and allocations the
/// system refuses all return [`BackendError::ProcessingFailed`].
pub fn allocate_canvas(
    width: u32,
    height: u32,
    max_pixels: u64,
) -> Result<RgbaImage, BackendError> {
    let pixels = width as u64 * height as u64;
    if pixels > max_pixels {
        return Err(BackendError::ProcessingFailed(format!(
            "{width}x{height} exceeds the {max_pixels} pixel limit"
        )));
    }
    let too_large =
        || BackendError::ProcessingFailed(format!("{width}x{height} canvas is too large"));
    let len = pixels
        .checked_mul(4)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(too_large)?;

    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| too_large())?;
    buf.resize(len, 0);
    RgbaImage::from_raw(width, height, buf).ok_or_else(too_large)
}
