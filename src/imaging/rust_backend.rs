//! Pure Rust drawing backend: `ab_glyph` glyphs on `image` buffers.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Load TrueType/OpenType font | `ab_glyph::FontArc::try_from_vec` |
//! | Glyph layout (advance + kerning) | `ab_glyph::ScaleFont` |
//! | Glyph rasterization | `ab_glyph::OutlinedGlyph::draw` |
//! | Coverage blending | `imageproc::pixelops::interpolate` |
//! | Rectangle fill | `imageproc::drawing::draw_filled_rect_mut` |
//!
//! Font sizes are points at [`DPI`] dots per inch, so a 14pt label renders
//! with an em of roughly 18 pixels.

use super::backend::{
    BackendError, Bounds, DEFAULT_MAX_PIXELS, DrawingBackend, GraphicContext, allocate_canvas,
};
use ab_glyph::{Font, FontArc, Glyph, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::pixelops::interpolate;
use imageproc::rect::Rect;
use std::path::Path;

/// Resolution used to convert point sizes to pixels.
pub const DPI: f32 = 92.0;

/// Drawing backend over a single loaded font.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Clone)]
pub struct RustBackend {
    font: FontArc,
    max_pixels: u64,
}

impl RustBackend {
    pub fn new(font: FontArc) -> Self {
        Self {
            font,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Refuse canvases larger than `max_pixels`.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Load the font file at `path`.
    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let data = std::fs::read(path)?;
        let font = FontArc::try_from_vec(data).map_err(|source| BackendError::Font {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(font))
    }
}

impl DrawingBackend for RustBackend {
    fn context(
        &self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn GraphicContext + '_>, BackendError> {
        Ok(Box::new(RustContext {
            font: &self.font,
            canvas: allocate_canvas(width, height, self.max_pixels)?,
            fill: Rgba([0, 0, 0, 255]),
            scale: px_scale(&self.font, 10.0),
        }))
    }
}

/// Convert a point size to the `ab_glyph` pixel scale (ascent-to-descent height).
fn px_scale(font: &FontArc, points: f32) -> PxScale {
    let px_per_em = points * DPI / 72.0;
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(px_per_em * font.height_unscaled() / units_per_em)
}

/// Lay out `text` on one line with its baseline origin at `(x, y)`.
fn layout(font: &FontArc, scale: PxScale, text: &str, x: f32, y: f32) -> Vec<Glyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = x;
    let mut previous: Option<GlyphId> = None;
    text.chars()
        .map(|c| {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, y));
            caret += scaled.h_advance(id);
            previous = Some(id);
            glyph
        })
        .collect()
}

struct RustContext<'a> {
    font: &'a FontArc,
    canvas: RgbaImage,
    fill: Rgba<u8>,
    scale: PxScale,
}

impl GraphicContext for RustContext<'_> {
    fn set_fill_color(&mut self, color: Rgba<u8>) {
        self.fill = color;
    }

    fn fill_rectangle(&mut self, x: u32, y: u32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(
            &mut self.canvas,
            Rect::at(x as i32, y as i32).of_size(width, height),
            self.fill,
        );
    }

    fn set_font_size(&mut self, size: f32) {
        self.scale = px_scale(self.font, size);
    }

    fn string_bounds(&self, text: &str) -> Bounds {
        layout(self.font, self.scale, text, 0.0, 0.0)
            .into_iter()
            .filter_map(|glyph| self.font.outline_glyph(glyph))
            .map(|outlined| outlined.px_bounds())
            .fold(None, |acc: Option<Bounds>, rect| {
                let b = Bounds {
                    left: rect.min.x,
                    top: rect.min.y,
                    right: rect.max.x,
                    bottom: rect.max.y,
                };
                Some(match acc {
                    Some(a) => Bounds {
                        left: a.left.min(b.left),
                        top: a.top.min(b.top),
                        right: a.right.max(b.right),
                        bottom: a.bottom.max(b.bottom),
                    },
                    None => b,
                })
            })
            .unwrap_or_default()
    }

    fn fill_string_at(&mut self, text: &str, x: f32, y: f32) {
        let (width, height) = self.canvas.dimensions();
        let fill = self.fill;
        for glyph in layout(self.font, self.scale, text, x, y) {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let origin = outlined.px_bounds().min;
            let canvas = &mut self.canvas;
            outlined.draw(|gx, gy, coverage| {
                let px = origin.x as i32 + gx as i32;
                let py = origin.y as i32 + gy as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                *pixel = interpolate(fill, *pixel, coverage.clamp(0.0, 1.0));
            });
        }
    }

    fn finish(self: Box<Self>) -> RgbaImage {
        self.canvas
    }
}
