//! High-level image operations.
//!
//! [`render`] combines the layout calculations with a drawing backend to turn
//! [`ImageProperties`] into pixels; [`encode`] turns pixels into bytes in the
//! requested [`OutputFormat`].

use super::backend::{BackendError, DrawingBackend};
use super::calculations::{
    SIZE_LABEL_SCALE, centered_x, size_label, size_label_baseline, text_baseline,
};
use super::params::{ImageProperties, OutputFormat, Quality};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Draw one placeholder image.
///
/// Fills the canvas with the fill color, centers the text, and optionally
/// draws the `"W x H"` label underneath at 80% of the font size. The result
/// is a pure function of `props`: identical properties give identical pixels.
pub fn render(
    props: &ImageProperties,
    backend: &(impl DrawingBackend + ?Sized),
) -> Result<RgbaImage> {
    let mut gc = backend.context(props.width, props.height)?;

    gc.set_fill_color(props.fill_color);
    gc.fill_rectangle(0, 0, props.width, props.height);

    gc.set_fill_color(props.text_color);
    gc.set_font_size(props.font_size);

    let bounds = gc.string_bounds(&props.text);
    let x = centered_x(props.width, bounds);
    let y = text_baseline(props.height, bounds, props.show_size);
    gc.fill_string_at(&props.text, x, y);

    if props.show_size {
        gc.set_font_size(props.font_size * SIZE_LABEL_SCALE);
        let label = size_label(props.width, props.height);
        let bounds = gc.string_bounds(&label);
        let x = centered_x(props.width, bounds);
        let y = size_label_baseline(props.height, bounds);
        gc.fill_string_at(&label, x, y);
    }

    Ok(gc.finish())
}

/// Encode a rendered canvas.
///
/// JPEG has no alpha channel, so the canvas is flattened to RGB first;
/// `quality` only applies to JPEG.
pub fn encode(canvas: &RgbaImage, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
    let (width, height) = canvas.dimensions();
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(
                canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder.encode(canvas.as_raw(), width, height, ExtendedColorType::Rgba8)?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(bytes)
}
