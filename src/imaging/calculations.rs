//! Pure layout calculations for placeholder text.
//!
//! All functions here are pure and testable without any font or image.
//! Positions are baseline origins: `x` is where the string starts, `y` is the
//! baseline the glyphs sit on.

use super::backend::Bounds;

/// Font size multiplier for the `"W x H"` label.
pub const SIZE_LABEL_SCALE: f32 = 0.8;

/// Horizontal start that centers a string of the given bounds.
///
/// ```text
/// x = (canvas_width - (right - left)) / 2
/// ```
pub fn centered_x(canvas_width: u32, bounds: Bounds) -> f32 {
    (canvas_width as f32 - bounds.width()) / 2.0
}

/// Baseline for the main text.
///
/// Alone on the canvas, the text is nudged down by a quarter of its glyph
/// height so the visual center (not the baseline) lands mid-canvas. With the
/// size label shown, the baseline sits exactly mid-canvas and the label takes
/// the space below.
pub fn text_baseline(canvas_height: u32, bounds: Bounds, show_size: bool) -> f32 {
    let nudge = if show_size {
        0.0
    } else {
        bounds.height() / 4.0
    };
    canvas_height as f32 / 2.0 + nudge
}

/// Baseline for the `"W x H"` label: two label heights below mid-canvas.
pub fn size_label_baseline(canvas_height: u32, bounds: Bounds) -> f32 {
    canvas_height as f32 / 2.0 + bounds.height() * 2.0
}

/// Text of the dimensions label, e.g. `"180 x 120"`.
pub fn size_label(width: u32, height: u32) -> String {
    format!("{width} x {height}")
}
