//! Parameter types for placeholder images.
//!
//! These structs describe *what* to draw, not *how*. The HTTP layer turns a
//! query string into a raw [`LoremQuery`]; [`ImageProperties::resolve`] applies
//! the defaulting rules and produces the validated value the renderer consumes.
//!
//! ## Types
//!
//! - [`LoremQuery`] — Raw, unvalidated query values (first occurrence of a key wins).
//! - [`ImageProperties`] — Resolved description of one image. Width, height and font size are always positive.
//! - [`OutputFormat`] — JPEG (default), PNG or GIF.
//! - [`Quality`] — Lossy encoding quality (1–100, default 75). Clamped on construction.
//!
//! ## Resolution rules
//!
//! | key | field | rule |
//! |---|---|---|
//! | `w` | width | integer > 0, else 180 |
//! | `h` | height | integer > 0, else 120 |
//! | `fs` | font size | finite float > 0, else 14 |
//! | `s` | text | any non-empty string, verbatim |
//! | `p` | show size | exactly `"1"` |
//! | `t` | format | `"png"`, `"gif"`, anything else is JPEG |
//!
//! Malformed values never produce errors; they fall back to the default.

use image::{ImageFormat, Rgba};

pub const DEFAULT_WIDTH: u32 = 180;
pub const DEFAULT_HEIGHT: u32 = 120;
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
/// Opaque white.
pub const TEXT_COLOR: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
/// Opaque light gray.
pub const FILL_COLOR: Rgba<u8> = Rgba([0xcc, 0xcc, 0xcc, 0xff]);

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// Parse the `t` query value. Unknown values select JPEG.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("png") => Self::Png,
            Some("gif") => Self::Gif,
            _ => Self::Jpeg,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
        }
    }
}

/// Raw query values for `/lorem`, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoremQuery {
    pub w: Option<String>,
    pub h: Option<String>,
    pub fs: Option<String>,
    pub s: Option<String>,
    pub p: Option<String>,
    pub t: Option<String>,
}

impl LoremQuery {
    /// Collect recognized keys from decoded query pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "w" => &mut query.w,
                "h" => &mut query.h,
                "fs" => &mut query.fs,
                "s" => &mut query.s,
                "p" => &mut query.p,
                "t" => &mut query.t,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

/// Resolved description of one placeholder image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProperties {
    pub width: u32,
    pub height: u32,
    pub text_color: Rgba<u8>,
    pub fill_color: Rgba<u8>,
    pub text: String,
    pub font_size: f32,
    /// Draw a second `"W x H"` line under the text.
    pub show_size: bool,
    pub format: OutputFormat,
}

impl Default for ImageProperties {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            text_color: TEXT_COLOR,
            fill_color: FILL_COLOR,
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            show_size: false,
            format: OutputFormat::default(),
        }
    }
}

impl ImageProperties {
    /// Apply the defaulting rules to a raw query. Never fails.
    pub fn resolve(query: &LoremQuery) -> Self {
        let defaults = Self::default();
        Self {
            width: positive_dimension(query.w.as_deref()).unwrap_or(defaults.width),
            height: positive_dimension(query.h.as_deref()).unwrap_or(defaults.height),
            font_size: positive_size(query.fs.as_deref()).unwrap_or(defaults.font_size),
            text: query
                .s
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.text),
            show_size: query.p.as_deref() == Some("1"),
            format: OutputFormat::from_query(query.t.as_deref()),
            ..defaults
        }
    }
}

fn positive_dimension(value: Option<&str>) -> Option<u32> {
    value?
        .parse::<i64>()
        .ok()
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

fn positive_size(value: Option<&str>) -> Option<f32> {
    value?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v as f32)
        .filter(|v| v.is_finite() && *v > 0.0)
}
