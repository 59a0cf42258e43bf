//! Placeholder image synthesis — pure Rust, no system graphics libraries.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Resolve** query → properties | [`ImageProperties::resolve`] |
//! | **Layout** centering math | `calculations` (pure functions) |
//! | **Draw** fill + text | [`DrawingBackend`] / [`RustBackend`] (`ab_glyph` + `imageproc`) |
//! | **Encode** JPEG / PNG / GIF | [`encode`] (`image` codecs) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for text placement (unit testable)
//! - **Parameters**: Raw query, resolved properties, output format, quality
//! - **Backend**: [`DrawingBackend`] trait + [`RustBackend`]
//! - **Operations**: [`render`] and [`encode`], combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Bounds, DEFAULT_MAX_PIXELS, DrawingBackend, GraphicContext};
pub use operations::{encode, render};
pub use params::{ImageProperties, LoremQuery, OutputFormat, Quality};
pub use rust_backend::RustBackend;
