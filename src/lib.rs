//! # Lorem Picsum
//!
//! A tiny web service that synthesizes placeholder images on demand: a solid
//! light-gray rectangle of the requested size with centered white text, an
//! optional `WIDTH x HEIGHT` label, encoded as JPEG, PNG or GIF.
//!
//! # Request Flow
//!
//! ```text
//! GET /lorem?w=300&h=200&s=Hello&t=png
//!   1. Resolve   query     →  ImageProperties   (defaults for anything malformed)
//!   2. Render    properties →  RGBA buffer      (fill + centered text)
//!   3. Encode    buffer    →  bytes             (JPEG | PNG | GIF)
//! ```
//!
//! Each step is a plain function, so the defaulting rules, the centering math
//! and the encoders are unit-testable without an HTTP server or a font file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Query resolution, text layout, drawing backend, encoders |
//! | [`page`] | Landing page template, parsed once and shared |
//! | [`server`] | Poem routes, shared state, startup asset loading |
//! | [`config`] | `lorem.toml` loading, validation, and the stock config |
//!
//! # Design Decisions
//!
//! ## Malformed Input Is Not an Error
//!
//! Placeholder URLs are typed by hand into HTML mockups. A typo in `w` should
//! still produce an image, so every query value falls back to its default
//! instead of producing a 4xx. The rules live in one function,
//! [`imaging::ImageProperties::resolve`].
//!
//! ## Pure-Rust Text Rendering
//!
//! Glyphs are rasterized with `ab_glyph` straight onto `image` buffers. No
//! FreeType, no Cairo, no system libraries: the binary plus a font file is the
//! whole deployment.
//!
//! ## Fail Fast at Startup, Never Per Request
//!
//! The font and the landing page template are loaded before the listener
//! binds; if either is missing the process exits. After that, a failure while
//! serving one request (an unencodable image, a broken template render) is
//! logged and answered with a 500, and the server keeps running.

pub mod config;
pub mod imaging;
pub mod page;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
