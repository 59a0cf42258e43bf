//! Shared test utilities for the lorem-picsum test suite.
//!
//! Provides a ready-made [`AppState`] over a temp directory, response body
//! and image decoding helpers, and the path of the bundled font.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let state = test_state(tmp.path(), Arc::new(MockBackend::new()));
//! let cli = TestClient::new(create_endpoint(state, &tmp.path().join("assets")));
//!
//! let resp = cli.get("/lorem").query("t", &"png").send().await;
//! let (format, image) = decode(&body_bytes(resp).await);
//! assert_eq!(image.dimensions(), (180, 120));
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use poem::test::TestResponse;

use crate::imaging::{DrawingBackend, Quality};
use crate::page::LandingPage;
use crate::server::AppState;

// =========================================================================
// Fixture setup
// =========================================================================

/// Landing page template written by [`test_state`]; renders as `<h1>LOREM</h1>`.
pub const TEST_TEMPLATE: &str = "<h1>{{ \"lorem\" | upcase }}</h1>";

/// Build server state rooted at `dir`.
///
/// Writes `home.html` and `assets/script.js`; the template is not preloaded,
/// so tests can remove it before the first request.
pub fn test_state(dir: &Path, backend: Arc<dyn DrawingBackend>) -> AppState {
    std::fs::write(dir.join("home.html"), TEST_TEMPLATE).unwrap();
    let assets = dir.join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(assets.join("script.js"), "console.log('lorem');").unwrap();

    AppState {
        backend,
        landing: Arc::new(LandingPage::new(dir.join("home.html"))),
        jpeg_quality: Quality::default(),
    }
}

// =========================================================================
// Response helpers
// =========================================================================

pub async fn body_bytes(resp: TestResponse) -> Vec<u8> {
    resp.0.into_body().into_vec().await.unwrap()
}

/// Sniff the format of encoded bytes and decode them.
pub fn decode(bytes: &[u8]) -> (ImageFormat, DynamicImage) {
    let format = image::guess_format(bytes).unwrap();
    let image = image::load_from_memory_with_format(bytes, format).unwrap();
    (format, image)
}

// =========================================================================
// Fonts
// =========================================================================

/// The bundled monospace font, for tests that need real glyphs.
pub fn test_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts/DejaVuSansMono.ttf")
}
