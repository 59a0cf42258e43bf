//! HTTP surface.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | [`LandingPage`], rendered from a template parsed once |
//! | `GET /lorem` | resolve → render → encode, body is the encoded image |
//! | `GET /assets/*` | static files (landing page script and stylesheet) |
//!
//! Every request is independent. The only shared state is [`AppState`]:
//! the drawing backend (an immutable font) and the landing page.

use std::path::Path;
use std::sync::Arc;

use poem::endpoint::StaticFilesEndpoint;
use poem::error::InternalServerError;
use poem::listener::TcpListener;
use poem::web::{Data, Html, Query};
use poem::{Endpoint, EndpointExt, Response, Result, Route, Server, get, handler};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::imaging::{self, BackendError, DrawingBackend, ImageProperties, LoremQuery, Quality};
use crate::page::{LandingPage, PageError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Font error: {0}")]
    Font(#[from] BackendError),
    #[error("Landing page error: {0}")]
    Page(#[from] PageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn DrawingBackend>,
    pub landing: Arc<LandingPage>,
    pub jpeg_quality: Quality,
}

/// Load the font and the landing page template.
///
/// Both are required assets: a missing or unparsable file is returned as an
/// error so the process can refuse to start.
pub async fn create_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let font_path = config.assets.font_path();
    tracing::info!(path = %font_path.display(), "load font");
    let backend =
        imaging::RustBackend::load(&font_path)?.with_max_pixels(config.encoding.max_pixels);

    let landing = LandingPage::new(config.assets.home_template_path());
    landing.template().await?;

    Ok(AppState {
        backend: Arc::new(backend),
        landing: Arc::new(landing),
        jpeg_quality: config.encoding.quality(),
    })
}

pub fn create_endpoint(state: AppState, static_dir: &Path) -> impl Endpoint + use<> {
    Route::new()
        .at("/", get(home))
        .at("/lorem", get(lorem))
        .nest("/assets", StaticFilesEndpoint::new(static_dir))
        .data(state)
}

/// Bind the configured address and serve until the listener fails.
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let state = create_state(config).await?;
    let endpoint = create_endpoint(state, &config.assets.static_dir);

    tracing::info!(addr = config.server.addr.as_str(), "listening");
    Server::new(TcpListener::bind(config.server.addr.clone()))
        .run(endpoint)
        .await?;
    Ok(())
}

#[handler]
async fn home(Data(state): Data<&AppState>) -> Result<Html<String>> {
    match state.landing.render().await {
        Ok(body) => Ok(Html(body)),
        Err(err) => {
            tracing::error!(
                error = %err,
                path = %state.landing.path().display(),
                "render landing page"
            );
            Err(InternalServerError(err))
        }
    }
}

#[handler]
async fn lorem(
    Query(pairs): Query<Vec<(String, String)>>,
    Data(state): Data<&AppState>,
) -> Result<Response> {
    let props = ImageProperties::resolve(&LoremQuery::from_pairs(pairs));
    let format = props.format;
    let backend = state.backend.clone();
    let quality = state.jpeg_quality;

    let encoded = tokio::task::spawn_blocking(move || {
        let canvas = imaging::render(&props, backend.as_ref())?;
        imaging::encode(&canvas, props.format, quality)
    })
    .await
    .map_err(InternalServerError)?;

    match encoded {
        Ok(body) => Ok(Response::builder()
            .content_type(format.mime_type())
            .body(body)),
        Err(err) => {
            tracing::error!(error = %err, "render image");
            Err(InternalServerError(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{body_bytes, decode, test_state};
    use image::{GenericImageView, ImageFormat};
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use tempfile::TempDir;

    fn client(tmp: &TempDir) -> TestClient<impl Endpoint + use<>> {
        client_with(tmp, MockBackend::new())
    }

    fn client_with(tmp: &TempDir, backend: MockBackend) -> TestClient<impl Endpoint + use<>> {
        let state = test_state(tmp.path(), Arc::new(backend));
        TestClient::new(create_endpoint(state, &tmp.path().join("assets")))
    }

    fn font_config(tmp: &TempDir) -> ServerConfig {
        let font = crate::test_helpers::test_font();
        let mut config = ServerConfig::default();
        config.assets.fonts_dir = font.parent().unwrap().to_path_buf();
        config.assets.font_file = font.file_name().unwrap().to_string_lossy().into_owned();
        config.assets.templates_dir = tmp.path().to_path_buf();
        config
    }

    // =========================================================================
    // /lorem
    // =========================================================================

    #[tokio::test]
    async fn lorem_defaults_to_jpeg_180x120() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli.get("/lorem").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("image/jpeg");
        let (format, image) = decode(&body_bytes(resp).await);
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(image.dimensions(), (180, 120));
    }

    #[tokio::test]
    async fn lorem_png_with_requested_dimensions() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli
            .get("/lorem")
            .query("w", &300)
            .query("h", &200)
            .query("s", &"Hello")
            .query("fs", &20)
            .query("t", &"png")
            .send()
            .await;
        resp.assert_status_is_ok();
        resp.assert_content_type("image/png");
        let (format, image) = decode(&body_bytes(resp).await);
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(image.dimensions(), (300, 200));
    }

    #[tokio::test]
    async fn lorem_gif() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli.get("/lorem").query("t", &"gif").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("image/gif");
        let (format, image) = decode(&body_bytes(resp).await);
        assert_eq!(format, ImageFormat::Gif);
        assert_eq!(image.dimensions(), (180, 120));
    }

    #[tokio::test]
    async fn lorem_unknown_format_is_jpeg() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli.get("/lorem").query("t", &"webp").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("image/jpeg");
        assert_eq!(decode(&body_bytes(resp).await).0, ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn lorem_bad_values_fall_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        for (w, h, fs) in [("0", "-5", "abc"), ("abc", "0", "-1"), ("", "", "")] {
            let resp = cli
                .get("/lorem")
                .query("w", &w)
                .query("h", &h)
                .query("fs", &fs)
                .query("t", &"png")
                .send()
                .await;
            resp.assert_status_is_ok();
            let (_, image) = decode(&body_bytes(resp).await);
            assert_eq!(image.dimensions(), (180, 120), "w={w:?} h={h:?}");
        }
    }

    #[tokio::test]
    async fn lorem_show_size_changes_image() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let fetch = |p: Option<&'static str>| {
            let mut req = cli.get("/lorem").query("s", &"Test").query("t", &"png");
            if let Some(p) = p {
                req = req.query("p", &p);
            }
            async move {
                let resp = req.send().await;
                resp.assert_status_is_ok();
                body_bytes(resp).await
            }
        };

        let absent = fetch(None).await;
        let zero = fetch(Some("0")).await;
        let one = fetch(Some("1")).await;
        assert_eq!(absent, zero);
        assert_ne!(absent, one);
    }

    #[tokio::test]
    async fn lorem_identical_requests_identical_bytes() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let mut bodies = Vec::new();
        for _ in 0..2 {
            let resp = cli
                .get("/lorem")
                .query("s", &"Same")
                .query("p", &1)
                .query("w", &64)
                .send()
                .await;
            resp.assert_status_is_ok();
            bodies.push(body_bytes(resp).await);
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn lorem_repeated_key_first_wins() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli.get("/lorem?w=50&w=70&t=png").send().await;
        resp.assert_status_is_ok();
        let (_, image) = decode(&body_bytes(resp).await);
        assert_eq!(image.width(), 50);
    }

    #[tokio::test]
    async fn lorem_backend_failure_is_500() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        // Width and height parse, but the canvas exceeds the pixel limit.
        let resp = cli
            .get("/lorem")
            .query("w", &u32::MAX)
            .query("h", &u32::MAX)
            .send()
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn lorem_oversized_canvas_is_500_and_server_keeps_serving() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        // 6.4 GB of RGBA; refused before allocation.
        cli.get("/lorem")
            .query("w", &40_000)
            .query("h", &40_000)
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let resp = cli.get("/lorem").query("t", &"png").send().await;
        resp.assert_status_is_ok();
        assert_eq!(decode(&body_bytes(resp).await).1.dimensions(), (180, 120));
    }

    #[tokio::test]
    async fn lorem_respects_configured_pixel_limit() {
        let tmp = TempDir::new().unwrap();
        let cli = client_with(&tmp, MockBackend::new().with_max_pixels(1_000));

        cli.get("/lorem")
            .query("w", &50)
            .query("h", &50)
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        cli.get("/lorem")
            .query("w", &20)
            .query("h", &50)
            .send()
            .await
            .assert_status_is_ok();
    }

    // =========================================================================
    // / and /assets
    // =========================================================================

    #[tokio::test]
    async fn home_serves_template() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli.get("/").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("text/html; charset=utf-8");
        resp.assert_text("<h1>LOREM</h1>").await;
    }

    #[tokio::test]
    async fn home_missing_template_is_500_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);
        std::fs::remove_file(tmp.path().join("home.html")).unwrap();

        let resp = cli.get("/").send().await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        // The server keeps answering other routes.
        cli.get("/lorem").send().await.assert_status_is_ok();
    }

    #[tokio::test]
    async fn assets_are_served() {
        let tmp = TempDir::new().unwrap();
        let cli = client(&tmp);

        let resp = cli.get("/assets/script.js").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("console.log('lorem');").await;

        cli.get("/assets/missing.js")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // =========================================================================
    // create_state
    // =========================================================================

    #[tokio::test]
    async fn create_state_missing_font_is_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = ServerConfig::default();
        config.assets.fonts_dir = tmp.path().join("fonts");

        let result = create_state(&config).await;
        assert!(matches!(result, Err(ServerError::Font(_))));
    }

    #[tokio::test]
    async fn create_state_missing_template_is_error() {
        let tmp = TempDir::new().unwrap();
        let config = font_config(&tmp);

        let result = create_state(&config).await;
        assert!(matches!(result, Err(ServerError::Page(PageError::Io { .. }))));
    }

    #[tokio::test]
    async fn create_state_loads_font_and_template() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("home.html"), "<h1>home</h1>").unwrap();
        let mut config = font_config(&tmp);
        config.encoding.max_pixels = 200 * 200;
        config.assets.static_dir = tmp.path().join("assets");

        let state = create_state(&config).await.unwrap();
        assert_eq!(state.landing.load_count(), 1);

        let cli = TestClient::new(create_endpoint(state, &config.assets.static_dir));
        cli.get("/").send().await.assert_text("<h1>home</h1>").await;

        let resp = cli
            .get("/lorem")
            .query("s", &"Test")
            .query("p", &1)
            .query("t", &"png")
            .send()
            .await;
        resp.assert_status_is_ok();
        let (format, image) = decode(&body_bytes(resp).await);
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(image.dimensions(), (180, 120));

        cli.get("/lorem")
            .query("w", &201)
            .query("h", &200)
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
