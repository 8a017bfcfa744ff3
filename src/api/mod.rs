//! HTTP API server module
//!
//! Exposes the download orchestration endpoints, the file registry, and
//! service metadata over an axum router.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extractor::MediaExtractor;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Downloads
/// - `POST /download-video` - Download a single video
/// - `POST /download-playlist` - Download a playlist
///
/// ## Files
/// - `GET /list-files` - List every downloaded artifact
/// - `GET /download-playlist-files/:name` - List one playlist's artifacts
/// - `GET /download-file/:filename` - Stream one artifact
/// - `GET /downloads` - HTML listing page
///
/// ## System
/// - `GET /` - Service banner
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive documentation (if enabled)
pub fn create_router(extractor: Arc<dyn MediaExtractor>, config: Arc<Config>) -> Router {
    let state = AppState::new(extractor, config.clone());

    let router = Router::new()
        // Downloads
        .route("/download-video", post(routes::download_video))
        .route("/download-playlist", post(routes::download_playlist))
        // Files
        .route("/list-files", get(routes::list_files))
        .route(
            "/download-playlist-files/:name",
            get(routes::playlist_files),
        )
        .route("/download-file/:filename", get(routes::serve_file))
        .route("/downloads", get(routes::downloads_page))
        // System
        .route("/", get(routes::home))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    let router = if config.server.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.server.cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it, and serves the router until the server
/// stops. The downloads root is created first if it does not exist.
pub async fn start_api_server(
    extractor: Arc<dyn MediaExtractor>,
    config: Arc<Config>,
) -> Result<()> {
    let bind_address = config.server.bind_address;

    std::fs::create_dir_all(&config.download.download_dir)?;

    let app = create_router(extractor, config);

    let listener = TcpListener::bind(bind_address).await.map_err(Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
