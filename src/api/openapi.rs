//! OpenAPI documentation for the HTTP API

use utoipa::OpenApi;

/// OpenAPI document aggregating all annotated routes and schemas
#[derive(OpenApi)]
#[openapi(
    info(
        title = "tube-dl HTTP API",
        description = "Download orchestration service around the yt-dlp extraction engine",
        license(name = "MIT OR Apache-2.0")
    ),
    paths(
        crate::api::routes::download_video,
        crate::api::routes::download_playlist,
        crate::api::routes::list_files,
        crate::api::routes::playlist_files,
        crate::api::routes::serve_file,
        crate::api::routes::downloads_page,
        crate::api::routes::health_check,
        crate::api::routes::home,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::DownloadRequest,
        crate::types::StoredArtifact,
        crate::error::ApiError,
        crate::error::FailureKind,
    )),
    tags(
        (name = "downloads", description = "Download orchestration"),
        (name = "files", description = "Artifact listing and retrieval"),
        (name = "system", description = "Health and service metadata"),
    )
)]
pub struct ApiDoc;
