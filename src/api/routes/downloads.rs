//! Download orchestration handlers.
//!
//! Expected extraction failures (platform restrictions) are routine domain
//! outcomes, so they are returned as HTTP 200 with `status:"error"` and a
//! friendly message. Only missing input (400) and unanticipated server
//! faults (500) use non-200 codes.

use crate::api::AppState;
use crate::error::Error;
use crate::types::DownloadRequest;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Extract a usable URL from the request, or None when absent/blank.
fn requested_url(req: &DownloadRequest) -> Option<&str> {
    req.url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
}

/// POST /download-video - Download a single video
#[utoipa::path(
    post,
    path = "/download-video",
    tag = "downloads",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Download finished, or a classified extraction failure with status=error"),
        (status = 400, description = "No URL provided"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn download_video(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Response {
    let Some(url) = requested_url(&req) else {
        return Error::MissingUrl.into_response();
    };

    tracing::info!(url, "single download requested");
    match state.extractor.fetch_video(url).await {
        Ok(video) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "msg": format!("Downloaded {}", video.title),
                "filename": video.filename,
                "download_url": format!(
                    "/download-file/{}",
                    urlencoding::encode(&video.filename)
                ),
            })),
        )
            .into_response(),
        Err(Error::Extraction { kind, message }) => (
            StatusCode::OK,
            Json(json!({
                "status": "error",
                "msg": kind.friendly_message(&message),
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /download-playlist - Download an enumerated playlist
///
/// Partial failure within the playlist is expected and non-fatal: the
/// response reports how many items produced a playable artifact out of how
/// many were enumerated.
#[utoipa::path(
    post,
    path = "/download-playlist",
    tag = "downloads",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Playlist download finished (possibly partially), or a classified extraction failure with status=error"),
        (status = 400, description = "No URL provided"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn download_playlist(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Response {
    let Some(url) = requested_url(&req) else {
        return Error::MissingUrl.into_response();
    };

    tracing::info!(url, "playlist download requested");
    match state.extractor.fetch_playlist(url).await {
        Ok(playlist) => {
            // The link must name the on-disk directory, not the raw engine
            // title, which may contain path separators.
            let dir_name = playlist
                .dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| playlist.playlist_name.clone());
            let download_url =
                format!("/download-playlist-files/{}", urlencoding::encode(&dir_name));
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "msg": format!(
                        "Downloaded {} of {} videos",
                        playlist.completed, playlist.total
                    ),
                    "playlist_name": dir_name,
                    "download_count": playlist.completed,
                    "download_url": download_url,
                })),
            )
                .into_response()
        }
        Err(Error::Extraction { kind, message }) => (
            StatusCode::OK,
            Json(json!({
                "status": "error",
                "msg": kind.friendly_message(&message),
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
