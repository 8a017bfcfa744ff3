//! Artifact listing and retrieval handlers.
//!
//! Every handler rescans the downloads root; nothing is cached, since
//! concurrent downloads can change the tree between requests. Scans are
//! filesystem walks, so they run on the blocking pool.

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::registry;
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use tokio_util::io::ReaderStream;

/// Run a registry scan on the blocking pool.
async fn scan<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(format!("artifact scan failed: {e}")))
}

/// GET /list-files - Enumerate every downloaded artifact
#[utoipa::path(
    get,
    path = "/list-files",
    tag = "files",
    responses(
        (status = 200, description = "All artifacts under the downloads root", body = Vec<crate::types::StoredArtifact>)
    )
)]
pub async fn list_files(State(state): State<AppState>) -> Response {
    let root = state.config.download.download_dir.clone();
    let files = match scan(move || registry::list_all(&root)).await {
        Ok(files) => files,
        Err(e) => return e.into_response(),
    };
    let count = files.len();
    Json(json!({
        "status": "success",
        "files": files,
        "count": count,
    }))
    .into_response()
}

/// GET /download-playlist-files/:name - List one playlist's artifacts
#[utoipa::path(
    get,
    path = "/download-playlist-files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "Playlist directory name")
    ),
    responses(
        (status = 200, description = "Immediate files of the playlist directory"),
        (status = 404, description = "No such playlist")
    )
)]
pub async fn playlist_files(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let root = state.config.download.download_dir.clone();
    let dir_name = name.clone();
    let listed = match scan(move || registry::list_for_collection(&root, &dir_name)).await {
        Ok(listed) => listed,
        Err(e) => return e.into_response(),
    };
    match listed {
        Some(files) => {
            let count = files.len();
            Json(json!({
                "status": "success",
                "playlist_name": name,
                "files": files,
                "count": count,
            }))
            .into_response()
        }
        None => Error::NotFound(format!("playlist {name:?}")).into_response(),
    }
}

/// GET /download-file/:filename - Stream one artifact
///
/// The filename is reduced to its base name before resolution, so
/// path-escaping input can never read outside the downloads root. The body
/// is streamed from disk; artifacts can be multi-gigabyte and must never be
/// buffered whole.
#[utoipa::path(
    get,
    path = "/download-file/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Artifact file name")
    ),
    responses(
        (status = 200, description = "Binary file stream, content type derived from the extension"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn serve_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let root = state.config.download.download_dir.clone();
    let requested = filename.clone();
    let resolved = match scan(move || registry::resolve(&root, &requested)).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };
    let Some(path) = resolved else {
        return Error::NotFound(format!("file {filename:?}")).into_response();
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to open artifact");
            return Error::Io(e).into_response();
        }
    };

    let basename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(filename);

    let body = Body::from_stream(ReaderStream::new(file));

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                registry::content_type_for(&basename).to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition(&basename)),
        ],
        body,
    )
        .into_response()
}

fn disposition(basename: &str) -> String {
    format!("attachment; filename=\"{}\"", basename.replace('"', ""))
}

/// GET /downloads - Human-browsable HTML listing of downloaded artifacts
#[utoipa::path(
    get,
    path = "/downloads",
    tag = "files",
    responses(
        (status = 200, description = "HTML listing page", body = String, content_type = "text/html")
    )
)]
pub async fn downloads_page(State(state): State<AppState>) -> Response {
    let root = state.config.download.download_dir.clone();
    let files = match scan(move || registry::list_all(&root)).await {
        Ok(files) => files,
        Err(e) => return e.into_response(),
    };

    let mut rows = String::new();
    for artifact in &files {
        let label = match &artifact.parent_collection {
            Some(collection) => format!("{} / {}", escape(collection), escape(&artifact.filename)),
            None => escape(&artifact.filename),
        };
        rows.push_str(&format!(
            "<li><a href=\"/download-file/{name}\">{label}</a> ({size} bytes)</li>\n",
            name = urlencoding::encode(&artifact.filename),
            size = artifact.size_bytes,
        ));
    }
    if rows.is_empty() {
        rows.push_str("<li>No downloads yet</li>\n");
    }

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Downloads</title></head>\n<body>\n\
         <h1>Downloaded files ({count})</h1>\n<ul>\n{rows}</ul>\n</body>\n</html>\n",
        count = files.len(),
    ))
    .into_response()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
