use super::*;
use crate::config::Config;
use crate::error::FailureKind;
use crate::types::{PlaylistDownload, VideoDownload};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

mod files;
mod system;

/// Canned outcome a [`StubExtractor`] returns for every request.
enum StubOutcome {
    Video(VideoDownload),
    Playlist(PlaylistDownload),
    Failure(FailureKind, String),
    Fault,
}

/// Test double standing in for the yt-dlp adapter.
struct StubExtractor {
    outcome: StubOutcome,
    calls: AtomicUsize,
}

impl StubExtractor {
    fn with(outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    fn video(title: &str, filename: &str) -> Arc<Self> {
        Self::with(StubOutcome::Video(VideoDownload {
            title: title.to_string(),
            filename: filename.to_string(),
            file_path: PathBuf::from("/downloads").join(filename),
        }))
    }

    fn playlist(name: &str, total: usize, completed: usize) -> Arc<Self> {
        Self::with(StubOutcome::Playlist(PlaylistDownload {
            playlist_name: name.to_string(),
            total,
            completed,
            dir: PathBuf::from("/downloads").join(name),
        }))
    }

    fn failure(kind: FailureKind, message: &str) -> Arc<Self> {
        Self::with(StubOutcome::Failure(kind, message.to_string()))
    }

    fn fault() -> Arc<Self> {
        Self::with(StubOutcome::Fault)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn outcome_for_video(&self) -> crate::Result<VideoDownload> {
        match &self.outcome {
            StubOutcome::Video(video) => Ok(video.clone()),
            StubOutcome::Failure(kind, message) => Err(crate::Error::Extraction {
                kind: *kind,
                message: message.clone(),
            }),
            _ => Err(crate::Error::Other("stub fault".to_string())),
        }
    }

    fn outcome_for_playlist(&self) -> crate::Result<PlaylistDownload> {
        match &self.outcome {
            StubOutcome::Playlist(playlist) => Ok(playlist.clone()),
            StubOutcome::Failure(kind, message) => Err(crate::Error::Extraction {
                kind: *kind,
                message: message.clone(),
            }),
            _ => Err(crate::Error::Other("stub fault".to_string())),
        }
    }
}

#[async_trait]
impl crate::extractor::MediaExtractor for StubExtractor {
    async fn fetch_video(&self, _url: &str) -> crate::Result<VideoDownload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome_for_video()
    }

    async fn fetch_playlist(&self, _url: &str) -> crate::Result<PlaylistDownload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome_for_playlist()
    }
}

/// Router over a stub extractor and a fresh temporary downloads root.
fn test_router(stub: Arc<StubExtractor>) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router_at(stub, dir.path());
    (router, dir)
}

fn test_router_at(stub: Arc<StubExtractor>, downloads_root: &Path) -> Router {
    let mut config = Config::default();
    config.download.download_dir = downloads_root.to_path_buf();
    config.server.swagger_ui = false;
    create_router(stub, Arc::new(config))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let stub = StubExtractor::fault();
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.download.download_dir = dir.path().to_path_buf();
    config.server.swagger_ui = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = create_router(stub, Arc::new(config));
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "YouTube Downloader");

    server_handle.abort();
}

#[tokio::test]
async fn test_cors_headers_present_when_enabled() {
    let stub = StubExtractor::fault();
    let (app, _dir) = test_router(stub);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let stub = StubExtractor::fault();
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.download.download_dir = dir.path().to_path_buf();
    config.server.cors_enabled = false;
    config.server.swagger_ui = false;
    let app = create_router(stub, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
