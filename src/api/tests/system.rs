use super::*;

#[tokio::test]
async fn health_check_reports_healthy() {
    let (app, _dir) = test_router(StubExtractor::fault());

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "YouTube Downloader");
}

#[tokio::test]
async fn health_check_does_not_depend_on_downloads_root() {
    // Health must answer even when the downloads root is gone
    let dir = tempfile::tempdir().unwrap();
    let app = test_router_at(StubExtractor::fault(), &dir.path().join("never-created"));

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn home_reports_service_banner() {
    let (app, _dir) = test_router(StubExtractor::fault());

    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], routes::SERVICE_NAME);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_spec_lists_download_routes() {
    let (app, _dir) = test_router(StubExtractor::fault());

    let (status, body) = get_json(app, "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/download-video"));
    assert!(paths.contains_key("/download-playlist"));
    assert!(paths.contains_key("/list-files"));
}
