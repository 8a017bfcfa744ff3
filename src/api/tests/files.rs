use super::*;
use std::fs;

fn write(root: &Path, relative: &str, bytes: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

#[tokio::test]
async fn list_files_on_empty_root() {
    let (app, _dir) = test_router(StubExtractor::fault());

    let (status, body) = get_json(app, "/list-files").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 0);
    assert_eq!(body["files"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn list_files_reports_nested_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "solo.mp4", b"aaaa");
    write(dir.path(), "Mix/1 - first.mp4", b"bb");
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let (status, body) = get_json(app, "/list-files").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let files = body["files"].as_array().unwrap();
    let nested = files
        .iter()
        .find(|f| f["filename"] == "1 - first.mp4")
        .unwrap();
    assert_eq!(nested["parent_collection"], "Mix");
    assert_eq!(nested["relative_path"], "Mix/1 - first.mp4");
    assert_eq!(nested["size_bytes"], 2);
}

#[tokio::test]
async fn serve_file_streams_with_content_type() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "clip.mp4", b"fake mp4 bytes");
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download-file/clip.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "video/mp4"
    );
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("clip.mp4"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"fake mp4 bytes");
}

#[tokio::test]
async fn serve_file_delivers_large_artifacts_intact() {
    let dir = tempfile::tempdir().unwrap();
    let payload = vec![0x5au8; 1 << 20];
    write(dir.path(), "big.mkv", &payload);
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download-file/big.mkv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "video/x-matroska"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.len(), payload.len());
    assert_eq!(&bytes[..], &payload[..]);
}

#[tokio::test]
async fn serve_file_finds_playlist_items_recursively() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Mix/2 - song.m4a", b"audio");
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download-file/2%20-%20song.m4a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "audio/mp4"
    );
}

#[tokio::test]
async fn serve_file_traversal_is_404() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("downloads");
    fs::create_dir_all(&root).unwrap();
    // A file outside the downloads root that traversal would target
    fs::write(outer.path().join("secret"), b"top secret").unwrap();
    let app = test_router_at(StubExtractor::fault(), &root);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download-file/evil%2F..%2F..%2Fsecret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(
        !body.windows(10).any(|w| w == b"top secret"),
        "traversal must not read outside the downloads root"
    );
}

#[tokio::test]
async fn serve_file_unknown_name_is_404() {
    let (app, _dir) = test_router(StubExtractor::fault());

    let (status, body) = get_json(app, "/download-file/ghost.mp4").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn playlist_files_lists_one_collection() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Mix/1 - a.mp4", b"a");
    write(dir.path(), "Mix/2 - b.mp4", b"b");
    write(dir.path(), "Other/3 - c.mp4", b"c");
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let (status, body) = get_json(app, "/download-playlist-files/Mix").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["playlist_name"], "Mix");
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn playlist_files_resolves_percent_encoded_name() {
    // The download handler hands out percent-encoded links; they must route
    // back to the same directory.
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "AC_DC Hits/1 - a.mp4", b"a");
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let (status, body) = get_json(app, "/download-playlist-files/AC_DC%20Hits").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playlist_name"], "AC_DC Hits");
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn playlist_files_missing_collection_is_404() {
    let (app, _dir) = test_router(StubExtractor::fault());

    let (status, body) = get_json(app, "/download-playlist-files/ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn downloads_page_renders_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "clip.mp4", b"x");
    let app = test_router_at(StubExtractor::fault(), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("clip.mp4"));
    assert!(html.contains("/download-file/clip.mp4"));
}
