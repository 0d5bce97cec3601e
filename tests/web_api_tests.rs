//! Integration tests for the Quadmap Web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use quadmap::display::PngSink;
use quadmap::web::{create_router, AppState};

mod fixtures;
use fixtures::{many_rows, quadstick_csv, sample_rows, test_config, write_csv};

const BOUNDARY: &str = "quadmap-test-boundary";

/// Creates a test AppState with temporary sources and output directories.
fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);
    let sink = PngSink::new(config.paths.output_dir.clone());

    let state = AppState::new(config, Box::new(sink)).expect("Failed to create app state");

    (state, temp_dir)
}

/// Helper to send a request and get the response body as JSON.
async fn send_json(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request and get the response body as JSON.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send_json(app, request).await
}

/// Helper to POST a render request.
async fn post_render(app: &axum::Router, filename: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/render")
        .header("Content-Type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({ "selected_file": filename })).unwrap(),
        ))
        .unwrap();
    send_json(app, request).await
}

/// Helper to upload a file as multipart form data.
async fn post_upload(
    app: &axum::Router,
    field: &str,
    filename: &str,
    contents: &str,
) -> (StatusCode, Value) {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/sources")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send_json(app, request).await
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_index_page_is_served() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

// ============================================================================
// Source Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_list_sources_empty() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/sources").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["sources"].as_array().unwrap().is_empty());
    assert!(json["selected"].is_null());
}

#[tokio::test]
async fn test_list_sources_sorted() {
    let (state, _temp_dir) = create_test_state();
    let sources_dir = state.config().paths.sources_dir.clone();
    write_csv(&sources_dir, "zulu.csv", "Z", &sample_rows());
    write_csv(&sources_dir, "alpha.csv", "A", &sample_rows());
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/sources").await;

    assert_eq!(status, StatusCode::OK);
    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["filename"], "alpha.csv");
    assert_eq!(sources[1]["filename"], "zulu.csv");
    assert!(sources[0]["size"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_upload_source() {
    let (state, _temp_dir) = create_test_state();
    let catalog = state.catalog().clone();
    let app = create_router(state);

    let contents = quadstick_csv("Uploaded", &sample_rows());
    let (status, json) = post_upload(&app, "file", "new profile.csv", &contents).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["filename"], "new_profile.csv");
    assert!(catalog.contains("new_profile.csv"));
}

#[tokio::test]
async fn test_upload_rejects_other_extensions() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = post_upload(&app, "file", "profile.txt", "a,b,c").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains(".csv"));
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = post_upload(&app, "document", "profile.csv", "a,b,c").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part");
}

#[tokio::test]
async fn test_upload_requires_filename() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, _) = post_upload(&app, "file", "", "a,b,c").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Render Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_render_source() {
    let (state, _temp_dir) = create_test_state();
    let config = state.config().clone();
    write_csv(&config.paths.sources_dir, "game.csv", "Game", &sample_rows());
    let app = create_router(state);

    let (status, json) = post_render(&app, "game.csv").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Game");
    assert_eq!(json["rows"], 2);
    assert_eq!(json["fit"]["policy"], "native");
    assert!(config.paths.output_dir.join(PngSink::COMPOSITE).exists());

    let (_, json) = get_json(&app, "/api/sources").await;
    assert_eq!(json["selected"], "game.csv");
}

#[tokio::test]
async fn test_render_reports_downscale() {
    let (state, _temp_dir) = create_test_state();
    let rows = many_rows(40);
    let rows: Vec<(&str, &str)> = rows.iter().map(|(i, o)| (i.as_str(), o.as_str())).collect();
    write_csv(&state.config().paths.sources_dir, "long.csv", "Long", &rows);
    let app = create_router(state);

    let (status, json) = post_render(&app, "long.csv").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rows"], 40);
    assert_eq!(json["fit"]["policy"], "downscaled");
    assert_eq!(json["fit"]["natural_height"], 720);
}

#[tokio::test]
async fn test_render_not_found() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = post_render(&app, "missing.csv").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_render_path_traversal_rejected() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, json) = post_render(&app, "../config.toml").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["details"]
        .as_str()
        .unwrap()
        .contains("path traversal not allowed"));
}

#[tokio::test]
async fn test_render_malformed_source() {
    let (state, _temp_dir) = create_test_state();
    let sources_dir = state.config().paths.sources_dir.clone();
    std::fs::create_dir_all(&sources_dir).unwrap();
    std::fs::write(sources_dir.join("empty.csv"), "").unwrap();
    let app = create_router(state);

    let (status, _) = post_render(&app, "empty.csv").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_concurrent_renders_all_complete() {
    let (state, _temp_dir) = create_test_state();
    write_csv(&state.config().paths.sources_dir, "game.csv", "Game", &sample_rows());
    let app = create_router(state);

    let (a, b, c) = tokio::join!(
        post_render(&app, "game.csv"),
        post_render(&app, "game.csv"),
        post_render(&app, "game.csv")
    );

    for (status, _) in [a, b, c] {
        assert_eq!(status, StatusCode::OK);
    }
}

// ============================================================================
// Preview Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_preview_returns_png() {
    let (state, _temp_dir) = create_test_state();
    write_csv(&state.config().paths.sources_dir, "game.csv", "Game", &sample_rows());
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sources/game.csv/preview")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_preview_not_found() {
    let (state, _temp_dir) = create_test_state();
    let app = create_router(state);

    let (status, _) = get_json(&app, "/api/sources/missing.csv/preview").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
