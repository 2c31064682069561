//! The wizard router driven in-process with `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use fazenda_installer::domain::InstallerConfig;
use fazenda_installer::infra::command_runner::TokioCommandRunner;
use fazenda_installer::infra::fs::HostFs;
use fazenda_installer::server::{AppState, router};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tokio::sync::Notify;
use tower::ServiceExt;

fn state(dir: &TempDir) -> Arc<AppState> {
    Arc::new(AppState {
        runner: TokioCommandRunner::new(Duration::from_secs(30)),
        fs: HostFs,
        config: InstallerConfig::default(),
        install_path: dir.path().to_path_buf(),
        entry_file: "fazenda-install".to_string(),
        shutdown: Notify::new(),
    })
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = TempDir::new().expect("tempdir");
    let response = router(state(&dir)).oneshot(get("/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_serves_the_wizard() {
    let dir = TempDir::new().expect("tempdir");
    let response = router(state(&dir)).oneshot(get("/")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let page = String::from_utf8_lossy(&bytes);
    assert!(page.contains("check_environment"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let response = router(state(&dir)).oneshot(get("/setup.php")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let response = router(state(&dir))
        .oneshot(post_json("/api/phase", r#"{"action":"rollback"}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let request = Request::builder()
        .method("POST")
        .uri("/api/phase")
        .body(Body::from(r#"{"action":"check_environment"}"#))
        .expect("request");
    let response = router(state(&dir)).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn check_environment_returns_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let response = router(state(&dir))
        .oneshot(post_json("/api/phase", r#"{"action":"check_environment"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["succeeded"], true);
    assert_eq!(json["installPath"], dir.path().to_string_lossy().as_ref());
    assert!(json["violations"].is_array());
}

#[tokio::test]
async fn root_post_dispatches_like_the_api() {
    let dir = TempDir::new().expect("tempdir");
    let response = router(state(&dir))
        .oneshot(post_json("/", r#"{"action":"finish_installation"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["succeeded"], true);
    assert_eq!(json["message"], "Installation complete.");
}

#[tokio::test]
async fn finish_with_removal_then_cleanup_redirects() {
    let dir = TempDir::new().expect("tempdir");
    let entry = dir.path().join("fazenda-install");
    std::fs::write(&entry, "#!/bin/sh\n").expect("write entry");
    let state = state(&dir);

    let response = router(Arc::clone(&state))
        .oneshot(post_json(
            "/api/phase",
            r#"{"action":"finish_installation","removeInstaller":true}"#,
        ))
        .await
        .expect("response");
    assert_eq!(body_json(response).await["redirectTarget"], "cleanup");
    assert!(dir.path().join("remove-installer.sh").exists());

    let response = router(Arc::clone(&state))
        .oneshot(get("/cleanup"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().contains_key(header::LOCATION));
    assert!(!entry.exists());
    assert!(!dir.path().join("remove-installer.sh").exists());
    // The shutdown notification was stored for the serve loop.
    tokio::time::timeout(Duration::from_secs(1), state.shutdown.notified())
        .await
        .expect("shutdown signalled");
}

#[tokio::test]
async fn cleanup_without_script_keeps_serving() {
    let dir = TempDir::new().expect("tempdir");
    let state = state(&dir);

    let response = router(Arc::clone(&state))
        .oneshot(get("/cleanup"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().contains_key(header::LOCATION));
    let signalled = tokio::time::timeout(Duration::from_millis(200), state.shutdown.notified())
        .await
        .is_ok();
    assert!(!signalled, "cleanup without a script must not stop the server");
}
