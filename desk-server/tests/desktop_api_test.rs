//! Desktop API Integration Tests
//!
//! Tests full HTTP request/response cycles for the window endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use desk_server::api;
use desk_server::app_state::AppState;
use desk_server::content::ContentClient;

/// Generate a unique test desktop ID
fn test_desktop_id() -> String {
    format!("test-desktop-{}", uuid::Uuid::new_v4())
}

fn setup_test_app() -> axum::Router {
    let app_state = Arc::new(AppState::new());
    let ws_sessions: api::websocket::WsSessions =
        Arc::new(tokio::sync::Mutex::new(HashMap::new()));
    // Nothing listens on this port; content queries degrade to empty lists.
    let content = ContentClient::new("http://127.0.0.1:1", None, "db-test");

    let api_state = api::ApiState {
        app_state,
        ws_sessions,
        content,
        http: reqwest::Client::new(),
        content_api_base: "http://127.0.0.1:1".to_string(),
    };

    api::router().with_state(api_state)
}

async fn json_response(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value: Value = serde_json::from_slice(&body).expect("Invalid JSON response");
    (status, value)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn open_window(app: &axum::Router, desktop_id: &str, spec: Value) -> Value {
    let (status, body) = json_response(
        app,
        json_request("POST", &format!("/desktop/{desktop_id}/windows"), spec),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());
    body["window"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app();

    let (status, body) = json_response(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "desk-server");
}

#[tokio::test]
async fn test_get_desktop_snapshot_empty() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let (status, body) =
        json_response(&app, empty_request("GET", &format!("/desktop/{desktop_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["desktop"]["windows"], json!([]));
    assert_eq!(body["desktop"]["active_window"], Value::Null);
}

#[tokio::test]
async fn test_open_window_defaults() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let window = open_window(&app, &desktop_id, json!({})).await;

    assert_eq!(window["title"], "Untitled");
    assert_eq!(window["x"], 100);
    assert_eq!(window["y"], 100);
    assert_eq!(window["width"], 850);
    assert_eq!(window["height"], 800);
    assert_eq!(window["route"], "/");
    assert_eq!(window["minimized"], false);
    assert_eq!(window["maximized"], false);
    assert_eq!(window["closed"], false);
}

#[tokio::test]
async fn test_open_window_with_overrides() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let window = open_window(
        &app,
        &desktop_id,
        json!({"title": "Blog", "x": 20, "y": 30, "width": 600, "height": 400}),
    )
    .await;

    assert_eq!(window["title"], "Blog");
    assert_eq!(window["x"], 20);
    assert_eq!(window["y"], 30);
    assert_eq!(window["width"], 600);
    assert_eq!(window["height"], 400);
}

#[tokio::test]
async fn test_close_then_restore_resets_defaults() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let window = open_window(&app, &desktop_id, json!({"title": "Blog"})).await;
    let window_id = window["id"].as_str().unwrap().to_string();

    // Drift geometry, then close.
    let (status, _) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/desktop/{desktop_id}/windows/{window_id}/position"),
            json!({"x": 400, "y": 500}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = json_response(
        &app,
        empty_request(
            "DELETE",
            &format!("/desktop/{desktop_id}/windows/{window_id}"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["closed"], true);

    let (status, body) = json_response(
        &app,
        empty_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/{window_id}/restore"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["closed"], false);
    assert_eq!(body["window"]["x"], 100);
    assert_eq!(body["window"]["y"], 100);
    assert_eq!(body["window"]["width"], 850);
    assert_eq!(body["window"]["height"], 800);
    assert_eq!(body["window"]["route"], "/");
    assert_eq!(body["navigate"], "/");
}

#[tokio::test]
async fn test_focus_raises_z_monotonically() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let first = open_window(&app, &desktop_id, json!({})).await;
    let second = open_window(&app, &desktop_id, json!({})).await;
    let first_id = first["id"].as_str().unwrap();
    let second_z = second["z_index"].as_u64().unwrap();

    let (status, body) = json_response(
        &app,
        empty_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/{first_id}/focus"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["window"]["z_index"].as_u64().unwrap() > second_z);
}

#[tokio::test]
async fn test_maximize_toggle_roundtrip() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let window = open_window(&app, &desktop_id, json!({})).await;
    let window_id = window["id"].as_str().unwrap().to_string();

    let (status, body) = json_response(
        &app,
        json_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/{window_id}/maximize"),
            json!({"viewport": {"x": 0, "y": 0, "width": 1280, "height": 720}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["maximized"], true);
    assert_eq!(body["window"]["width"], 1280);
    assert_eq!(body["window"]["height"], 720);

    let (status, body) = json_response(
        &app,
        json_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/{window_id}/maximize"),
            json!({"viewport": {"x": 0, "y": 0, "width": 1280, "height": 720}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["maximized"], false);
    assert_eq!(body["window"]["x"], 100);
    assert_eq!(body["window"]["y"], 100);
    assert_eq!(body["window"]["width"], 850);
    assert_eq!(body["window"]["height"], 800);
}

#[tokio::test]
async fn test_minimize_toggle() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let window = open_window(&app, &desktop_id, json!({})).await;
    let window_id = window["id"].as_str().unwrap().to_string();

    let (status, body) = json_response(
        &app,
        empty_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/{window_id}/minimize"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["minimized"], true);

    let (status, body) = json_response(
        &app,
        empty_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/{window_id}/minimize"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["minimized"], false);
}

#[tokio::test]
async fn test_unknown_window_id_is_silent_noop() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();
    open_window(&app, &desktop_id, json!({})).await;

    let (status, body) = json_response(
        &app,
        empty_request(
            "POST",
            &format!("/desktop/{desktop_id}/windows/missing/focus"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["window"], Value::Null);

    let (status, body) = json_response(
        &app,
        empty_request("DELETE", &format!("/desktop/{desktop_id}/windows/missing")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["window"], Value::Null);

    // The one real window is untouched.
    let (_, body) = json_response(
        &app,
        empty_request("GET", &format!("/desktop/{desktop_id}/windows")),
    )
    .await;
    assert_eq!(body["windows"].as_array().unwrap().len(), 1);
    assert_eq!(body["windows"][0]["closed"], false);
}

#[tokio::test]
async fn test_move_and_resize_endpoints() {
    let app = setup_test_app();
    let desktop_id = test_desktop_id();

    let window = open_window(&app, &desktop_id, json!({})).await;
    let window_id = window["id"].as_str().unwrap().to_string();

    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/desktop/{desktop_id}/windows/{window_id}/position"),
            json!({"x": -50, "y": 9999}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Bounds are not validated server-side.
    assert_eq!(body["window"]["x"], -50);
    assert_eq!(body["window"]["y"], 9999);

    let (status, body) = json_response(
        &app,
        json_request(
            "PATCH",
            &format!("/desktop/{desktop_id}/windows/{window_id}/size"),
            json!({"width": 10, "height": 10}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["width"], 10);
    assert_eq!(body["window"]["height"], 10);
}
