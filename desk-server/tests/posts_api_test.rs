//! Posts API Integration Tests
//!
//! Drives the /posts endpoint against a stub upstream and against an
//! unreachable one; the endpoint must answer 200 either way.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use desk_server::api;
use desk_server::app_state::AppState;
use desk_server::content::ContentClient;

fn test_app(content_base: &str) -> axum::Router {
    let api_state = api::ApiState {
        app_state: Arc::new(AppState::new()),
        ws_sessions: Arc::new(tokio::sync::Mutex::new(HashMap::new())),
        content: ContentClient::new(content_base, Some("test-token".to_string()), "db-test"),
        http: reqwest::Client::new(),
        content_api_base: content_base.to_string(),
    };
    api::router().with_state(api_state)
}

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn get_posts(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Request failed");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, serde_json::from_slice(&body).expect("Invalid JSON"))
}

#[tokio::test]
async fn test_posts_returns_upstream_results() {
    let stub = Router::new().route(
        "/v1/databases/{database_id}/query",
        post(|Json(body): Json<Value>| async move {
            // Echo the requested direction back through the fixture ids so
            // the assertion below proves the sort parameter reached upstream.
            let direction = body["sorts"][0]["direction"].as_str().unwrap_or("").to_string();
            Json(serde_json::json!({
                "results": [{
                    "id": format!("page-{direction}"),
                    "created_time": "2024-05-01T12:00:00.000Z",
                    "properties": {"Name": {"title": [{"plain_text": "Hello"}]}}
                }]
            }))
        }),
    );
    let base = spawn_stub(stub).await;
    let app = test_app(&base);

    let (status, body) = get_posts(&app, "/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());
    // Default sort is descending.
    assert_eq!(body["posts"][0]["id"], "page-descending");

    let (status, body) = get_posts(&app, "/posts?sort=ascending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"][0]["id"], "page-ascending");
}

#[tokio::test]
async fn test_posts_degrades_to_empty_list_when_upstream_down() {
    let app = test_app("http://127.0.0.1:1");

    let (status, body) = get_posts(&app, "/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);
}
