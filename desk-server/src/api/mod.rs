//! HTTP API routes for the WebDesk server

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{any, delete, get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

pub mod desktop;
pub mod posts;
pub mod proxy;
pub mod websocket;

use crate::api::websocket::WsSessions;
use crate::app_state::AppState;
use crate::content::ContentClient;

#[derive(Clone)]
pub struct ApiState {
    pub app_state: Arc<AppState>,
    pub ws_sessions: WsSessions,
    pub content: ContentClient,
    /// Outbound client shared by the dev proxy
    pub http: reqwest::Client,
    /// Upstream base the dev proxy forwards to
    pub content_api_base: String,
}

/// Configure all API routes
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws/{desktop_id}", get(websocket::ws_handler))
        // Desktop routes
        .route("/desktop/{desktop_id}", get(desktop::get_desktop_snapshot))
        .route(
            "/desktop/{desktop_id}/windows",
            get(desktop::get_windows).post(desktop::open_window),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}",
            delete(desktop::close_window),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}/position",
            patch(desktop::move_window),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}/size",
            patch(desktop::resize_window),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}/focus",
            post(desktop::focus_window),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}/minimize",
            post(desktop::toggle_minimized),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}/maximize",
            post(desktop::toggle_maximized),
        )
        .route(
            "/desktop/{desktop_id}/windows/{window_id}/restore",
            post(desktop::restore_window),
        )
        // Content routes
        .route("/posts", get(posts::get_posts))
        .route("/content-api/{*path}", any(proxy::proxy_content_api))
}

/// Health check endpoint
pub async fn health_check(State(_state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "desk-server",
            "version": "0.1.0"
        })),
    )
}
