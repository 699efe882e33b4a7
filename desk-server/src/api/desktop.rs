//! Desktop API endpoints
//!
//! Thin HTTP adapters over the DesktopActor: call the actor, broadcast the
//! resulting event to WebSocket subscribers, answer with a JSON envelope.
//!
//! Actions on unknown window ids reply success with `"window": null` and
//! broadcast nothing — the store treats missing ids as no-ops rather than
//! errors.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::actors::desktop::DesktopActorMsg;
use crate::api::websocket::{broadcast_event, WsMessage};
use crate::api::ApiState;
use shared_types::{OpenWindowSpec, WindowBounds};

/// Geometry used for maximize when the request does not carry the viewport.
const FALLBACK_VIEWPORT: WindowBounds = WindowBounds {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

async fn get_desktop_actor(
    state: &ApiState,
    desktop_id: &str,
) -> Result<ractor::ActorRef<DesktopActorMsg>, axum::response::Response> {
    state
        .app_state
        .get_or_create_desktop(desktop_id.to_string())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": format!("Failed to get desktop: {e}")
                })),
            )
                .into_response()
        })
}

fn actor_error(e: impl std::fmt::Display) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": format!("Actor error: {e}")
        })),
    )
        .into_response()
}

/// Request to move a window
#[derive(Debug, Deserialize)]
pub struct MoveWindowRequest {
    pub x: i32,
    pub y: i32,
}

/// Request to resize a window
#[derive(Debug, Deserialize)]
pub struct ResizeWindowRequest {
    pub width: i32,
    pub height: i32,
}

/// Request to maximize a window; carries the browser viewport
#[derive(Debug, Default, Deserialize)]
pub struct MaximizeWindowRequest {
    #[serde(default)]
    pub viewport: Option<WindowBounds>,
}

/// Get the full desktop snapshot
pub async fn get_desktop_snapshot(
    Path(desktop_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::GetDesktopSnapshot {
        reply
    }) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "desktop": snapshot
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Get all windows for a desktop
pub async fn get_windows(
    Path(desktop_id): Path<String>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::GetWindows { reply }) {
        Ok(windows) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "windows": windows
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Open a new window
pub async fn open_window(
    Path(desktop_id): Path<String>,
    State(state): State<ApiState>,
    Json(spec): Json<OpenWindowSpec>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::OpenWindow {
        spec: spec.clone(),
        reply,
    }) {
        Ok(window) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowOpened {
                    window: window.clone(),
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Err(e) => actor_error(e),
    }
}

/// Close a window (soft delete)
pub async fn close_window(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::CloseWindow {
        window_id: window_id.clone(),
        reply,
    }) {
        Ok(Some(window)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowClosed {
                    window_id: window.id.clone(),
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Move a window
pub async fn move_window(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
    Json(req): Json<MoveWindowRequest>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::MoveWindow {
        window_id: window_id.clone(),
        x: req.x,
        y: req.y,
        reply,
    }) {
        Ok(Some(window)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowMoved {
                    window_id: window.id.clone(),
                    x: window.x,
                    y: window.y,
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Resize a window
pub async fn resize_window(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
    Json(req): Json<ResizeWindowRequest>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::ResizeWindow {
        window_id: window_id.clone(),
        width: req.width,
        height: req.height,
        reply,
    }) {
        Ok(Some(window)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowResized {
                    window_id: window.id.clone(),
                    width: window.width,
                    height: window.height,
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Focus a window (bring to front)
pub async fn focus_window(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::FocusWindow {
        window_id: window_id.clone(),
        reply,
    }) {
        Ok(Some(window)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowFocused {
                    window_id: window.id.clone(),
                    z_index: window.z_index,
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Toggle the minimized flag of a window
pub async fn toggle_minimized(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::ToggleMinimized {
        window_id: window_id.clone(),
        reply,
    }) {
        Ok(Some(window)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowMinimized {
                    window: window.clone(),
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Toggle the maximized flag of a window
pub async fn toggle_maximized(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
    body: Option<Json<MaximizeWindowRequest>>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let viewport = body
        .and_then(|Json(req)| req.viewport)
        .unwrap_or(FALLBACK_VIEWPORT);

    match ractor::call!(desktop, |reply| DesktopActorMsg::ToggleMaximized {
        window_id: window_id.clone(),
        viewport,
        reply,
    }) {
        Ok(Some(window)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowMaximized {
                    window: window.clone(),
                },
            )
            .await;

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": window
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}

/// Restore a window, reviving it from closed if needed
pub async fn restore_window(
    Path((desktop_id, window_id)): Path<(String, String)>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    let desktop = match get_desktop_actor(&state, &desktop_id).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match ractor::call!(desktop, |reply| DesktopActorMsg::RestoreWindow {
        window_id: window_id.clone(),
        reply,
    }) {
        Ok(Some(restored)) => {
            broadcast_event(
                &state.ws_sessions,
                &desktop_id,
                WsMessage::WindowRestored {
                    window: restored.window.clone(),
                },
            )
            .await;

            if let Some(route) = &restored.navigate {
                broadcast_event(
                    &state.ws_sessions,
                    &desktop_id,
                    WsMessage::Navigate {
                        route: route.clone(),
                    },
                )
                .await;
            }

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "window": restored.window,
                    "navigate": restored.navigate
                })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "window": null,
                "navigate": null
            })),
        )
            .into_response(),
        Err(e) => actor_error(e),
    }
}
