//! WebSocket API for real-time desktop events
//!
//! Subscribers attach per desktop id; every window mutation handled over
//! HTTP is fanned out here, along with the `navigate` command emitted by
//! restore. State mutation stays in the actor — this layer only relays.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::api::ApiState;
use shared_types::{DesktopSnapshot, WindowRecord};

/// Shared state for WebSocket sessions, keyed by desktop id
pub type WsSessions = Arc<Mutex<HashMap<String, Vec<mpsc::UnboundedSender<String>>>>>;

/// WebSocket message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    // Client -> Server
    Ping,

    // Server -> Client
    Pong,
    DesktopSnapshot { desktop: DesktopSnapshot },
    WindowOpened { window: WindowRecord },
    WindowClosed { window_id: String },
    WindowMoved { window_id: String, x: i32, y: i32 },
    WindowResized { window_id: String, width: i32, height: i32 },
    WindowFocused { window_id: String, z_index: u32 },
    WindowMinimized { window: WindowRecord },
    WindowMaximized { window: WindowRecord },
    WindowRestored { window: WindowRecord },
    /// Routing command consumed by the UI router
    Navigate { route: String },
    Error { message: String },
}

/// WebSocket handler
pub async fn ws_handler(
    Path(desktop_id): Path<String>,
    State(state): State<ApiState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let sessions = state.ws_sessions.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, desktop_id, sessions))
}

async fn handle_socket(socket: WebSocket, desktop_id: String, sessions: WsSessions) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let pong_tx = tx.clone();
    sessions
        .lock()
        .await
        .entry(desktop_id.clone())
        .or_default()
        .push(tx);

    tracing::info!(%desktop_id, "WebSocket subscriber connected");

    let (mut sink, mut stream) = socket.split();

    // Broadcast channel -> socket
    let forward = async {
        while let Some(json) = rx.recv().await {
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    };

    // Socket -> keepalive handling
    let receive = async {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => {
                    if matches!(
                        serde_json::from_str::<WsMessage>(text.as_str()),
                        Ok(WsMessage::Ping)
                    ) {
                        if let Ok(json) = serde_json::to_string(&WsMessage::Pong) {
                            if pong_tx.send(json).is_err() {
                                break;
                            }
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    };

    tokio::select! {
        _ = forward => {},
        _ = receive => {},
    }

    // Drop dead senders for this desktop.
    let mut guard = sessions.lock().await;
    if let Some(subscribers) = guard.get_mut(&desktop_id) {
        subscribers.retain(|sender| !sender.is_closed());
        if subscribers.is_empty() {
            guard.remove(&desktop_id);
        }
    }

    tracing::info!(%desktop_id, "WebSocket subscriber disconnected");
}

/// Broadcast an event to all subscribers of a desktop
pub async fn broadcast_event(sessions: &WsSessions, desktop_id: &str, event: WsMessage) {
    let json = match serde_json::to_string(&event) {
        Ok(j) => j,
        Err(e) => {
            tracing::error!("Failed to serialize WS message: {}", e);
            return;
        }
    };

    let mut guard = sessions.lock().await;
    if let Some(subscribers) = guard.get_mut(desktop_id) {
        subscribers.retain(|sender| sender.send(json.clone()).is_ok());
    }
}
