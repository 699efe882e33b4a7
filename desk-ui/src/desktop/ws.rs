use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared_types::{DesktopSnapshot, WindowRecord};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

/// Keeps the socket and its callbacks alive for the shell's lifetime.
pub struct DesktopWsRuntime {
    ws: WebSocket,
    closing: Rc<Cell<bool>>,
    _on_open: Closure<dyn FnMut(wasm_bindgen::JsValue)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(wasm_bindgen::JsValue)>,
    _on_error: Closure<dyn FnMut(wasm_bindgen::JsValue)>,
}

impl Drop for DesktopWsRuntime {
    fn drop(&mut self) {
        self.closing.set(true);
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    Connected,
    Disconnected,
    SnapshotUpdate(DesktopSnapshot),
    WindowOpened(WindowRecord),
    WindowClosed(String),
    WindowMoved {
        window_id: String,
        x: i32,
        y: i32,
    },
    WindowResized {
        window_id: String,
        width: i32,
        height: i32,
    },
    WindowFocused {
        window_id: String,
        z_index: u32,
    },
    WindowMinimized(WindowRecord),
    WindowMaximized(WindowRecord),
    WindowRestored(WindowRecord),
    /// Routing command emitted by restore; consumed by the shell
    Navigate(String),
    Pong,
    Error(String),
}

pub fn http_to_ws_url(http_url: &str) -> String {
    if http_url.starts_with("http://") {
        http_url.replace("http://", "ws://")
    } else if http_url.starts_with("https://") {
        http_url.replace("https://", "wss://")
    } else if http_url.is_empty() {
        let protocol = web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .unwrap_or_else(|| "http:".to_string());
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost".to_string());

        if protocol == "https:" {
            format!("wss://{host}")
        } else {
            format!("ws://{host}")
        }
    } else {
        format!("ws://{http_url}")
    }
}

pub fn parse_ws_message(payload: &str) -> Option<WsEvent> {
    let json = serde_json::from_str::<serde_json::Value>(payload).ok()?;
    let msg_type = json.get("type")?.as_str()?;

    match msg_type {
        "pong" => Some(WsEvent::Pong),
        "desktop_snapshot" => serde_json::from_value::<DesktopSnapshot>(
            json.get("desktop").cloned().unwrap_or_default(),
        )
        .ok()
        .map(WsEvent::SnapshotUpdate),
        "window_opened" => {
            serde_json::from_value::<WindowRecord>(json.get("window").cloned()?)
                .ok()
                .map(WsEvent::WindowOpened)
        }
        "window_closed" => json
            .get("window_id")
            .and_then(|v| v.as_str())
            .map(|window_id| WsEvent::WindowClosed(window_id.to_string())),
        "window_moved" => {
            let window_id = json.get("window_id")?.as_str()?;
            let x = json.get("x")?.as_i64()? as i32;
            let y = json.get("y")?.as_i64()? as i32;
            Some(WsEvent::WindowMoved {
                window_id: window_id.to_string(),
                x,
                y,
            })
        }
        "window_resized" => {
            let window_id = json.get("window_id")?.as_str()?;
            let width = json.get("width")?.as_i64()? as i32;
            let height = json.get("height")?.as_i64()? as i32;
            Some(WsEvent::WindowResized {
                window_id: window_id.to_string(),
                width,
                height,
            })
        }
        "window_focused" => {
            let window_id = json.get("window_id")?.as_str()?;
            let z_index = json.get("z_index")?.as_u64()? as u32;
            Some(WsEvent::WindowFocused {
                window_id: window_id.to_string(),
                z_index,
            })
        }
        "window_minimized" => {
            serde_json::from_value::<WindowRecord>(json.get("window").cloned()?)
                .ok()
                .map(WsEvent::WindowMinimized)
        }
        "window_maximized" => {
            serde_json::from_value::<WindowRecord>(json.get("window").cloned()?)
                .ok()
                .map(WsEvent::WindowMaximized)
        }
        "window_restored" => {
            serde_json::from_value::<WindowRecord>(json.get("window").cloned()?)
                .ok()
                .map(WsEvent::WindowRestored)
        }
        "navigate" => json
            .get("route")
            .and_then(|v| v.as_str())
            .map(|route| WsEvent::Navigate(route.to_string())),
        "error" => json
            .get("message")
            .and_then(|v| v.as_str())
            .map(|message| WsEvent::Error(message.to_string())),
        _ => None,
    }
}

pub fn connect_websocket<F>(desktop_id: &str, on_event: F) -> Result<DesktopWsRuntime, String>
where
    F: FnMut(WsEvent) + 'static,
{
    let url = format!(
        "{}/ws/{}",
        http_to_ws_url(crate::api::api_base()),
        desktop_id
    );

    let ws = WebSocket::new(&url).map_err(|e| format!("WebSocket connect failed: {e:?}"))?;
    let closing = Rc::new(Cell::new(false));
    let handler = Rc::new(RefCell::new(on_event));

    let on_open = {
        let handler = handler.clone();
        Closure::wrap(Box::new(move |_event: wasm_bindgen::JsValue| {
            (handler.borrow_mut())(WsEvent::Connected);
        }) as Box<dyn FnMut(wasm_bindgen::JsValue)>)
    };
    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let on_message = {
        let handler = handler.clone();
        Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                if let Some(parsed) = parse_ws_message(&text) {
                    (handler.borrow_mut())(parsed);
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>)
    };
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let on_close = {
        let handler = handler.clone();
        let closing = closing.clone();
        Closure::wrap(Box::new(move |_event: wasm_bindgen::JsValue| {
            if !closing.get() {
                (handler.borrow_mut())(WsEvent::Disconnected);
            }
        }) as Box<dyn FnMut(wasm_bindgen::JsValue)>)
    };
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let on_error = {
        let handler = handler.clone();
        Closure::wrap(Box::new(move |_event: wasm_bindgen::JsValue| {
            (handler.borrow_mut())(WsEvent::Error("websocket error".to_string()));
        }) as Box<dyn FnMut(wasm_bindgen::JsValue)>)
    };
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    Ok(DesktopWsRuntime {
        ws,
        closing,
        _on_open: on_open,
        _on_message: on_message,
        _on_close: on_close,
        _on_error: on_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_to_ws_url() {
        assert_eq!(http_to_ws_url("http://localhost:8080"), "ws://localhost:8080");
        assert_eq!(http_to_ws_url("https://desk.example"), "wss://desk.example");
    }

    #[test]
    fn test_parse_window_moved() {
        let parsed =
            parse_ws_message(r#"{"type":"window_moved","window_id":"w1","x":10,"y":-5}"#).unwrap();
        assert_eq!(
            parsed,
            WsEvent::WindowMoved {
                window_id: "w1".to_string(),
                x: 10,
                y: -5
            }
        );
    }

    #[test]
    fn test_parse_navigate() {
        let parsed = parse_ws_message(r#"{"type":"navigate","route":"/"}"#).unwrap();
        assert_eq!(parsed, WsEvent::Navigate("/".to_string()));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(parse_ws_message(r#"{"type":"mystery"}"#).is_none());
        assert!(parse_ws_message("not json").is_none());
    }

    #[test]
    fn test_parse_window_minimized_carries_record() {
        let payload = r#"{"type":"window_minimized","window":{
            "id":"w1","title":"Blog","x":100,"y":100,"width":850,"height":800,
            "z_index":101,"minimized":true,"maximized":false,"closed":false,
            "default_bounds":{"x":100,"y":100,"width":850,"height":800},
            "prev_bounds":null,"route":"/","content":null}}"#;
        match parse_ws_message(payload) {
            Some(WsEvent::WindowMinimized(window)) => {
                assert_eq!(window.id, "w1");
                assert!(window.minimized);
            }
            other => panic!("unexpected parse result: {other:?}"),
        }
    }
}
