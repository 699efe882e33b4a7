use dioxus::prelude::*;
use shared_types::{DesktopSnapshot, WindowBounds, WindowRecord};

use crate::desktop::actions;
use crate::desktop::effects;
use crate::desktop::state::apply_ws_event;
use crate::desktop::ws::{self, DesktopWsRuntime, WsEvent};
use crate::desktop_window::FloatingWindow;
use crate::route::{route_from_path, Route};

pub const DEFAULT_DESKTOP_ID: &str = "default-desktop";

/// Desktop layout: floating windows over a taskbar, with the routed content
/// area hosted inside the blog window.
#[component]
pub fn DesktopShell() -> Element {
    let desktop_state = use_signal(|| None::<DesktopSnapshot>);
    let loading = use_signal(|| true);
    let error = use_signal(|| None::<String>);
    let ws_connected = use_signal(|| false);
    let mut ws_runtime = use_signal(|| None::<DesktopWsRuntime>);
    let viewport = use_signal(effects::initial_viewport);
    let nav = use_navigator();

    use_effect(move || {
        spawn(async move {
            effects::track_viewport(viewport).await;
        });
    });

    use_effect(move || {
        spawn(async move {
            effects::load_initial_desktop_state(
                DEFAULT_DESKTOP_ID.to_string(),
                loading,
                error,
                desktop_state,
            )
            .await;
            actions::ensure_blog_window(DEFAULT_DESKTOP_ID, desktop_state).await;
        });
    });

    use_effect(move || {
        if ws_runtime.peek().is_some() {
            return;
        }

        let mut state_signal = desktop_state;
        let mut connected_signal = ws_connected;
        let result = ws::connect_websocket(DEFAULT_DESKTOP_ID, move |event| {
            if let WsEvent::Navigate(route) = &event {
                if let Some(route) = route_from_path(route) {
                    let _ = nav.push(route);
                }
            }
            apply_ws_event(event, &mut state_signal, &mut connected_signal);
        });

        match result {
            Ok(runtime) => ws_runtime.set(Some(runtime)),
            Err(e) => {
                dioxus_logger::tracing::warn!("Desktop WebSocket unavailable: {}", e);
            }
        }
    });

    let on_close = use_callback(move |window_id: String| {
        spawn(actions::close_window_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            desktop_state,
        ));
    });
    let on_focus = use_callback(move |window_id: String| {
        spawn(actions::focus_window_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            desktop_state,
        ));
    });
    let on_move = use_callback(move |(window_id, x, y): (String, i32, i32)| {
        spawn(actions::move_window_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            x,
            y,
        ));
    });
    let on_resize = use_callback(move |(window_id, width, height): (String, i32, i32)| {
        spawn(actions::resize_window_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            width,
            height,
        ));
    });
    let on_minimize = use_callback(move |window_id: String| {
        spawn(actions::toggle_minimized_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            desktop_state,
        ));
    });
    let on_maximize = use_callback(move |window_id: String| {
        let (vw, vh) = viewport();
        spawn(actions::toggle_maximized_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            WindowBounds {
                x: 0,
                y: 0,
                width: vw as i32,
                height: vh as i32,
            },
            desktop_state,
        ));
    });
    let on_restore = use_callback(move |window_id: String| {
        spawn(actions::restore_window_action(
            DEFAULT_DESKTOP_ID,
            window_id,
            desktop_state,
            nav,
        ));
    });

    let snapshot = desktop_state();
    let windows: Vec<WindowRecord> = snapshot
        .as_ref()
        .map(|s| s.windows.clone())
        .unwrap_or_default();
    let active_id = snapshot.as_ref().and_then(|s| s.active_window.clone());
    // The routed content area lives in the first window opened on this
    // desktop (the blog window the shell bootstraps).
    let outlet_window_id = windows.first().map(|w| w.id.clone());

    rsx! {
        div {
            class: "desktop",
            style: "position: relative; width: 100%; height: 100vh; overflow: hidden; \
                    background: var(--desktop-bg, #0f172a); color: var(--text-primary, #e5e7eb); \
                    font-family: system-ui, sans-serif;",

            if loading() {
                div {
                    style: "position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; color: var(--text-muted, #6b7280);",
                    "Loading desktop..."
                }
            }

            if let Some(message) = error() {
                div {
                    style: "position: absolute; top: 0.75rem; left: 50%; transform: translateX(-50%); padding: 0.5rem 1rem; background: #7f1d1d; border-radius: 8px; font-size: 0.85rem;",
                    "{message}"
                }
            }

            for window in windows.iter().filter(|w| w.is_visible()).cloned() {
                FloatingWindow {
                    key: "{window.id}",
                    window: window.clone(),
                    is_active: active_id.as_deref() == Some(window.id.as_str()),
                    viewport: viewport(),
                    on_close,
                    on_focus,
                    on_move,
                    on_resize,
                    on_minimize,
                    on_maximize,

                    if Some(&window.id) == outlet_window_id.as_ref() {
                        Outlet::<Route> {}
                    } else {
                        WindowPlaceholder { window: window.clone() }
                    }
                }
            }

            div {
                class: "taskbar",
                style: "position: absolute; left: 0; right: 0; bottom: 0; display: flex; align-items: center; gap: 0.5rem; padding: 0.5rem 0.75rem; background: var(--taskbar-bg, #111827); border-top: 1px solid var(--border-color, #374151);",

                for window in windows.iter().cloned() {
                    TaskbarButton {
                        key: "{window.id}",
                        window: window.clone(),
                        is_active: active_id.as_deref() == Some(window.id.as_str()),
                        on_restore,
                        on_focus,
                    }
                }

                span {
                    style: "margin-left: auto; font-size: 0.75rem; color: var(--text-muted, #6b7280);",
                    if ws_connected() { "live" } else { "offline" }
                }
            }
        }
    }
}

/// Taskbar entry; restores closed/minimized windows, focuses open ones.
#[component]
fn TaskbarButton(
    window: WindowRecord,
    is_active: bool,
    on_restore: Callback<String>,
    on_focus: Callback<String>,
) -> Element {
    let window_id = window.id.clone();
    let needs_restore = window.closed || window.minimized;
    let style = if window.closed {
        "padding: 0.25rem 0.75rem; background: transparent; color: var(--text-muted, #6b7280); border: 1px dashed var(--border-color, #374151); border-radius: 6px; cursor: pointer;"
    } else if is_active {
        "padding: 0.25rem 0.75rem; background: var(--accent-bg, #1d4ed8); color: white; border: 1px solid transparent; border-radius: 6px; cursor: pointer;"
    } else {
        "padding: 0.25rem 0.75rem; background: var(--titlebar-bg, #1f2937); color: var(--text-primary, #e5e7eb); border: 1px solid var(--border-color, #374151); border-radius: 6px; cursor: pointer;"
    };

    rsx! {
        button {
            style: "{style}",
            onclick: move |_| {
                if needs_restore {
                    on_restore.call(window_id.clone());
                } else {
                    on_focus.call(window_id.clone());
                }
            },
            "{window.title}"
        }
    }
}

/// Content area for windows that do not host the router outlet.
#[component]
fn WindowPlaceholder(window: WindowRecord) -> Element {
    let text = window
        .content
        .as_ref()
        .and_then(|v| v.as_str())
        .map(ToString::to_string);

    rsx! {
        div {
            style: "display: flex; align-items: center; justify-content: center; height: 100%; color: var(--text-muted, #6b7280); padding: 1rem; text-align: center;",
            if let Some(text) = text {
                "{text}"
            } else {
                "{window.title}"
            }
        }
    }
}
