use dioxus::prelude::{ReadableExt, Signal, WritableExt};
use dioxus::router::Navigator;
use shared_types::{DesktopSnapshot, OpenWindowSpec, WindowBounds};

use crate::api;
use crate::desktop::state::{
    apply_focus, apply_minimize_toggle, mark_window_closed, upsert_window_and_activate,
};
use crate::route::route_from_path;

/// Open the blog window when the desktop comes up empty. The window hosts
/// the routed content area, so the shell needs exactly one of these.
pub async fn ensure_blog_window(
    desktop_id: &'static str,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
) {
    const MAX_ATTEMPTS: u32 = 3;

    let needs_window = matches!(
        desktop_state.read().as_ref(),
        Some(snapshot) if snapshot.windows.is_empty()
    );
    if !needs_window {
        return;
    }

    let spec = OpenWindowSpec {
        title: Some("Blog".to_string()),
        route: Some("/".to_string()),
        ..Default::default()
    };

    for attempt in 1..=MAX_ATTEMPTS {
        match api::open_window(desktop_id, &spec).await {
            Ok(window) => {
                if let Some(state) = desktop_state.write().as_mut() {
                    upsert_window_and_activate(state, window);
                }
                return;
            }
            Err(e) => {
                dioxus_logger::tracing::warn!(
                    "Failed to open blog window (attempt {}): {}",
                    attempt,
                    e
                );
            }
        }

        if attempt < MAX_ATTEMPTS {
            // Allow the server a moment to come up before retrying.
            gloo_timers::future::TimeoutFuture::new(250 * attempt).await;
        }
    }

    dioxus_logger::tracing::error!(
        "Failed to open blog window after {} attempts",
        MAX_ATTEMPTS
    );
}

pub async fn close_window_action(
    desktop_id: &'static str,
    window_id: String,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
) {
    match api::close_window(desktop_id, &window_id).await {
        Ok(Some(_)) => {
            if let Some(state) = desktop_state.write().as_mut() {
                mark_window_closed(state, &window_id);
            }
        }
        Ok(None) => {}
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to close window: {}", e);
        }
    }
}

pub async fn focus_window_action(
    desktop_id: &'static str,
    window_id: String,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
) {
    match api::focus_window(desktop_id, &window_id).await {
        Ok(Some(window)) => {
            if let Some(state) = desktop_state.write().as_mut() {
                apply_focus(state, &window_id, window.z_index);
            }
        }
        Ok(None) => {}
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to focus window: {}", e);
        }
    }
}

pub async fn move_window_action(desktop_id: &'static str, window_id: String, x: i32, y: i32) {
    if let Err(e) = api::move_window(desktop_id, &window_id, x, y).await {
        dioxus_logger::tracing::error!("Failed to move window: {}", e);
    }
}

pub async fn resize_window_action(
    desktop_id: &'static str,
    window_id: String,
    width: i32,
    height: i32,
) {
    if let Err(e) = api::resize_window(desktop_id, &window_id, width, height).await {
        dioxus_logger::tracing::error!("Failed to resize window: {}", e);
    }
}

pub async fn toggle_minimized_action(
    desktop_id: &'static str,
    window_id: String,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
) {
    match api::toggle_minimized(desktop_id, &window_id).await {
        Ok(Some(window)) => {
            if let Some(state) = desktop_state.write().as_mut() {
                apply_minimize_toggle(state, window);
            }
        }
        Ok(None) => {}
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to minimize window: {}", e);
        }
    }
}

pub async fn toggle_maximized_action(
    desktop_id: &'static str,
    window_id: String,
    viewport: WindowBounds,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
) {
    match api::toggle_maximized(desktop_id, &window_id, viewport).await {
        Ok(Some(window)) => {
            if let Some(state) = desktop_state.write().as_mut() {
                upsert_window_and_activate(state, window);
            }
        }
        Ok(None) => {}
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to maximize window: {}", e);
        }
    }
}

/// Restore a window and let the router consume the navigation command the
/// server emitted for revived windows.
pub async fn restore_window_action(
    desktop_id: &'static str,
    window_id: String,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
    nav: Navigator,
) {
    match api::restore_window(desktop_id, &window_id).await {
        Ok((Some(window), navigate)) => {
            if let Some(state) = desktop_state.write().as_mut() {
                upsert_window_and_activate(state, window);
            }
            if let Some(route) = navigate.as_deref().and_then(route_from_path) {
                let _ = nav.push(route);
            }
        }
        Ok((None, _)) => {}
        Err(e) => {
            dioxus_logger::tracing::error!("Failed to restore window: {}", e);
        }
    }
}
