use dioxus::prelude::{Signal, WritableExt};
use shared_types::{DesktopSnapshot, WindowRecord};

use crate::desktop::ws::WsEvent;

/// Apply a server event to the local snapshot.
///
/// The `navigate` command is deliberately absent here - the shell feeds it
/// to the router; snapshot state never triggers navigation itself.
pub fn apply_ws_event(
    event: WsEvent,
    desktop_state: &mut Signal<Option<DesktopSnapshot>>,
    ws_connected: &mut Signal<bool>,
) {
    match event {
        WsEvent::Connected => {
            ws_connected.set(true);
        }
        WsEvent::Disconnected => {
            ws_connected.set(false);
        }
        WsEvent::SnapshotUpdate(snapshot) => {
            desktop_state.set(Some(snapshot));
        }
        WsEvent::WindowOpened(window) => {
            if let Some(state) = desktop_state.write().as_mut() {
                upsert_window_and_activate(state, window);
            }
        }
        WsEvent::WindowClosed(window_id) => {
            if let Some(state) = desktop_state.write().as_mut() {
                mark_window_closed(state, &window_id);
            }
        }
        WsEvent::WindowMoved { window_id, x, y } => {
            if let Some(state) = desktop_state.write().as_mut() {
                if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
                    window.x = x;
                    window.y = y;
                }
            }
        }
        WsEvent::WindowResized {
            window_id,
            width,
            height,
        } => {
            if let Some(state) = desktop_state.write().as_mut() {
                if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
                    window.width = width;
                    window.height = height;
                }
            }
        }
        WsEvent::WindowFocused { window_id, z_index } => {
            if let Some(state) = desktop_state.write().as_mut() {
                apply_focus(state, &window_id, z_index);
            }
        }
        WsEvent::WindowMinimized(window) => {
            if let Some(state) = desktop_state.write().as_mut() {
                apply_minimize_toggle(state, window);
            }
        }
        WsEvent::WindowMaximized(window) | WsEvent::WindowRestored(window) => {
            if let Some(state) = desktop_state.write().as_mut() {
                upsert_window_and_activate(state, window);
            }
        }
        WsEvent::Navigate(_) => {}
        WsEvent::Pong => {}
        WsEvent::Error(_) => {}
    }
}

/// Replace (or append) a window record and make it active.
pub fn upsert_window_and_activate(state: &mut DesktopSnapshot, window: WindowRecord) {
    let window_id = window.id.clone();
    if let Some(existing) = state.windows.iter_mut().find(|w| w.id == window_id) {
        *existing = window;
    } else {
        state.windows.push(window);
    }
    state.active_window = Some(window_id);
}

/// Replace a window record without touching the active selection.
pub fn apply_window_update(state: &mut DesktopSnapshot, window: WindowRecord) {
    if let Some(existing) = state.windows.iter_mut().find(|w| w.id == window.id) {
        *existing = window;
    } else {
        state.windows.push(window);
    }
}

/// Soft-close a window locally, mirroring the server semantics.
pub fn mark_window_closed(state: &mut DesktopSnapshot, window_id: &str) {
    if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
        window.closed = true;
        window.minimized = false;
        window.maximized = false;
        window.prev_bounds = None;
        window.content = None;
    }

    if state.active_window.as_deref() == Some(window_id) {
        reselect_active(state);
    }
}

pub fn apply_focus(state: &mut DesktopSnapshot, window_id: &str, z_index: u32) {
    if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
        window.z_index = z_index;
        state.active_window = Some(window_id.to_string());
    }
}

/// Apply a minimize-toggle result: replace the record, then fix the active
/// selection the same way the server does.
pub fn apply_minimize_toggle(state: &mut DesktopSnapshot, window: WindowRecord) {
    let window_id = window.id.clone();
    let minimized = window.minimized;
    apply_window_update(state, window);

    if minimized {
        if state.active_window.as_deref() == Some(window_id.as_str()) {
            reselect_active(state);
        }
    } else {
        state.active_window = Some(window_id);
    }
}

/// Pick the topmost visible window as the new active one.
pub fn reselect_active(state: &mut DesktopSnapshot) {
    state.active_window = state
        .windows
        .iter()
        .filter(|w| w.is_visible())
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::WindowBounds;

    fn window(id: &str, z: u32) -> WindowRecord {
        WindowRecord {
            id: id.to_string(),
            title: id.to_string(),
            x: 100,
            y: 100,
            width: 850,
            height: 800,
            z_index: z,
            minimized: false,
            maximized: false,
            closed: false,
            default_bounds: WindowBounds {
                x: 100,
                y: 100,
                width: 850,
                height: 800,
            },
            prev_bounds: None,
            route: "/".to_string(),
            content: None,
        }
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut state = DesktopSnapshot::default();
        upsert_window_and_activate(&mut state, window("a", 100));

        let mut updated = window("a", 105);
        updated.x = 42;
        upsert_window_and_activate(&mut state, updated);

        assert_eq!(state.windows.len(), 1);
        assert_eq!(state.windows[0].x, 42);
        assert_eq!(state.active_window.as_deref(), Some("a"));
    }

    #[test]
    fn test_mark_closed_keeps_record_and_reselects() {
        let mut state = DesktopSnapshot::default();
        upsert_window_and_activate(&mut state, window("a", 100));
        upsert_window_and_activate(&mut state, window("b", 101));

        mark_window_closed(&mut state, "b");

        assert_eq!(state.windows.len(), 2);
        assert!(state.windows[1].closed);
        assert_eq!(state.active_window.as_deref(), Some("a"));
    }

    #[test]
    fn test_minimizing_active_window_reselects() {
        let mut state = DesktopSnapshot::default();
        upsert_window_and_activate(&mut state, window("a", 100));
        upsert_window_and_activate(&mut state, window("b", 101));

        let mut minimized = window("b", 101);
        minimized.minimized = true;
        apply_minimize_toggle(&mut state, minimized);

        assert!(state.windows[1].minimized);
        assert_eq!(state.active_window.as_deref(), Some("a"));

        apply_minimize_toggle(&mut state, window("b", 101));
        assert_eq!(state.active_window.as_deref(), Some("b"));
    }

    #[test]
    fn test_focus_updates_z_and_active() {
        let mut state = DesktopSnapshot::default();
        upsert_window_and_activate(&mut state, window("a", 100));
        upsert_window_and_activate(&mut state, window("b", 101));

        apply_focus(&mut state, "a", 102);

        assert_eq!(state.windows[0].z_index, 102);
        assert_eq!(state.active_window.as_deref(), Some("a"));
    }

    #[test]
    fn test_focus_on_unknown_id_changes_nothing() {
        let mut state = DesktopSnapshot::default();
        upsert_window_and_activate(&mut state, window("a", 100));

        apply_focus(&mut state, "missing", 999);

        assert_eq!(state.windows[0].z_index, 100);
        assert_eq!(state.active_window.as_deref(), Some("a"));
    }
}
