use dioxus::prelude::{Signal, WritableExt};
use shared_types::DesktopSnapshot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::api::fetch_desktop_snapshot;

pub async fn track_viewport(mut viewport: Signal<(u32, u32)>) {
    if let Some((w, h)) = current_viewport_size() {
        viewport.set((w, h));
    }

    let Some(window) = web_sys::window() else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        if let Some((w, h)) = current_viewport_size() {
            viewport.set((w, h));
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    let _ = window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
    let _ = window
        .add_event_listener_with_callback("orientationchange", callback.as_ref().unchecked_ref());

    // Keep listener alive for app lifetime.
    callback.forget();
}

fn current_viewport_size() -> Option<(u32, u32)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;

    if width > 0.0 && height > 0.0 {
        return Some((width.round() as u32, height.round() as u32));
    }

    let document = window.document()?;
    let root = document.document_element()?;
    let width = root.client_width().max(0) as u32;
    let height = root.client_height().max(0) as u32;
    Some((width, height))
}

pub fn initial_viewport() -> (u32, u32) {
    current_viewport_size().unwrap_or((1280, 720))
}

pub async fn load_initial_desktop_state(
    desktop_id: String,
    mut loading: Signal<bool>,
    mut error: Signal<Option<String>>,
    mut desktop_state: Signal<Option<DesktopSnapshot>>,
) {
    loading.set(true);

    match fetch_desktop_snapshot(&desktop_id).await {
        Ok(snapshot) => {
            desktop_state.set(Some(snapshot));
            error.set(None);
        }
        Err(e) => {
            error.set(Some(e));
        }
    }

    loading.set(false);
}
