use dioxus::prelude::*;
use dioxus_web::WebEventExt;
use shared_types::{WindowBounds, WindowRecord};
use wasm_bindgen::JsCast;

const DRAG_THRESHOLD_PX: i32 = 4;
const MIN_WINDOW_WIDTH: i32 = 200;
const MIN_WINDOW_HEIGHT: i32 = 160;
const MIN_VISIBLE_X_PX: i32 = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
enum InteractionMode {
    Drag,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct InteractionState {
    mode: InteractionMode,
    pointer_id: i32,
    start_x: i32,
    start_y: i32,
    start_bounds: WindowBounds,
}

/// Keep a window inside sane screen limits: minimum size, a visible strip on
/// the horizontal axis, clear of the taskbar at the bottom.
fn clamp_bounds(bounds: WindowBounds, viewport: (u32, u32)) -> WindowBounds {
    let (vw, vh) = viewport;

    let width_cap = (vw as i32 - 40).max(MIN_WINDOW_WIDTH);
    let height_cap = (vh as i32 - 120).max(MIN_WINDOW_HEIGHT);
    let width = bounds.width.max(MIN_WINDOW_WIDTH).min(width_cap);
    let height = bounds.height.max(MIN_WINDOW_HEIGHT).min(height_cap);
    let min_x = -(width - MIN_VISIBLE_X_PX).max(0);
    let max_x = (vw as i32 - MIN_VISIBLE_X_PX).max(min_x);
    let x = bounds.x.max(min_x).min(max_x);
    let y = bounds.y.max(10).min(vh as i32 - height - 60);

    WindowBounds {
        x,
        y,
        width,
        height,
    }
}

fn pointer_point(e: &PointerEvent) -> (i32, i32) {
    if let Some((x, y)) = e.data().try_as_web_event().and_then(|event| {
        event
            .dyn_ref::<web_sys::PointerEvent>()
            .map(|pointer| (pointer.client_x(), pointer.client_y()))
    }) {
        return (x, y);
    }

    let point = e.data().client_coordinates();
    (point.x as i32, point.y as i32)
}

fn pointer_target_is_window_control(e: &PointerEvent) -> bool {
    e.data()
        .try_as_web_event()
        .and_then(|event| event.target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(|element| {
            element.closest("button").ok().flatten().is_some()
                || element.closest(".window-controls").ok().flatten().is_some()
        })
        .unwrap_or(false)
}

fn capture_window_pointer(e: &PointerEvent, pointer_id: i32) {
    let _ = e
        .data()
        .try_as_web_event()
        .and_then(|event| event.current_target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(".floating-window").ok().flatten())
        .map(|window| window.set_pointer_capture(pointer_id));
}

fn release_window_pointer(e: &PointerEvent, pointer_id: i32) {
    let _ = e
        .data()
        .try_as_web_event()
        .and_then(|event| event.current_target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(".floating-window").ok().flatten())
        .map(|window| window.release_pointer_capture(pointer_id));
}

#[component]
pub fn FloatingWindow(
    window: WindowRecord,
    is_active: bool,
    viewport: (u32, u32),
    on_close: Callback<String>,
    on_focus: Callback<String>,
    on_move: Callback<(String, i32, i32)>,
    on_resize: Callback<(String, i32, i32)>,
    on_minimize: Callback<String>,
    on_maximize: Callback<String>,
    children: Element,
) -> Element {
    let window_id = window.id.clone();

    let committed = clamp_bounds(window.bounds(), viewport);

    let mut interaction = use_signal(|| None::<InteractionState>);
    let mut live_bounds = use_signal(|| None::<WindowBounds>);

    let bounds = live_bounds().unwrap_or(committed);

    let window_id_for_focus = window_id.clone();
    let window_id_for_pointer_up = window_id.clone();
    let window_id_for_title_pointer = window_id.clone();
    let window_id_for_resize_pointer = window_id.clone();
    let window_id_for_minimize = window_id.clone();
    let window_id_for_maximize = window_id.clone();
    let window_id_for_close = window_id.clone();

    let z_index = window.z_index;
    let active_outline = if is_active && !window.maximized {
        "2px solid var(--accent-bg, #3b82f6)"
    } else {
        "none"
    };
    let window_style = if window.maximized {
        format!(
            "position: absolute; top: 0; left: 0; width: 100%; height: 100%; z-index: {z_index}; \
             display: flex; flex-direction: column; background: var(--window-bg, #1f2937); \
             border: none; border-radius: 0; overflow: hidden; box-shadow: none; \
             outline: {active_outline};"
        )
    } else {
        format!(
            "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; z-index: \
             {z_index}; display: flex; flex-direction: column; background: var(--window-bg, \
             #1f2937); border: 1px solid var(--border-color, #374151); border-radius: 12px; \
             overflow: hidden; box-shadow: 0 10px 40px rgba(0,0,0,0.5); outline: {active_outline};",
            bounds.x, bounds.y, bounds.width, bounds.height
        )
    };

    rsx! {
        div {
            class: if is_active { "floating-window active" } else { "floating-window" },
            role: "dialog",
            "aria-label": window.title.clone(),
            tabindex: "0",
            style: "{window_style}",
            onclick: move |_| on_focus.call(window_id_for_focus.clone()),
            onpointermove: move |e| {
                let Some(active) = interaction() else {
                    return;
                };
                if e.data().pointer_id() != active.pointer_id {
                    return;
                }

                let (client_x, client_y) = pointer_point(&e);
                let dx = client_x - active.start_x;
                let dy = client_y - active.start_y;

                if dx.abs() < DRAG_THRESHOLD_PX && dy.abs() < DRAG_THRESHOLD_PX {
                    return;
                }

                let next = match active.mode {
                    InteractionMode::Drag => WindowBounds {
                        x: active.start_bounds.x + dx,
                        y: active.start_bounds.y + dy,
                        width: active.start_bounds.width,
                        height: active.start_bounds.height,
                    },
                    InteractionMode::Resize => WindowBounds {
                        x: active.start_bounds.x,
                        y: active.start_bounds.y,
                        width: active.start_bounds.width + dx,
                        height: active.start_bounds.height + dy,
                    },
                };
                live_bounds.set(Some(clamp_bounds(next, viewport)));
            },
            onpointerup: move |e| {
                let Some(active) = interaction() else {
                    return;
                };
                if e.data().pointer_id() != active.pointer_id {
                    return;
                }
                release_window_pointer(&e, active.pointer_id);

                let final_bounds = live_bounds().unwrap_or(active.start_bounds);
                match active.mode {
                    InteractionMode::Drag => {
                        on_move.call((
                            window_id_for_pointer_up.clone(),
                            final_bounds.x,
                            final_bounds.y,
                        ));
                    }
                    InteractionMode::Resize => {
                        on_resize.call((
                            window_id_for_pointer_up.clone(),
                            final_bounds.width,
                            final_bounds.height,
                        ));
                    }
                }

                interaction.set(None);
            },
            onpointercancel: move |e| {
                let Some(active) = interaction() else {
                    return;
                };
                if e.data().pointer_id() != active.pointer_id {
                    return;
                }
                release_window_pointer(&e, active.pointer_id);

                live_bounds.set(Some(active.start_bounds));
                interaction.set(None);
            },

            div {
                class: "window-titlebar",
                style: "display: flex; align-items: center; justify-content: space-between; padding: 0.6rem 1rem; background: var(--titlebar-bg, #111827); border-bottom: 1px solid var(--border-color, #374151); cursor: grab; user-select: none; touch-action: none;",
                onpointerdown: move |e| {
                    if window.maximized {
                        return;
                    }
                    if pointer_target_is_window_control(&e) {
                        return;
                    }
                    if !is_active {
                        on_focus.call(window_id_for_title_pointer.clone());
                    }
                    e.prevent_default();
                    capture_window_pointer(&e, e.data().pointer_id());

                    let (start_x, start_y) = pointer_point(&e);
                    interaction.set(Some(InteractionState {
                        mode: InteractionMode::Drag,
                        pointer_id: e.data().pointer_id(),
                        start_x,
                        start_y,
                        start_bounds: bounds,
                    }));
                },

                span {
                    style: "font-weight: 500; color: var(--text-primary, white);",
                    "{window.title}"
                }

                div {
                    class: "window-controls",
                    style: "display: flex; align-items: center; gap: 0.25rem;",
                    button {
                        style: "width: 24px; height: 24px; display: flex; align-items: center; justify-content: center; background: transparent; color: #facc15; border: none; border-radius: 4px; cursor: pointer;",
                        onpointerdown: move |e| e.stop_propagation(),
                        "aria-label": "Minimize",
                        onclick: move |e| {
                            e.stop_propagation();
                            on_minimize.call(window_id_for_minimize.clone());
                        },
                        "−"
                    }
                    button {
                        style: "width: 24px; height: 24px; display: flex; align-items: center; justify-content: center; background: transparent; color: #22c55e; border: none; border-radius: 4px; cursor: pointer;",
                        onpointerdown: move |e| e.stop_propagation(),
                        "aria-label": if window.maximized { "Restore" } else { "Maximize" },
                        onclick: move |e| {
                            e.stop_propagation();
                            on_maximize.call(window_id_for_maximize.clone());
                        },
                        if window.maximized { "❐" } else { "□" }
                    }
                    button {
                        class: "window-close",
                        style: "width: 24px; height: 24px; display: flex; align-items: center; justify-content: center; background: transparent; color: #ef4444; border: none; border-radius: 4px; cursor: pointer; font-size: 1.25rem; line-height: 1;",
                        onpointerdown: move |e| e.stop_propagation(),
                        "aria-label": "Close",
                        onclick: move |e| {
                            e.stop_propagation();
                            on_close.call(window_id_for_close.clone());
                        },
                        "×"
                    }
                }
            }

            div {
                class: "window-content",
                style: "flex: 1; overflow: hidden;",
                {children}
            }

            if !window.maximized {
                div {
                    class: "resize-handle",
                    style: "position: absolute; right: 0; bottom: 0; width: 16px; height: 16px; cursor: se-resize;",
                    onpointerdown: move |e| {
                        if !is_active {
                            on_focus.call(window_id_for_resize_pointer.clone());
                        }
                        e.prevent_default();
                        capture_window_pointer(&e, e.data().pointer_id());

                        let (start_x, start_y) = pointer_point(&e);
                        interaction.set(Some(InteractionState {
                            mode: InteractionMode::Resize,
                            pointer_id: e.data().pointer_id(),
                            start_x,
                            start_y,
                            start_bounds: bounds,
                        }));
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_minimums() {
        let clamped = clamp_bounds(
            WindowBounds {
                x: -100,
                y: -100,
                width: 50,
                height: 20,
            },
            (1280, 720),
        );

        assert_eq!(clamped.x, -100);
        assert_eq!(clamped.y, 10);
        assert_eq!(clamped.width, MIN_WINDOW_WIDTH);
        assert_eq!(clamped.height, MIN_WINDOW_HEIGHT);
    }

    #[test]
    fn clamp_allows_horizontal_overhang_but_keeps_strip_visible() {
        let clamped = clamp_bounds(
            WindowBounds {
                x: -999,
                y: 40,
                width: 500,
                height: 300,
            },
            (1280, 720),
        );
        assert_eq!(clamped.x, -(500 - MIN_VISIBLE_X_PX));

        let clamped_right = clamp_bounds(
            WindowBounds {
                x: 9999,
                y: 40,
                width: 500,
                height: 300,
            },
            (1280, 720),
        );
        assert_eq!(clamped_right.x, 1280 - MIN_VISIBLE_X_PX);
    }
}
