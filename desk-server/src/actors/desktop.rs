//! DesktopActor - owns the window collection for one desktop
//!
//! All window mutations serialize through this actor's mailbox, so the UI
//! can fire gestures without any client-side locking. State is in-memory
//! only; windows are soft-deleted (`closed`) and revived by `restore`.
//!
//! Missing window ids are deliberate no-ops: handlers reply `None` and the
//! HTTP layer answers success without broadcasting anything.

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};

use shared_types::{
    DesktopSnapshot, OpenWindowSpec, WindowBounds, WindowRecord, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_ROUTE, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_X, DEFAULT_WINDOW_Y,
};

/// Actor that manages desktop window state
#[derive(Debug, Default)]
pub struct DesktopActor;

/// Arguments for spawning DesktopActor
#[derive(Debug, Clone)]
pub struct DesktopArguments {
    pub desktop_id: String,
}

/// State for DesktopActor
pub struct DesktopState {
    desktop_id: String,
    /// Ordered window list; lookup is by id over the list.
    windows: Vec<WindowRecord>,
    active_window: Option<String>,
    /// Monotonic counter backing every z-order assignment.
    next_z: u32,
}

/// Result of a restore: the revived window plus the route the UI should
/// navigate to when the window had been closed. Navigation itself is left
/// to the routing layer.
#[derive(Debug, Clone)]
pub struct RestoredWindow {
    pub window: WindowRecord,
    pub navigate: Option<String>,
}

/// Messages handled by DesktopActor
#[derive(Debug)]
pub enum DesktopActorMsg {
    /// Open a new window, merging caller overrides over fixed defaults
    OpenWindow {
        spec: OpenWindowSpec,
        reply: RpcReplyPort<WindowRecord>,
    },
    /// Toggle the minimized flag
    ToggleMinimized {
        window_id: String,
        reply: RpcReplyPort<Option<WindowRecord>>,
    },
    /// Toggle the maximized flag; expands to the caller-supplied viewport
    ToggleMaximized {
        window_id: String,
        viewport: WindowBounds,
        reply: RpcReplyPort<Option<WindowRecord>>,
    },
    /// Soft-close a window
    CloseWindow {
        window_id: String,
        reply: RpcReplyPort<Option<WindowRecord>>,
    },
    /// Revive a window, resetting closed windows to their default geometry
    RestoreWindow {
        window_id: String,
        reply: RpcReplyPort<Option<RestoredWindow>>,
    },
    /// Move a window
    MoveWindow {
        window_id: String,
        x: i32,
        y: i32,
        reply: RpcReplyPort<Option<WindowRecord>>,
    },
    /// Resize a window
    ResizeWindow {
        window_id: String,
        width: i32,
        height: i32,
        reply: RpcReplyPort<Option<WindowRecord>>,
    },
    /// Bring a window to the front
    FocusWindow {
        window_id: String,
        reply: RpcReplyPort<Option<WindowRecord>>,
    },
    /// Get all windows
    GetWindows {
        reply: RpcReplyPort<Vec<WindowRecord>>,
    },
    /// Get the full desktop snapshot
    GetDesktopSnapshot {
        reply: RpcReplyPort<DesktopSnapshot>,
    },
}

#[async_trait]
impl Actor for DesktopActor {
    type Msg = DesktopActorMsg;
    type State = DesktopState;
    type Arguments = DesktopArguments;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            actor_id = %myself.get_id(),
            desktop_id = %args.desktop_id,
            "DesktopActor starting"
        );

        Ok(DesktopState {
            desktop_id: args.desktop_id,
            windows: Vec::new(),
            active_window: None,
            next_z: 100,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DesktopActorMsg::OpenWindow { spec, reply } => {
                let _ = reply.send(self.handle_open_window(spec, state));
            }
            DesktopActorMsg::ToggleMinimized { window_id, reply } => {
                let _ = reply.send(self.handle_toggle_minimized(&window_id, state));
            }
            DesktopActorMsg::ToggleMaximized {
                window_id,
                viewport,
                reply,
            } => {
                let _ = reply.send(self.handle_toggle_maximized(&window_id, viewport, state));
            }
            DesktopActorMsg::CloseWindow { window_id, reply } => {
                let _ = reply.send(self.handle_close_window(&window_id, state));
            }
            DesktopActorMsg::RestoreWindow { window_id, reply } => {
                let _ = reply.send(self.handle_restore_window(&window_id, state));
            }
            DesktopActorMsg::MoveWindow {
                window_id,
                x,
                y,
                reply,
            } => {
                let _ = reply.send(self.handle_move_window(&window_id, x, y, state));
            }
            DesktopActorMsg::ResizeWindow {
                window_id,
                width,
                height,
                reply,
            } => {
                let _ = reply.send(self.handle_resize_window(&window_id, width, height, state));
            }
            DesktopActorMsg::FocusWindow { window_id, reply } => {
                let _ = reply.send(self.handle_focus_window(&window_id, state));
            }
            DesktopActorMsg::GetWindows { reply } => {
                let _ = reply.send(state.windows.clone());
            }
            DesktopActorMsg::GetDesktopSnapshot { reply } => {
                let _ = reply.send(DesktopSnapshot {
                    windows: state.windows.clone(),
                    active_window: state.active_window.clone(),
                });
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        tracing::info!(
            actor_id = %myself.get_id(),
            desktop_id = %state.desktop_id,
            "DesktopActor stopped"
        );
        Ok(())
    }
}

impl DesktopActor {
    /// Get next z-index and increment counter
    fn next_z(&self, state: &mut DesktopState) -> u32 {
        let z = state.next_z;
        state.next_z += 1;
        z
    }

    fn position_of(&self, state: &DesktopState, window_id: &str) -> Option<usize> {
        state.windows.iter().position(|w| w.id == window_id)
    }

    /// Pick the topmost visible window as the new active one.
    fn reselect_active(&self, state: &mut DesktopState) {
        state.active_window = state
            .windows
            .iter()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id.clone());
    }

    fn handle_open_window(&self, spec: OpenWindowSpec, state: &mut DesktopState) -> WindowRecord {
        let bounds = WindowBounds {
            x: spec.x.unwrap_or(DEFAULT_WINDOW_X),
            y: spec.y.unwrap_or(DEFAULT_WINDOW_Y),
            width: spec.width.unwrap_or(DEFAULT_WINDOW_WIDTH),
            height: spec.height.unwrap_or(DEFAULT_WINDOW_HEIGHT),
        };

        let window = WindowRecord {
            id: ulid::Ulid::new().to_string(),
            title: spec.title.unwrap_or_else(|| "Untitled".to_string()),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            z_index: self.next_z(state),
            minimized: false,
            maximized: false,
            closed: false,
            default_bounds: bounds,
            prev_bounds: None,
            route: spec
                .route
                .unwrap_or_else(|| DEFAULT_WINDOW_ROUTE.to_string()),
            content: spec.content,
        };

        state.windows.push(window.clone());
        state.active_window = Some(window.id.clone());
        window
    }

    fn handle_toggle_minimized(
        &self,
        window_id: &str,
        state: &mut DesktopState,
    ) -> Option<WindowRecord> {
        let idx = self.position_of(state, window_id)?;
        if state.windows[idx].closed {
            return None;
        }

        let window = &mut state.windows[idx];
        window.minimized = !window.minimized;
        if window.minimized {
            // Minimizing also leaves the maximized state behind.
            window.maximized = false;
            if let Some(prev) = window.prev_bounds.take() {
                window.set_bounds(prev);
            }
        }

        let result = state.windows[idx].clone();
        if result.minimized {
            if state.active_window.as_deref() == Some(window_id) {
                self.reselect_active(state);
            }
        } else {
            state.active_window = Some(window_id.to_string());
        }
        Some(result)
    }

    fn handle_toggle_maximized(
        &self,
        window_id: &str,
        viewport: WindowBounds,
        state: &mut DesktopState,
    ) -> Option<WindowRecord> {
        let idx = self.position_of(state, window_id)?;
        if state.windows[idx].closed {
            return None;
        }

        if !state.windows[idx].maximized {
            let new_z = self.next_z(state);
            let window = &mut state.windows[idx];
            window.prev_bounds = Some(window.bounds());
            window.set_bounds(viewport);
            window.maximized = true;
            window.minimized = false;
            window.z_index = new_z;
            state.active_window = Some(window_id.to_string());
        } else {
            let window = &mut state.windows[idx];
            window.maximized = false;
            if let Some(prev) = window.prev_bounds.take() {
                window.set_bounds(prev);
            }
        }

        Some(state.windows[idx].clone())
    }

    fn handle_close_window(
        &self,
        window_id: &str,
        state: &mut DesktopState,
    ) -> Option<WindowRecord> {
        let idx = self.position_of(state, window_id)?;

        let window = &mut state.windows[idx];
        window.closed = true;
        window.minimized = false;
        window.maximized = false;
        window.prev_bounds = None;
        window.content = None;

        let result = state.windows[idx].clone();
        if state.active_window.as_deref() == Some(window_id) {
            self.reselect_active(state);
        }
        Some(result)
    }

    fn handle_restore_window(
        &self,
        window_id: &str,
        state: &mut DesktopState,
    ) -> Option<RestoredWindow> {
        let idx = self.position_of(state, window_id)?;
        let new_z = self.next_z(state);

        let window = &mut state.windows[idx];
        let was_closed = window.closed;
        if was_closed {
            let defaults = window.default_bounds;
            window.set_bounds(defaults);
            window.route = DEFAULT_WINDOW_ROUTE.to_string();
        }
        window.closed = false;
        window.minimized = false;
        window.maximized = false;
        window.prev_bounds = None;
        window.z_index = new_z;

        let navigate = was_closed.then(|| window.route.clone());
        let result = RestoredWindow {
            window: window.clone(),
            navigate,
        };
        state.active_window = Some(window_id.to_string());
        Some(result)
    }

    fn handle_move_window(
        &self,
        window_id: &str,
        x: i32,
        y: i32,
        state: &mut DesktopState,
    ) -> Option<WindowRecord> {
        let idx = self.position_of(state, window_id)?;
        let window = &mut state.windows[idx];
        window.x = x;
        window.y = y;
        Some(window.clone())
    }

    fn handle_resize_window(
        &self,
        window_id: &str,
        width: i32,
        height: i32,
        state: &mut DesktopState,
    ) -> Option<WindowRecord> {
        let idx = self.position_of(state, window_id)?;
        let window = &mut state.windows[idx];
        window.width = width;
        window.height = height;
        Some(window.clone())
    }

    fn handle_focus_window(
        &self,
        window_id: &str,
        state: &mut DesktopState,
    ) -> Option<WindowRecord> {
        let idx = self.position_of(state, window_id)?;
        let new_z = self.next_z(state);
        let window = &mut state.windows[idx];
        window.z_index = new_z;
        let result = window.clone();
        state.active_window = Some(window_id.to_string());
        Some(result)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convenience function to open a window
pub async fn open_window(
    desktop: &ActorRef<DesktopActorMsg>,
    spec: OpenWindowSpec,
) -> Result<WindowRecord, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::OpenWindow {
        spec,
        reply
    })
}

/// Convenience function to toggle the minimized flag
pub async fn toggle_minimized(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
) -> Result<Option<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::ToggleMinimized {
        window_id: window_id.into(),
        reply,
    })
}

/// Convenience function to toggle the maximized flag
pub async fn toggle_maximized(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
    viewport: WindowBounds,
) -> Result<Option<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::ToggleMaximized {
        window_id: window_id.into(),
        viewport,
        reply,
    })
}

/// Convenience function to close a window
pub async fn close_window(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
) -> Result<Option<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::CloseWindow {
        window_id: window_id.into(),
        reply,
    })
}

/// Convenience function to restore a window
pub async fn restore_window(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
) -> Result<Option<RestoredWindow>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::RestoreWindow {
        window_id: window_id.into(),
        reply,
    })
}

/// Convenience function to move a window
pub async fn move_window(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
    x: i32,
    y: i32,
) -> Result<Option<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::MoveWindow {
        window_id: window_id.into(),
        x,
        y,
        reply,
    })
}

/// Convenience function to resize a window
pub async fn resize_window(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
    width: i32,
    height: i32,
) -> Result<Option<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::ResizeWindow {
        window_id: window_id.into(),
        width,
        height,
        reply,
    })
}

/// Convenience function to focus a window
pub async fn focus_window(
    desktop: &ActorRef<DesktopActorMsg>,
    window_id: impl Into<String>,
) -> Result<Option<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::FocusWindow {
        window_id: window_id.into(),
        reply,
    })
}

/// Convenience function to get all windows
pub async fn get_windows(
    desktop: &ActorRef<DesktopActorMsg>,
) -> Result<Vec<WindowRecord>, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::GetWindows { reply })
}

/// Convenience function to get the desktop snapshot
pub async fn get_desktop_snapshot(
    desktop: &ActorRef<DesktopActorMsg>,
) -> Result<DesktopSnapshot, ractor::RactorErr<DesktopActorMsg>> {
    ractor::call!(desktop, |reply| DesktopActorMsg::GetDesktopSnapshot {
        reply
    })
}

// ============================================================================
// Tests
// ============================================================================
