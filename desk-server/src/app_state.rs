use ractor::{Actor, ActorRef};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::actors::desktop::{DesktopActor, DesktopActorMsg, DesktopArguments};

/// Process-wide handle to the per-desktop window actors.
///
/// Desktops are spawned lazily on first use and cached; there is no global
/// singleton — everything reaches the actors through this handle.
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Default)]
struct AppStateInner {
    desktops: Mutex<HashMap<String, ActorRef<DesktopActorMsg>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_create_desktop(
        &self,
        desktop_id: String,
    ) -> Result<ActorRef<DesktopActorMsg>, String> {
        let mut guard = self.inner.desktops.lock().await;
        if let Some(existing) = guard.get(&desktop_id) {
            return Ok(existing.clone());
        }

        let (desktop, _handle) = Actor::spawn(
            Some(format!("desktop:{desktop_id}")),
            DesktopActor,
            DesktopArguments {
                desktop_id: desktop_id.clone(),
            },
        )
        .await
        .map_err(|e| e.to_string())?;

        guard.insert(desktop_id, desktop.clone());
        Ok(desktop)
    }
}
