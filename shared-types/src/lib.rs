//! Shared types between frontend and backend
//!
//! These types are used by both:
//! - the desk server (native Rust, axum + ractor)
//! - the Dioxus UI (WASM)
//!
//! Serializable with serde for JSON over WebSocket/HTTP

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Window Types
// ============================================================================

/// Fallback geometry for windows opened without explicit overrides.
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_WIDTH: i32 = 850;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 800;

/// Route a window starts on, and the one `restore` navigates back to.
pub const DEFAULT_WINDOW_ROUTE: &str = "/";

/// A position/size pair, used for live geometry as well as the saved
/// default (restore-after-close) and previous (restore-after-maximize)
/// snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Individual window state.
///
/// Windows are soft-deleted: `closed` flips to true but the record stays in
/// the collection so `restore` can revive it at `default_bounds`.
///
/// Flag invariant: at most one of {minimized, maximized} is true while the
/// window is open; `closed` implies both are false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowRecord {
    pub id: String,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub z_index: u32,
    pub minimized: bool,
    pub maximized: bool,
    pub closed: bool,
    /// Geometry recorded at creation; restore target after close.
    pub default_bounds: WindowBounds,
    /// Geometry snapshot taken when maximizing; restore target after
    /// un-maximize.
    pub prev_bounds: Option<WindowBounds>,
    /// Route whose view this window hosts.
    pub route: String,
    /// Optional app-specific content payload.
    pub content: Option<serde_json::Value>,
}

impl WindowRecord {
    pub fn bounds(&self) -> WindowBounds {
        WindowBounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_bounds(&mut self, bounds: WindowBounds) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    /// Open and not minimized, i.e. rendered as a floating window.
    pub fn is_visible(&self) -> bool {
        !self.closed && !self.minimized
    }
}

/// Caller-supplied overrides for opening a window; anything left `None`
/// falls back to the fixed defaults above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenWindowSpec {
    pub title: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub route: Option<String>,
    pub content: Option<serde_json::Value>,
}

/// Desktop state - all windows and the active one
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DesktopSnapshot {
    pub windows: Vec<WindowRecord>,
    pub active_window: Option<String>,
}

// ============================================================================
// Content Types
// ============================================================================

/// Sort order for the created-time sort of the content query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Descending
    }
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// One result record of the remote database query.
///
/// `properties` is kept as raw JSON: the remote schema is user-defined and
/// the UI digs out what it can display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostRecord {
    pub id: String,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_window() -> WindowRecord {
        WindowRecord {
            id: "01J0000000000000000000000A".to_string(),
            title: "Blog".to_string(),
            x: DEFAULT_WINDOW_X,
            y: DEFAULT_WINDOW_Y,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            z_index: 100,
            minimized: false,
            maximized: false,
            closed: false,
            default_bounds: WindowBounds {
                x: DEFAULT_WINDOW_X,
                y: DEFAULT_WINDOW_Y,
                width: DEFAULT_WINDOW_WIDTH,
                height: DEFAULT_WINDOW_HEIGHT,
            },
            prev_bounds: None,
            route: DEFAULT_WINDOW_ROUTE.to_string(),
            content: None,
        }
    }

    #[test]
    fn test_window_record_roundtrip() {
        let window = sample_window();
        let json = serde_json::to_string(&window).unwrap();
        let back: WindowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(window, back);
    }

    #[test]
    fn test_window_visibility() {
        let mut window = sample_window();
        assert!(window.is_visible());

        window.minimized = true;
        assert!(!window.is_visible());

        window.minimized = false;
        window.closed = true;
        assert!(!window.is_visible());
    }

    #[test]
    fn test_set_bounds() {
        let mut window = sample_window();
        window.set_bounds(WindowBounds {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
        });
        assert_eq!(window.x, 10);
        assert_eq!(window.y, 20);
        assert_eq!(window.width, 300);
        assert_eq!(window.height, 200);
    }

    #[test]
    fn test_sort_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&SortDirection::Descending).unwrap(),
            "\"descending\""
        );
        assert_eq!(
            serde_json::to_string(&SortDirection::Ascending).unwrap(),
            "\"ascending\""
        );
        assert_eq!(SortDirection::default(), SortDirection::Descending);
    }

    #[test]
    fn test_open_window_spec_defaults_to_empty() {
        let spec: OpenWindowSpec = serde_json::from_str("{}").unwrap();
        assert!(spec.title.is_none());
        assert!(spec.x.is_none());
        assert!(spec.route.is_none());
    }

    #[test]
    fn test_post_record_tolerates_missing_optionals() {
        let json = r#"{
            "id": "page-1",
            "created_time": "2024-05-01T12:00:00.000Z"
        }"#;
        let post: PostRecord = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, "page-1");
        assert!(post.url.is_none());
        assert!(post.properties.is_null());
    }
}
