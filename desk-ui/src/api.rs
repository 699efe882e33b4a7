use gloo_net::http::Request;
use serde::Deserialize;
use shared_types::{
    DesktopSnapshot, OpenWindowSpec, PostRecord, SortDirection, WindowBounds, WindowRecord,
};
use std::sync::OnceLock;

/// Get the API base URL based on current environment
/// - In development (localhost): use http://localhost:8080
/// - In production: use same origin (the server serves the static bundle)
fn get_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:8080".to_string()
    } else {
        "".to_string()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// Get the cached API base URL
pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

async fn describe_http_error(response: gloo_net::http::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if body.trim().is_empty() {
        return format!("HTTP error: {status}");
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
        if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
            return format!("HTTP error: {status} ({error})");
        }
    }

    format!("HTTP error: {status} ({body})")
}

// ============================================================================
// Desktop API Functions
// ============================================================================

#[derive(Debug, Deserialize)]
struct SnapshotEnvelope {
    success: bool,
    desktop: DesktopSnapshot,
}

/// Envelope shared by all window mutation endpoints. `window` is null when
/// the server no-opped (unknown id), `navigate` only comes back from restore.
#[derive(Debug, Deserialize)]
struct WindowEnvelope {
    success: bool,
    #[serde(default)]
    window: Option<WindowRecord>,
    #[serde(default)]
    navigate: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostsEnvelope {
    success: bool,
    #[serde(default)]
    posts: Vec<PostRecord>,
}

async fn parse_window_envelope(
    response: gloo_net::http::Response,
) -> Result<WindowEnvelope, String> {
    if !response.ok() {
        return Err(describe_http_error(response).await);
    }

    let data: WindowEnvelope = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON: {e}"))?;

    if !data.success {
        return Err(data
            .error
            .clone()
            .unwrap_or_else(|| "API returned success=false".to_string()));
    }

    Ok(data)
}

pub async fn fetch_desktop_snapshot(desktop_id: &str) -> Result<DesktopSnapshot, String> {
    let url = format!("{}/desktop/{}", api_base(), desktop_id);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    if !response.ok() {
        return Err(describe_http_error(response).await);
    }

    let data: SnapshotEnvelope = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON: {e}"))?;

    if !data.success {
        return Err("API returned success=false".to_string());
    }

    Ok(data.desktop)
}

pub async fn open_window(
    desktop_id: &str,
    spec: &OpenWindowSpec,
) -> Result<WindowRecord, String> {
    let url = format!("{}/desktop/{}/windows", api_base(), desktop_id);

    let response = Request::post(&url)
        .json(spec)
        .map_err(|e| format!("Failed to serialize request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    parse_window_envelope(response)
        .await?
        .window
        .ok_or_else(|| "Window not returned".to_string())
}

pub async fn close_window(desktop_id: &str, window_id: &str) -> Result<Option<WindowRecord>, String> {
    let url = format!(
        "{}/desktop/{}/windows/{}",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::delete(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    Ok(parse_window_envelope(response).await?.window)
}

pub async fn focus_window(desktop_id: &str, window_id: &str) -> Result<Option<WindowRecord>, String> {
    let url = format!(
        "{}/desktop/{}/windows/{}/focus",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    Ok(parse_window_envelope(response).await?.window)
}

pub async fn toggle_minimized(
    desktop_id: &str,
    window_id: &str,
) -> Result<Option<WindowRecord>, String> {
    let url = format!(
        "{}/desktop/{}/windows/{}/minimize",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    Ok(parse_window_envelope(response).await?.window)
}

pub async fn toggle_maximized(
    desktop_id: &str,
    window_id: &str,
    viewport: WindowBounds,
) -> Result<Option<WindowRecord>, String> {
    let url = format!(
        "{}/desktop/{}/windows/{}/maximize",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::post(&url)
        .json(&serde_json::json!({ "viewport": viewport }))
        .map_err(|e| format!("Failed to serialize request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    Ok(parse_window_envelope(response).await?.window)
}

/// Restore a window. Returns the revived window plus the route the server
/// asks the UI to navigate to (only set when the window had been closed).
pub async fn restore_window(
    desktop_id: &str,
    window_id: &str,
) -> Result<(Option<WindowRecord>, Option<String>), String> {
    let url = format!(
        "{}/desktop/{}/windows/{}/restore",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    let data = parse_window_envelope(response).await?;
    Ok((data.window, data.navigate))
}

pub async fn move_window(desktop_id: &str, window_id: &str, x: i32, y: i32) -> Result<(), String> {
    let url = format!(
        "{}/desktop/{}/windows/{}/position",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::patch(&url)
        .json(&serde_json::json!({ "x": x, "y": y }))
        .map_err(|e| format!("Failed to serialize request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    parse_window_envelope(response).await.map(|_| ())
}

pub async fn resize_window(
    desktop_id: &str,
    window_id: &str,
    width: i32,
    height: i32,
) -> Result<(), String> {
    let url = format!(
        "{}/desktop/{}/windows/{}/size",
        api_base(),
        desktop_id,
        window_id
    );

    let response = Request::patch(&url)
        .json(&serde_json::json!({ "width": width, "height": height }))
        .map_err(|e| format!("Failed to serialize request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    parse_window_envelope(response).await.map(|_| ())
}

// ============================================================================
// Content API Functions
// ============================================================================

pub async fn fetch_posts(sort: SortDirection) -> Result<Vec<PostRecord>, String> {
    let url = format!("{}/posts?sort={}", api_base(), sort.as_str());

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    if !response.ok() {
        return Err(describe_http_error(response).await);
    }

    let data: PostsEnvelope = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON: {e}"))?;

    if !data.success {
        return Err("API returned success=false".to_string());
    }

    Ok(data.posts)
}
