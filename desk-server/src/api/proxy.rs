//! Local development passthrough to the remote content API.
//!
//! Rewrites `/content-api/{path}` onto the configured remote base, so the
//! WASM UI can talk to the API without a CORS exemption. Hop-by-hop headers
//! are stripped in both directions; an unreachable upstream answers 502.

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::api::ApiState;

const MAX_PROXY_BODY_BYTES: usize = 2 * 1024 * 1024;

const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "proxy-connection",
    "keep-alive",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.to_ascii_lowercase().as_str())
}

pub async fn proxy_content_api(
    Path(path): Path<String>,
    State(state): State<ApiState>,
    req: Request,
) -> Response {
    let query = req
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();
    let target = format!("{}/{}{}", state.content_api_base, path, query);

    debug!(%target, "proxying content API request");

    let method = match reqwest::Method::from_bytes(req.method().as_str().as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            error!("bad proxy method: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let (parts, body) = req.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_PROXY_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to read proxy request body: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let mut headers = reqwest::header::HeaderMap::new();
    for (name, value) in parts.headers.iter() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        if let (Ok(proxy_name), Ok(proxy_value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()),
            reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.insert(proxy_name, proxy_value);
        }
    }

    let upstream = match state
        .http
        .request(method, &target)
        .headers(headers)
        .body(body_bytes.to_vec())
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!(%target, "content API unreachable: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                format!("content API unreachable: {e}"),
            )
                .into_response();
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut builder = Response::builder().status(status);
    for (name, value) in upstream.headers().iter() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let body = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to read upstream body: {e}");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    builder
        .body(Body::from(body))
        .unwrap_or_else(|e| {
            error!("failed to assemble proxy response: {e}");
            StatusCode::BAD_GATEWAY.into_response()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_by_hop_detection() {
        assert!(is_hop_by_hop("Connection"));
        assert!(is_hop_by_hop("transfer-encoding"));
        assert!(is_hop_by_hop("host"));
        assert!(!is_hop_by_hop("authorization"));
        assert!(!is_hop_by_hop("content-type"));
    }
}
