//! Content store - one remote "query database" call for blog posts
//!
//! The query sorts by creation timestamp and returns the first page of
//! results. Any failure (connect, HTTP status, parse) degrades to an empty
//! list after logging; callers never see an error. No retries, no
//! pagination, no caching.

use serde::Deserialize;
use shared_types::{PostRecord, SortDirection};

/// API version header the remote query endpoint requires.
const CONTENT_API_VERSION: &str = "2022-06-28";

#[derive(Debug, thiserror::Error)]
enum ContentError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("query returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PostRecord>,
}

#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    database_id: String,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, database_id: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            database_id: database_id.into(),
        }
    }

    /// Fetch the post list, sorted by creation time.
    ///
    /// Degrades to an empty list on any failure.
    pub async fn fetch_posts(&self, sort: SortDirection) -> Vec<PostRecord> {
        match self.query_database(sort).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!(error = %e, "content query failed, returning empty post list");
                Vec::new()
            }
        }
    }

    async fn query_database(&self, sort: SortDirection) -> Result<Vec<PostRecord>, ContentError> {
        let url = format!("{}/v1/databases/{}/query", self.base_url, self.database_id);
        let body = serde_json::json!({
            "sorts": [{
                "timestamp": "created_time",
                "direction": sort,
            }],
        });

        let mut request = self
            .http
            .post(&url)
            .header("Notion-Version", CONTENT_API_VERSION)
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ContentError::Status(response.status()));
        }

        let data: QueryResponse = response.json().await?;
        Ok(data.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_posts_parses_results() {
        let app = Router::new().route(
            "/v1/databases/{database_id}/query",
            post(|| async {
                Json(serde_json::json!({
                    "results": [
                        {
                            "id": "page-1",
                            "created_time": "2024-05-01T12:00:00.000Z",
                            "url": "https://example.com/page-1",
                            "properties": {"Name": {"title": []}}
                        },
                        {
                            "id": "page-2",
                            "created_time": "2024-04-01T12:00:00.000Z"
                        }
                    ]
                }))
            }),
        );
        let base = spawn_stub(app).await;

        let client = ContentClient::new(base, Some("secret".to_string()), "db-1");
        let posts = client.fetch_posts(SortDirection::Descending).await;

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "page-1");
        assert_eq!(posts[0].url.as_deref(), Some("https://example.com/page-1"));
        assert!(posts[1].url.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_list() {
        // Nothing listens here; the connect error must not propagate.
        let client = ContentClient::new("http://127.0.0.1:1", None, "db-1");
        let posts = client.fetch_posts(SortDirection::Ascending).await;
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_yields_empty_list() {
        let app = Router::new().route(
            "/v1/databases/{database_id}/query",
            post(|| async {
                (
                    axum::http::StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({"message": "API token is invalid."})),
                )
            }),
        );
        let base = spawn_stub(app).await;

        let client = ContentClient::new(base, None, "db-1");
        let posts = client.fetch_posts(SortDirection::Descending).await;
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_yields_empty_list() {
        let app = Router::new().route(
            "/v1/databases/{database_id}/query",
            post(|| async { "not json" }),
        );
        let base = spawn_stub(app).await;

        let client = ContentClient::new(base, None, "db-1");
        let posts = client.fetch_posts(SortDirection::Descending).await;
        assert!(posts.is_empty());
    }
}
