//! Blog post endpoint - front door of the content store

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::ApiState;
use shared_types::SortDirection;

#[derive(Debug, Default, Deserialize)]
pub struct PostsQuery {
    #[serde(default)]
    pub sort: SortDirection,
}

/// Fetch the post list sorted by creation time.
///
/// Always answers 200: upstream failures already degraded to an empty list
/// inside the content client.
pub async fn get_posts(
    State(state): State<ApiState>,
    Query(query): Query<PostsQuery>,
) -> impl IntoResponse {
    let posts = state.content.fetch_posts(query.sort).await;

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "posts": posts
        })),
    )
}
