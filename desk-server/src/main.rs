use axum::http::{header, HeaderValue, Method};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};

use desk_server::api;
use desk_server::app_state::AppState;
use desk_server::config::Config;
use desk_server::content::ContentClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    tracing::info!("Starting WebDesk server");

    let app_state = Arc::new(AppState::new());
    let ws_sessions: api::websocket::WsSessions = Arc::new(Mutex::new(HashMap::new()));

    if config.content_api_token.is_none() {
        tracing::warn!("CONTENT_API_TOKEN not set; content queries will degrade to empty lists");
    }
    let content = ContentClient::new(
        config.content_api_base.clone(),
        config.content_api_token.clone(),
        config.content_database_id.clone(),
    );

    let allowed_origins = config
        .allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    let api_state = api::ApiState {
        app_state,
        ws_sessions,
        content,
        http: reqwest::Client::new(),
        content_api_base: config.content_api_base.trim_end_matches('/').to_string(),
    };

    let app = api::router().with_state(api_state).layer(cors);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
