#[derive(Debug, Clone)]
pub struct Config {
    /// Port the server listens on
    pub port: u16,
    /// Base URL of the remote content API (also the dev-proxy upstream)
    pub content_api_base: String,
    /// Bearer token for the content API; queries go out unauthenticated
    /// without it and the API will answer 401, which degrades to an empty
    /// post list
    pub content_api_token: Option<String>,
    /// Database the post query runs against
    pub content_database_id: String,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env_parse("DESK_PORT", 8080)?,
            content_api_base: env_str("CONTENT_API_BASE", "https://api.notion.com"),
            content_api_token: std::env::var("CONTENT_API_TOKEN").ok(),
            content_database_id: env_str("CONTENT_DATABASE_ID", ""),
            allowed_origins: env_csv(
                "DESK_ALLOWED_ORIGINS",
                &[
                    "http://localhost:3000",
                    "http://127.0.0.1:3000",
                    "http://localhost:8080",
                ],
            ),
        })
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_csv(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| (*s).to_string()).collect(),
    }
}
