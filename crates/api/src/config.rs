//! Client configuration, sourced from the environment.

use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Path of the combined progress/event WebSocket on the backend.
pub const STREAM_PATH: &str = "/api/downloads/progress";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend origin, without a trailing slash.
    pub base_url: String,
    /// WebSocket endpoint for the live event stream.
    pub ws_url: String,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry budget for idempotent requests (0 = single attempt).
    pub retries: u32,
}

impl ApiConfig {
    /// Reads `VIDFLOW_API_URL`, `VIDFLOW_WS_URL`, `VIDFLOW_HTTP_TIMEOUT_MS`
    /// and `VIDFLOW_HTTP_RETRIES`, falling back to defaults for anything
    /// unset or unparseable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("VIDFLOW_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let ws_url = std::env::var("VIDFLOW_WS_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| derive_ws_url(&base_url));

        let timeout = std::env::var("VIDFLOW_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);

        let retries = std::env::var("VIDFLOW_HTTP_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        Self {
            base_url,
            ws_url,
            timeout,
            retries,
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let ws_url = derive_ws_url(&base_url);
        Self {
            base_url,
            ws_url,
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

/// Maps an http(s) origin to the matching ws(s) stream endpoint.
fn derive_ws_url(base_url: &str) -> String {
    let fallback = || format!("ws://localhost:8000{STREAM_PATH}");
    let Ok(mut url) = Url::parse(base_url) else {
        return fallback();
    };
    let scheme = match url.scheme() {
        "https" => "wss",
        _ => "ws",
    };
    if url.set_scheme(scheme).is_err() {
        return fallback();
    }
    url.set_path(STREAM_PATH);
    url.to_string()
}
