//! Request plumbing shared by every resource module.
//!
//! One attempt = build request, apply the per-attempt timeout, map the
//! response into [`Payload`] or [`ApiError`]. [`HttpClient::send`] wraps that
//! in a retry loop with exponential backoff (1s, 2s, 4s, ...) for retriable
//! failures, and races every wait against the cancellation token.

use std::time::Duration;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// First retry delay; each further retry doubles it.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Body of a successful response.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Bytes(Vec<u8>),
}

/// A single request, with per-request overrides for timeout and retries.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    timeout: Option<Duration>,
    retries: Option<u32>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
            retries: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    inner: reqwest::Client,
    timeout: Duration,
    retries: u32,
    cancel: CancellationToken,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    pub fn with_cancellation(config: &ApiConfig, cancel: CancellationToken) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            inner: reqwest::Client::new(),
            timeout: config.timeout,
            retries: config.retries,
            cancel,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Sends `spec`, retrying retriable failures up to the retry budget.
    pub async fn send(&self, spec: RequestSpec) -> Result<Payload, ApiError> {
        let retries = spec.retries.unwrap_or(self.retries);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => return Err(ApiError::Cancelled),
                outcome = self.execute(&spec) => outcome,
            };
            match outcome {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retriable() && attempt <= retries => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                    warn!(
                        method = %spec.method,
                        path = %spec.path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(ApiError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Sends `spec` and decodes the JSON response body into `T`.
    pub async fn request<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, ApiError> {
        match self.send(spec).await? {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
            }
            Payload::Bytes(_) => Err(ApiError::Decode(
                "expected a JSON response body".to_string(),
            )),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::get(path)).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut spec = RequestSpec::get(path);
        for (key, value) in query {
            spec = spec.query(*key, value);
        }
        self.request(spec).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(RequestSpec::post(path).body(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::post(path)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(RequestSpec::put(path).body(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::delete(path)).await
    }

    // ---- private helpers ----

    async fn execute(&self, spec: &RequestSpec) -> Result<Payload, ApiError> {
        let url = format!("{}{}", self.base_url, spec.path);
        let timeout = spec.timeout.unwrap_or(self.timeout);

        let mut request = self.inner.request(spec.method.clone(), &url).timeout(timeout);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        debug!(method = %spec.method, %url, "sending request");
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                ApiError::Timeout(timeout)
            } else {
                ApiError::Network(err)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            let is_json = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json"));
            if is_json {
                let value = response
                    .json::<Value>()
                    .await
                    .map_err(|e| ApiError::Decode(e.to_string()))?;
                Ok(Payload::Json(value))
            } else {
                let bytes = response.bytes().await.map_err(ApiError::Network)?;
                Ok(Payload::Bytes(bytes.to_vec()))
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            Err(match status {
                StatusCode::CONFLICT => ApiError::Conflict { detail },
                s if s.is_client_error() => ApiError::Client {
                    status: s.as_u16(),
                    detail,
                },
                s => ApiError::Server {
                    status: s.as_u16(),
                    detail,
                },
            })
        }
    }
}

/// Pulls the `detail` message out of a FastAPI-style error body, falling back
/// to the raw body text.
fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}
