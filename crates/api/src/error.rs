use std::time::Duration;

use thiserror::Error;

/// Failure modes of a backend request.
///
/// Client-side rejections (4xx) carry the backend's `detail` message and are
/// never retried; 409 is split out so callers can react to stale-revision
/// saves. Transport problems and 5xx responses are retriable.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request rejected ({status}): {detail}")]
    Client { status: u16, detail: String },

    #[error("conflict: {detail}")]
    Conflict { detail: String },

    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for failures worth another attempt (the backend never saw the
    /// request, or failed in a way a fresh attempt might not).
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ApiError::Server { .. } | ApiError::Timeout(_) | ApiError::Network(_)
        )
    }
}
