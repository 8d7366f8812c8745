//! OAuth flow for connecting upload accounts.

use vidflow_core::types::Platform;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{AuthorizeUrl, OAuthCallback, OAuthResult};

#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Asks the backend for the platform's OAuth consent URL.
    pub async fn authorize_url(&self, platform: Platform) -> Result<AuthorizeUrl, ApiError> {
        self.http.get(&format!("/api/auth/{platform}/authorize")).await
    }

    /// Exchanges the authorization code and stores the resulting account.
    pub async fn complete(
        &self,
        platform: Platform,
        code: impl Into<String>,
    ) -> Result<OAuthResult, ApiError> {
        let body = OAuthCallback { code: code.into() };
        self.http
            .post(&format!("/api/auth/{platform}/callback"), &body)
            .await
    }
}
