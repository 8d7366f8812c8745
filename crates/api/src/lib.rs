//! HTTP client for the VidFlow backend.
//!
//! [`VidFlowApi`] wraps a [`http::HttpClient`] and exposes one accessor per
//! backend resource (workflows, downloads, channels, ...). All request
//! plumbing (timeouts, retries with exponential backoff, error mapping,
//! cancellation) lives in [`http`]; the resource modules only describe
//! endpoints and payload shapes.

pub mod accounts;
pub mod auth;
pub mod channels;
pub mod config;
pub mod dashboard;
pub mod downloads;
pub mod error;
pub mod http;
pub mod models;
pub mod storage;
pub mod watermarks;
pub mod workflows;

pub use config::ApiConfig;
pub use error::ApiError;
pub use http::HttpClient;

use tokio_util::sync::CancellationToken;

/// Entry point for talking to the backend REST API.
#[derive(Debug, Clone)]
pub struct VidFlowApi {
    http: HttpClient,
}

impl VidFlowApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }

    /// Builds a client whose in-flight requests abort when `token` fires.
    pub fn with_cancellation(config: &ApiConfig, token: CancellationToken) -> Self {
        Self {
            http: HttpClient::with_cancellation(config, token),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn workflows(&self) -> workflows::WorkflowsApi<'_> {
        workflows::WorkflowsApi::new(&self.http)
    }

    pub fn downloads(&self) -> downloads::DownloadsApi<'_> {
        downloads::DownloadsApi::new(&self.http)
    }

    pub fn channels(&self) -> channels::ChannelsApi<'_> {
        channels::ChannelsApi::new(&self.http)
    }

    pub fn accounts(&self) -> accounts::AccountsApi<'_> {
        accounts::AccountsApi::new(&self.http)
    }

    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(&self.http)
    }

    pub fn dashboard(&self) -> dashboard::DashboardApi<'_> {
        dashboard::DashboardApi::new(&self.http)
    }

    pub fn watermarks(&self) -> watermarks::WatermarksApi<'_> {
        watermarks::WatermarksApi::new(&self.http)
    }

    pub fn storage(&self) -> storage::StorageApi<'_> {
        storage::StorageApi::new(&self.http)
    }
}
