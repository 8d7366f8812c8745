//! Disk usage reporting and cleanup of old downloads.

use crate::error::ApiError;
use crate::http::{HttpClient, RequestSpec};
use crate::models::{CleanupReport, StorageStats};

#[derive(Debug, Clone, Copy)]
pub struct StorageApi<'a> {
    http: &'a HttpClient,
}

impl<'a> StorageApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn stats(&self) -> Result<StorageStats, ApiError> {
        self.http.get("/api/storage/stats").await
    }

    /// Deletes downloaded files older than `older_than_days`.
    pub async fn cleanup(&self, older_than_days: u32) -> Result<CleanupReport, ApiError> {
        let spec = RequestSpec::delete("/api/storage/cleanup").query("older_than_days", older_than_days);
        self.http.request(spec).await
    }
}
