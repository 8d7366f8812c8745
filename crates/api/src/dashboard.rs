//! Dashboard aggregates: headline stats, recent activity, channel rollups.

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{ActivityItem, ChannelActivity, DashboardStats};

#[derive(Debug, Clone, Copy)]
pub struct DashboardApi<'a> {
    http: &'a HttpClient,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.http.get("/api/dashboard/stats").await
    }

    pub async fn activity(&self, limit: u32) -> Result<Vec<ActivityItem>, ApiError> {
        self.http
            .get_query("/api/dashboard/activity", &[("limit", limit.to_string())])
            .await
    }

    pub async fn channel_activity(&self) -> Result<Vec<ChannelActivity>, ApiError> {
        self.http.get("/api/dashboard/channels").await
    }
}
