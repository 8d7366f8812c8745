//! Saved channels: listing, detail, soft delete and rescans.

use vidflow_core::DbId;

use crate::error::ApiError;
use crate::http::{HttpClient, RequestSpec};
use crate::models::{ChannelDetail, ChannelList, ChannelScanResult, Message};

#[derive(Debug, Clone, Copy)]
pub struct ChannelsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ChannelsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<ChannelList, ApiError> {
        self.http.get("/api/channels/").await
    }

    pub async fn detail(&self, channel_id: DbId) -> Result<ChannelDetail, ApiError> {
        self.http.get(&format!("/api/channels/{channel_id}")).await
    }

    /// Soft-deletes a channel; its videos stay in the library.
    pub async fn delete(&self, channel_id: DbId) -> Result<Message, ApiError> {
        self.http.delete(&format!("/api/channels/{channel_id}")).await
    }

    /// Rescans a saved channel for new videos.
    pub async fn sync(
        &self,
        channel_id: DbId,
        max_videos: Option<u32>,
    ) -> Result<ChannelScanResult, ApiError> {
        let mut spec = RequestSpec::post(format!("/api/channels/{channel_id}/sync"));
        if let Some(max) = max_videos {
            spec = spec.query("max_videos", max);
        }
        self.http.request(spec).await
    }
}
