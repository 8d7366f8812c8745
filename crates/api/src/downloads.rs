//! Single and bulk video downloads, plus channel scanning.

use vidflow_core::DbId;

use crate::error::ApiError;
use crate::http::{HttpClient, RequestSpec};
use crate::models::{
    BulkDownloadRequest, BulkDownloadResponse, ChannelScanResult, DownloadOptions, DownloadRecord,
    DownloadRequest, Message, VideoInfo, VideoRecord,
};

#[derive(Debug, Clone, Copy)]
pub struct DownloadsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> DownloadsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Queues a single video for download. The backend rejects channel URLs
    /// here; those go through [`Self::scan_channel`].
    pub async fn start(
        &self,
        url: impl Into<String>,
        options: DownloadOptions,
    ) -> Result<DownloadRecord, ApiError> {
        let body = DownloadRequest {
            url: url.into(),
            options,
        };
        self.http.post("/api/downloads/single", &body).await
    }

    pub async fn bulk(
        &self,
        video_urls: Vec<String>,
        options: DownloadOptions,
    ) -> Result<BulkDownloadResponse, ApiError> {
        let body = BulkDownloadRequest {
            video_urls,
            options,
        };
        self.http.post("/api/downloads/bulk", &body).await
    }

    /// Probes a video URL for metadata without downloading it.
    pub async fn video_info(&self, url: &str) -> Result<VideoInfo, ApiError> {
        self.http
            .get_query("/api/downloads/info", &[("url", url.to_string())])
            .await
    }

    /// Scans a channel URL and returns the channel plus its latest videos.
    pub async fn scan_channel(
        &self,
        url: &str,
        max_videos: Option<u32>,
    ) -> Result<ChannelScanResult, ApiError> {
        let mut spec = RequestSpec::post("/api/downloads/channel/scan").query("url", url);
        if let Some(max) = max_videos {
            spec = spec.query("max_videos", max);
        }
        self.http.request(spec).await
    }

    pub async fn get(&self, download_id: DbId) -> Result<DownloadRecord, ApiError> {
        self.http.get(&format!("/api/downloads/{download_id}")).await
    }

    /// Cancels a pending or running download and removes its record.
    pub async fn cancel(&self, download_id: DbId) -> Result<Message, ApiError> {
        self.http.delete(&format!("/api/downloads/{download_id}")).await
    }

    pub async fn downloaded_videos(&self) -> Result<Vec<VideoRecord>, ApiError> {
        self.http.get("/api/downloads/videos/all").await
    }
}
