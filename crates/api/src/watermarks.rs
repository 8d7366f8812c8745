//! Watermark burning and preview rendering for downloaded videos.

use vidflow_core::DbId;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{
    VideoRecord, WatermarkApplyRequest, WatermarkApplyResponse, WatermarkConfig,
    WatermarkPreviewRequest, WatermarkPreviewResponse,
};

#[derive(Debug, Clone, Copy)]
pub struct WatermarksApi<'a> {
    http: &'a HttpClient,
}

impl<'a> WatermarksApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Videos eligible for watermarking (downloaded, file on disk).
    pub async fn videos(&self) -> Result<Vec<VideoRecord>, ApiError> {
        self.http.get("/api/watermarks/videos").await
    }

    pub async fn apply(
        &self,
        video_id: DbId,
        config: WatermarkConfig,
    ) -> Result<WatermarkApplyResponse, ApiError> {
        let body = WatermarkApplyRequest { video_id, config };
        self.http.post("/api/watermarks/apply", &body).await
    }

    /// Renders a single watermarked frame at `timestamp` (e.g. "00:00:01").
    pub async fn preview(
        &self,
        video_id: DbId,
        config: WatermarkConfig,
        timestamp: impl Into<String>,
    ) -> Result<WatermarkPreviewResponse, ApiError> {
        let body = WatermarkPreviewRequest {
            video_id,
            config,
            timestamp: timestamp.into(),
        };
        self.http.post("/api/watermarks/preview", &body).await
    }
}
