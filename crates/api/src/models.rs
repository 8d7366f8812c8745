//! Wire types for the backend REST API.
//!
//! Field names and optionality mirror the backend's response schemas; the
//! backend emits naive timestamps (no offset), so datetime fields are
//! [`NaiveDateTime`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use vidflow_core::graph::GraphDocument;
use vidflow_core::types::{DownloadStatus, Platform};
use vidflow_core::DbId;

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

// ---- videos ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: DbId,
    pub title: String,
    pub url: String,
    pub platform: Platform,
    pub thumbnail_url: Option<String>,
    pub duration: Option<i64>,
    pub views: Option<String>,
    pub upload_date: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    #[serde(default)]
    pub has_subtitles: bool,
    #[serde(default)]
    pub watermark_removed: bool,
    pub created_at: NaiveDateTime,
}

/// Metadata probe for a single video URL, before anything is downloaded.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<i64>,
    pub views: Option<String>,
    pub upload_date: Option<String>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    pub channel_id: Option<String>,
    pub channel_url: Option<String>,
}

// ---- downloads ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub remove_watermark: bool,
    pub download_subtitles: bool,
    pub subtitle_language: String,
    pub quality: String,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            remove_watermark: true,
            download_subtitles: false,
            subtitle_language: "en".to_string(),
            quality: "best".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub options: DownloadOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRecord {
    pub id: DbId,
    pub url: String,
    pub status: DownloadStatus,
    pub progress: f64,
    pub error_message: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub video: Option<VideoRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDownloadRequest {
    pub video_urls: Vec<String>,
    pub options: DownloadOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDownloadResponse {
    pub total: usize,
    pub started: usize,
    pub download_ids: Vec<DbId>,
}

// ---- channels ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: DbId,
    pub name: String,
    pub url: String,
    pub platform: Platform,
    pub channel_id: Option<String>,
    pub avatar_url: Option<String>,
    pub subscribers: Option<String>,
    pub description: Option<String>,
    pub last_sync: Option<NaiveDateTime>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelScanResult {
    pub channel: ChannelRecord,
    pub videos: Vec<VideoRecord>,
    pub total_videos: usize,
}

/// Row of `GET /api/channels/` (a hand-built shape, not `ChannelRecord`;
/// timestamps arrive as ISO strings and may be absent).
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelOverview {
    pub id: DbId,
    pub name: String,
    pub url: String,
    pub platform: Platform,
    pub avatar_url: Option<String>,
    pub subscribers: Option<String>,
    pub video_count: i64,
    pub last_sync: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<ChannelOverview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelProfile {
    pub id: DbId,
    pub name: String,
    pub url: String,
    pub platform: Platform,
    pub avatar_url: Option<String>,
    pub subscribers: Option<String>,
    pub description: Option<String>,
    pub last_sync: Option<String>,
    pub created_at: Option<String>,
}

/// Video row inside a channel detail, carrying per-stage status fields the
/// plain video schema does not have.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelVideo {
    pub id: DbId,
    pub title: String,
    pub url: String,
    pub platform: Platform,
    pub thumbnail_url: Option<String>,
    pub duration: Option<i64>,
    pub views: Option<String>,
    pub upload_date: Option<String>,
    pub download_status: String,
    pub processing_status: String,
    #[serde(default)]
    pub upload_platforms: serde_json::Value,
    pub file_path: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelDetail {
    pub channel: ChannelProfile,
    pub videos: Vec<ChannelVideo>,
    pub total_videos: usize,
}

// ---- accounts ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: DbId,
    pub platform: Platform,
    pub username: String,
    pub profile_url: Option<String>,
    pub avatar_url: Option<String>,
    pub subscribers: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub last_sync: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountCreate {
    pub platform: Platform,
    pub username: String,
    pub profile_url: Option<String>,
    pub credentials: Option<std::collections::HashMap<String, String>>,
}

// ---- auth ----

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeUrl {
    pub auth_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OAuthCallback {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthResult {
    pub message: String,
    pub account: AccountRecord,
}

// ---- workflows ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub workflow_data: GraphDocument,
    pub is_active: bool,
    pub schedule: Option<String>,
    /// Concurrency stamp, bumped by the backend on every successful save.
    pub revision: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowCreate {
    pub name: String,
    pub description: Option<String>,
    pub workflow_data: GraphDocument,
    pub is_active: bool,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_data: Option<GraphDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteExecutionResult {
    pub message: String,
    #[serde(default)]
    pub deleted_files: Vec<String>,
}

// ---- dashboard ----

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    pub total_downloads: i64,
    pub storage_used_gb: f64,
    pub storage_total_gb: f64,
    pub active_tasks: i64,
    pub total_videos: i64,
    pub total_channels: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityItem {
    pub id: DbId,
    pub title: String,
    pub platform: String,
    pub status: String,
    pub time: String,
    pub size: String,
    pub progress: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelActivity {
    pub id: DbId,
    pub name: String,
    pub platform: String,
    pub total_videos: i64,
    pub downloaded_videos: i64,
    pub last_sync: Option<String>,
}

// ---- storage ----

#[derive(Debug, Clone, Deserialize)]
pub struct StorageStats {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub usage_percentage: f64,
    pub videos_count: i64,
    pub subtitles_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupReport {
    pub message: String,
    pub deleted_files: i64,
    pub freed_space_mb: f64,
}

// ---- watermarks ----

#[derive(Debug, Clone, Serialize)]
pub struct WatermarkConfig {
    pub text: String,
    pub position: String,
    pub font_size: u32,
    pub color: String,
    pub opacity: f64,
    pub enable_box: bool,
    pub box_color: String,
    pub box_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_y: Option<i32>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: "bottom-right".to_string(),
            font_size: 24,
            color: "white".to_string(),
            opacity: 0.8,
            enable_box: true,
            box_color: "black".to_string(),
            box_opacity: 0.5,
            custom_x: None,
            custom_y: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WatermarkApplyRequest {
    pub video_id: DbId,
    pub config: WatermarkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatermarkApplyResponse {
    pub success: bool,
    pub output_path: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatermarkPreviewRequest {
    pub video_id: DbId,
    pub config: WatermarkConfig,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatermarkPreviewResponse {
    pub success: bool,
    pub preview_url: Option<String>,
    pub error_message: Option<String>,
}

fn default_true() -> bool {
    true
}
