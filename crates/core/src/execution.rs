//! Execution snapshots and the typed event-stream frames.
//!
//! The backend pushes JSON frames of the shape `{"type": "<kind>",
//! "data": {...}}` on a single shared WebSocket channel. This module
//! deserializes them into a strongly-typed [`StreamEvent`] enum, and
//! models the REST snapshot (`GET /api/workflows/execution/{id}`) the
//! reconciler initializes from.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Stage, StageStatus, VideoStatus, WorkflowStatus};

// ---------------------------------------------------------------------------
// Per-video progress
// ---------------------------------------------------------------------------

/// Progress of one scanned video through the pipeline stages.
///
/// The position of an entry in the `scanned_videos` array is its sole
/// correlation key: stream events reference videos by `video_index`,
/// not by a stable id, so the array must never be reordered except by
/// a wholesale `videos_scanned` replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoProgress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<DbId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub status: VideoStatus,
    #[serde(default)]
    pub current_stage: Option<Stage>,
    #[serde(default)]
    pub stages: BTreeMap<Stage, StageStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// REST snapshot
// ---------------------------------------------------------------------------

/// Persisted results attached to an execution snapshot.
///
/// Only the fields the client consumes are modelled; the rest of the
/// backend's result blob passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResults {
    #[serde(default)]
    pub videos_count: i64,
    #[serde(default)]
    pub scanned_videos_count: i64,
    #[serde(default)]
    pub scanned_videos: Vec<VideoProgress>,
    #[serde(default)]
    pub processed_count: i64,
    #[serde(default)]
    pub downloaded_files: serde_json::Value,
    #[serde(default)]
    pub subtitles: serde_json::Value,
}

/// Point-in-time state of a workflow execution, fetched over REST.
///
/// Timestamps are naive: the backend serializes local datetimes without
/// an offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    pub id: DbId,
    pub workflow_id: DbId,
    pub status: WorkflowStatus,
    #[serde(default)]
    pub execution_log: Vec<String>,
    #[serde(default)]
    pub execution_results: Option<ExecutionResults>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub started_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Stream events
// ---------------------------------------------------------------------------

/// All known event-stream frame types.
///
/// Deserialized via the internally-tagged `"type"` field with
/// associated `"data"` content. Unknown types fail to parse; callers
/// log and drop them without closing the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    WorkflowStarted(WorkflowStartedData),
    WorkflowCompleted(WorkflowCompletedData),
    WorkflowFailed(WorkflowFailedData),
    Log(LogData),
    NodeStarted(NodeLifecycleData),
    NodeCompleted(NodeLifecycleData),
    VideosScanned(VideosScannedData),
    VideoStarted(VideoStartedData),
    VideoStageUpdate(VideoStageUpdateData),
    VideoCompleted(VideoCompletedData),
    VideoFailed(VideoFailedData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStartedData {
    pub execution_id: DbId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<DbId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowCompletedData {
    pub execution_id: DbId,
    /// Repeated status, upper-case on the wire (`"COMPLETED"`).
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowFailedData {
    pub execution_id: DbId,
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload of `log` frames. Carries no execution id on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogData {
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub node_id: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Payload of `node_started` / `node_completed` frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLifecycleData {
    pub node_id: String,
    #[serde(default)]
    pub node_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideosScannedData {
    pub execution_id: DbId,
    pub videos: Vec<VideoProgress>,
    #[serde(default)]
    pub total: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStartedData {
    pub execution_id: DbId,
    pub video_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<DbId>,
    #[serde(default)]
    pub title: Option<String>,
    /// Human-readable position, e.g. `"2/10"`.
    #[serde(default)]
    pub progress: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStageUpdateData {
    pub execution_id: DbId,
    pub video_index: usize,
    pub stage: Stage,
    pub status: StageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCompletedData {
    pub execution_id: DbId,
    pub video_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<DbId>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFailedData {
    pub execution_id: DbId,
    pub video_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<DbId>,
    #[serde(default)]
    pub title: Option<String>,
    pub error: String,
}

impl StreamEvent {
    /// The execution this event belongs to, when the frame carries one.
    ///
    /// `log` and node lifecycle frames are broadcast without an
    /// execution id; consumers scope those by context instead.
    pub fn execution_id(&self) -> Option<DbId> {
        match self {
            StreamEvent::WorkflowStarted(d) => Some(d.execution_id),
            StreamEvent::WorkflowCompleted(d) => Some(d.execution_id),
            StreamEvent::WorkflowFailed(d) => Some(d.execution_id),
            StreamEvent::VideosScanned(d) => Some(d.execution_id),
            StreamEvent::VideoStarted(d) => Some(d.execution_id),
            StreamEvent::VideoStageUpdate(d) => Some(d.execution_id),
            StreamEvent::VideoCompleted(d) => Some(d.execution_id),
            StreamEvent::VideoFailed(d) => Some(d.execution_id),
            StreamEvent::Log(_) | StreamEvent::NodeStarted(_) | StreamEvent::NodeCompleted(_) => {
                None
            }
        }
    }

    /// Whether this frame ends the execution it references.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::WorkflowCompleted(_) | StreamEvent::WorkflowFailed(_)
        )
    }
}
