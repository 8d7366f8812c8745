//! Identifiers and wire-level enums shared with the VidFlow backend.
//!
//! All enums serialize to the snake_case/lowercase strings the backend
//! emits. [`WorkflowStatus`] additionally accepts the upper-case forms
//! that terminal stream events carry (`"COMPLETED"`, `"FAILED"`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Database row identifier used by the backend for every entity.
pub type DbId = i64;

/// Video platforms the backend can download from and upload to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Douyin,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Douyin => "douyin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single-video download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

/// Lifecycle of a workflow execution.
///
/// Snapshots carry the lowercase form; the `workflow_completed` /
/// `workflow_failed` stream events repeat the status in upper case, so
/// both spellings deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[serde(alias = "RUNNING")]
    Running,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "FAILED")]
    Failed,
    #[serde(alias = "PAUSED")]
    Paused,
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

impl WorkflowStatus {
    /// Whether the execution can no longer change state on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Running => "running",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Paused => "paused",
            WorkflowStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-video status within an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// One pipeline step tracked per video within an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Download,
    Translate,
    Burn,
    Upload,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Download => "download",
            Stage::Translate => "translate",
            Stage::Burn => "burn",
            Stage::Upload => "upload",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage progress as reported by `video_stage_update` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
}

/// Kind of a workflow graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Scan,
    Download,
    Burn,
    Upload,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Scan => "scan",
            NodeKind::Download => "download",
            NodeKind::Burn => "burn",
            NodeKind::Upload => "upload",
        }
    }

    /// Default editor label for a freshly placed node of this kind.
    pub fn default_label(&self) -> &'static str {
        match self {
            NodeKind::Scan => "Scan Channel",
            NodeKind::Download => "Download Video",
            NodeKind::Burn => "Burn Subtitles",
            NodeKind::Upload => "Upload Video",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_status_accepts_both_cases() {
        let lower: WorkflowStatus = serde_json::from_str("\"completed\"").unwrap();
        let upper: WorkflowStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(lower, WorkflowStatus::Completed);
        assert_eq!(upper, WorkflowStatus::Completed);
    }

    #[test]
    fn workflow_status_serializes_lowercase() {
        let s = serde_json::to_string(&WorkflowStatus::Running).unwrap();
        assert_eq!(s, "\"running\"");
    }

    #[test]
    fn terminal_statuses() {
        assert!(WorkflowStatus::Completed.is_terminal());
        assert!(WorkflowStatus::Failed.is_terminal());
        assert!(WorkflowStatus::Cancelled.is_terminal());
        assert!(!WorkflowStatus::Running.is_terminal());
        assert!(!WorkflowStatus::Paused.is_terminal());
    }

    #[test]
    fn stage_round_trips() {
        let s: Stage = serde_json::from_str("\"burn\"").unwrap();
        assert_eq!(s, Stage::Burn);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"burn\"");
    }

    #[test]
    fn node_kind_uses_wire_names() {
        assert_eq!(serde_json::to_string(&NodeKind::Scan).unwrap(), "\"scan\"");
        let k: NodeKind = serde_json::from_str("\"upload\"").unwrap();
        assert_eq!(k, NodeKind::Upload);
    }
}
