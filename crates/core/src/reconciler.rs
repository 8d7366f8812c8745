//! Snapshot-plus-stream reconciliation for a single execution.
//!
//! A REST snapshot is durable but stale the moment it arrives; the
//! event stream is live but lossy across reconnects. [`ExecutionReconciler`]
//! merges the two: it initializes from a snapshot, then applies stream
//! events in arrival order. Terminal events return
//! [`Outcome::RefetchNeeded`] so the owner re-reads the snapshot and
//! repairs any gap from a dropped connection -- the accumulated local
//! state alone is never trusted at the end of an execution.
//!
//! Events are correlated to videos by positional index (the wire has no
//! stable per-video id). Out-of-range indices and events for other
//! executions are absorbed as no-ops.

use crate::execution::{ExecutionSnapshot, StreamEvent, VideoProgress};
use crate::types::{DbId, StageStatus, VideoStatus, WorkflowStatus};

/// Result of applying one stream event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event mutated the reconciled view.
    Applied,
    /// The event did not apply here (other execution, unknown index,
    /// or a frame this view does not track). Expected, not an error.
    Ignored,
    /// A terminal event arrived; the owner should re-fetch the REST
    /// snapshot and call [`ExecutionReconciler::reset`].
    RefetchNeeded,
}

/// Reconciled live view of one workflow execution.
#[derive(Debug, Clone)]
pub struct ExecutionReconciler {
    execution_id: DbId,
    workflow_id: DbId,
    status: WorkflowStatus,
    error_message: Option<String>,
    log: Vec<String>,
    videos: Vec<VideoProgress>,
}

impl ExecutionReconciler {
    /// Initialize from a REST snapshot.
    pub fn from_snapshot(snapshot: &ExecutionSnapshot) -> Self {
        let videos = snapshot
            .execution_results
            .as_ref()
            .map(|r| r.scanned_videos.clone())
            .unwrap_or_default();
        Self {
            execution_id: snapshot.id,
            workflow_id: snapshot.workflow_id,
            status: snapshot.status,
            error_message: snapshot.error_message.clone(),
            log: snapshot.execution_log.clone(),
            videos,
        }
    }

    /// Replace all accumulated state with a fresh snapshot.
    ///
    /// Used after a terminal event (or reconnect) to reconcile anything
    /// missed while disconnected. The snapshot must describe the same
    /// execution.
    pub fn reset(&mut self, snapshot: &ExecutionSnapshot) {
        debug_assert_eq!(snapshot.id, self.execution_id);
        *self = Self::from_snapshot(snapshot);
    }

    pub fn execution_id(&self) -> DbId {
        self.execution_id
    }

    pub fn workflow_id(&self) -> DbId {
        self.workflow_id
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn videos(&self) -> &[VideoProgress] {
        &self.videos
    }

    /// How many videos have reached a terminal per-video status.
    pub fn finished_count(&self) -> usize {
        self.videos
            .iter()
            .filter(|v| matches!(v.status, VideoStatus::Completed | VideoStatus::Failed))
            .count()
    }

    /// Apply one stream event in arrival order.
    pub fn apply(&mut self, event: &StreamEvent) -> Outcome {
        // The stream is shared across all executions; filtering is
        // mandatory. Frames without an execution id (log, node
        // lifecycle) are scoped by the caller's subscription instead.
        if let Some(id) = event.execution_id() {
            if id != self.execution_id {
                return Outcome::Ignored;
            }
        }

        match event {
            StreamEvent::Log(d) => {
                self.log.push(match &d.timestamp {
                    Some(ts) => format!("[{ts}] {}", d.message),
                    None => d.message.clone(),
                });
                Outcome::Applied
            }
            StreamEvent::VideosScanned(d) => {
                // Authoritative reset: a second emission replaces as well.
                self.videos = d.videos.clone();
                Outcome::Applied
            }
            StreamEvent::VideoStarted(d) => self.with_video(d.video_index, |video| {
                video.status = VideoStatus::Processing;
            }),
            StreamEvent::VideoStageUpdate(d) => self.with_video(d.video_index, |video| {
                video.stages.insert(d.stage, d.status);
                if d.status == StageStatus::Running {
                    video.current_stage = Some(d.stage);
                }
            }),
            StreamEvent::VideoCompleted(d) => self.with_video(d.video_index, |video| {
                video.status = VideoStatus::Completed;
                video.current_stage = None;
            }),
            StreamEvent::VideoFailed(d) => {
                let error = d.error.clone();
                // The failing stage stays in `current_stage` so the view
                // can show where the pipeline stopped.
                self.with_video(d.video_index, move |video| {
                    video.status = VideoStatus::Failed;
                    video.error = Some(error);
                })
            }
            StreamEvent::WorkflowStarted(_) => {
                self.status = WorkflowStatus::Running;
                Outcome::Applied
            }
            StreamEvent::WorkflowCompleted(d) => {
                self.status = d.status.unwrap_or(WorkflowStatus::Completed);
                Outcome::RefetchNeeded
            }
            StreamEvent::WorkflowFailed(d) => {
                self.status = WorkflowStatus::Failed;
                if let Some(error) = &d.error {
                    self.error_message = Some(error.clone());
                }
                Outcome::RefetchNeeded
            }
            // Node lifecycle frames drive the graph overlay, not the
            // per-video view.
            StreamEvent::NodeStarted(_) | StreamEvent::NodeCompleted(_) => Outcome::Ignored,
        }
    }

    /// Upsert-style access by positional index; out-of-range is a
    /// benign out-of-order artifact, not an error.
    fn with_video(&mut self, index: usize, f: impl FnOnce(&mut VideoProgress)) -> Outcome {
        match self.videos.get_mut(index) {
            Some(video) => {
                f(video);
                Outcome::Applied
            }
            None => Outcome::Ignored,
        }
    }
}
