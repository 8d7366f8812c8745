//! Live view of one workflow execution.
//!
//! [`ExecutionMonitor`] seeds an [`ExecutionReconciler`] from a REST
//! snapshot, then folds bus events into it. Terminal events and lagged
//! receivers both trigger a snapshot re-fetch, so the view converges on
//! the backend's authoritative record.

use tokio::sync::broadcast;
use vidflow_api::{ApiError, VidFlowApi};
use vidflow_core::execution::VideoProgress;
use vidflow_core::reconciler::{ExecutionReconciler, Outcome};
use vidflow_core::types::WorkflowStatus;
use vidflow_core::{DbId, StreamEvent};

pub struct ExecutionMonitor {
    api: VidFlowApi,
    events: broadcast::Receiver<StreamEvent>,
    reconciler: ExecutionReconciler,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The event bus shut down before the execution reached a terminal
    /// status.
    #[error("event stream closed while execution {0} was still running")]
    StreamClosed(DbId),
}

impl ExecutionMonitor {
    /// Fetch the execution snapshot and start tracking it against the
    /// given event subscription.
    ///
    /// Subscribe *before* calling this so no event published during the
    /// fetch is missed; events for other executions are ignored by the
    /// reconciler.
    pub async fn start(
        api: VidFlowApi,
        events: broadcast::Receiver<StreamEvent>,
        execution_id: DbId,
    ) -> Result<Self, MonitorError> {
        let snapshot = api.workflows().execution(execution_id).await?;
        Ok(Self {
            api,
            events,
            reconciler: ExecutionReconciler::from_snapshot(&snapshot),
        })
    }

    pub fn execution_id(&self) -> DbId {
        self.reconciler.execution_id()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.reconciler.status()
    }

    pub fn log(&self) -> &[String] {
        self.reconciler.log()
    }

    pub fn videos(&self) -> &[VideoProgress] {
        self.reconciler.videos()
    }

    pub fn state(&self) -> &ExecutionReconciler {
        &self.reconciler
    }

    /// Wait for the next relevant event and fold it in.
    ///
    /// Returns `Ok(true)` while the execution is still live, `Ok(false)`
    /// once it has reached a terminal status and the final snapshot has
    /// been re-fetched.
    pub async fn step(&mut self) -> Result<bool, MonitorError> {
        if self.status().is_terminal() {
            return Ok(false);
        }

        loop {
            match self.events.recv().await {
                Ok(event) => match self.reconciler.apply(&event) {
                    Outcome::Applied => return Ok(true),
                    Outcome::Ignored => continue,
                    Outcome::RefetchNeeded => {
                        self.refetch().await?;
                        return Ok(!self.status().is_terminal());
                    }
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(
                        execution_id = self.execution_id(),
                        missed,
                        "Event subscription lagged, re-fetching snapshot",
                    );
                    self.refetch().await?;
                    return Ok(!self.status().is_terminal());
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(MonitorError::StreamClosed(self.execution_id()));
                }
            }
        }
    }

    /// Drive [`step`](Self::step) until the execution finishes.
    pub async fn run_to_completion(&mut self) -> Result<(), MonitorError> {
        while self.step().await? {}
        Ok(())
    }

    // ---- private helpers ----

    async fn refetch(&mut self) -> Result<(), MonitorError> {
        let snapshot = self.api.workflows().execution(self.execution_id()).await?;
        self.reconciler.reset(&snapshot);
        Ok(())
    }
}
