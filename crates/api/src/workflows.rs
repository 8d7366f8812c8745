//! Workflow CRUD, execution control, and execution history.

use vidflow_core::editor::WorkflowDraft;
use vidflow_core::execution::ExecutionSnapshot;
use vidflow_core::DbId;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{DeleteExecutionResult, Message, WorkflowCreate, WorkflowRecord, WorkflowUpdate};

#[derive(Debug, Clone, Copy)]
pub struct WorkflowsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> WorkflowsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<Vec<WorkflowRecord>, ApiError> {
        self.http.get("/api/workflows").await
    }

    pub async fn create(&self, draft: &WorkflowDraft) -> Result<WorkflowRecord, ApiError> {
        let body = WorkflowCreate {
            name: draft.name.clone(),
            description: draft.description.clone(),
            workflow_data: draft.workflow_data.clone(),
            is_active: true,
            schedule: None,
        };
        self.http.post("/api/workflows", &body).await
    }

    /// Updates a stored workflow. A stale `revision` in the body makes the
    /// backend answer 409, surfaced as [`ApiError::Conflict`].
    pub async fn update(
        &self,
        workflow_id: DbId,
        update: &WorkflowUpdate,
    ) -> Result<WorkflowRecord, ApiError> {
        self.http
            .put(&format!("/api/workflows/{workflow_id}"), update)
            .await
    }

    /// Create-or-update dispatch for an editor draft. `workflow_id` is `None`
    /// for a workflow that has never been saved.
    pub async fn save(
        &self,
        workflow_id: Option<DbId>,
        draft: &WorkflowDraft,
    ) -> Result<WorkflowRecord, ApiError> {
        match workflow_id {
            None => self.create(draft).await,
            Some(id) => {
                let update = WorkflowUpdate {
                    name: Some(draft.name.clone()),
                    description: draft.description.clone(),
                    workflow_data: Some(draft.workflow_data.clone()),
                    revision: draft.revision,
                    ..WorkflowUpdate::default()
                };
                self.update(id, &update).await
            }
        }
    }

    pub async fn delete(&self, workflow_id: DbId) -> Result<Message, ApiError> {
        self.http.delete(&format!("/api/workflows/{workflow_id}")).await
    }

    /// Kicks off a run and returns its initial snapshot.
    pub async fn execute(&self, workflow_id: DbId) -> Result<ExecutionSnapshot, ApiError> {
        self.http
            .post_empty(&format!("/api/workflows/{workflow_id}/execute"))
            .await
    }

    pub async fn executions(&self, workflow_id: DbId) -> Result<Vec<ExecutionSnapshot>, ApiError> {
        self.http
            .get(&format!("/api/workflows/{workflow_id}/executions"))
            .await
    }

    pub async fn history(&self, skip: u32, limit: u32) -> Result<Vec<ExecutionSnapshot>, ApiError> {
        self.http
            .get_query(
                "/api/workflows/history/all",
                &[("skip", skip.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    pub async fn execution(&self, execution_id: DbId) -> Result<ExecutionSnapshot, ApiError> {
        self.http
            .get(&format!("/api/workflows/execution/{execution_id}"))
            .await
    }

    pub async fn cancel_execution(&self, execution_id: DbId) -> Result<Message, ApiError> {
        self.http
            .post_empty(&format!("/api/workflows/execution/{execution_id}/cancel"))
            .await
    }

    /// Removes an execution record along with any files it produced.
    pub async fn delete_execution(
        &self,
        execution_id: DbId,
    ) -> Result<DeleteExecutionResult, ApiError> {
        self.http
            .delete(&format!("/api/workflows/execution/{execution_id}"))
            .await
    }
}
