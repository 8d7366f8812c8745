//! Editor session state around a [`PipelineGraph`].
//!
//! [`WorkflowEditor`] tracks the graph plus the things the canvas UI
//! needs that are not topology: the current selection, the workflow
//! identity the session is bound to (if any), and the revision stamp
//! used for optimistic concurrency on save. Two editors saving the same
//! workflow no longer silently overwrite each other -- a stale revision
//! is rejected by the backend as a conflict.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::graph::{GraphDocument, Node, PipelineGraph, Position};
use crate::node_config::NodeConfig;
use crate::types::{DbId, NodeKind};

/// Payload for creating or updating a workflow.
///
/// `workflow_data` is the runtime-stripped graph document; `revision`
/// echoes the stamp from the last load/save and is `None` only for a
/// first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub workflow_data: GraphDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

/// Authoring session for one workflow.
#[derive(Debug, Clone, Default)]
pub struct WorkflowEditor {
    graph: PipelineGraph,
    name: String,
    description: Option<String>,
    selected: Option<String>,
    workflow_id: Option<DbId>,
    revision: Option<i64>,
}

impl WorkflowEditor {
    /// Start an empty session (unsaved workflow).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Open a session on a workflow loaded from the backend.
    pub fn load(
        workflow_id: DbId,
        revision: Option<i64>,
        name: impl Into<String>,
        description: Option<String>,
        document: GraphDocument,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            graph: PipelineGraph::from_document(document)?,
            name: name.into(),
            description,
            selected: None,
            workflow_id: Some(workflow_id),
            revision,
        })
    }

    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut PipelineGraph {
        &mut self.graph
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Identity this session is bound to, once saved or loaded.
    pub fn workflow_id(&self) -> Option<DbId> {
        self.workflow_id
    }

    pub fn revision(&self) -> Option<i64> {
        self.revision
    }

    // -- graph operations, selection-aware ----------------------------------

    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> String {
        self.graph.add_node(kind, position)
    }

    pub fn connect(&mut self, source: &str, target: &str) -> Result<String, CoreError> {
        self.graph.connect(source, target)
    }

    /// Delete a node, clearing the selection if it pointed at it.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let removed = self.graph.delete_node(id);
        if removed && self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        removed
    }

    pub fn update_config(&mut self, id: &str, config: NodeConfig) -> Result<(), CoreError> {
        self.graph.update_config(id, config)
    }

    // -- selection ----------------------------------------------------------

    pub fn select(&mut self, id: &str) -> Result<(), CoreError> {
        if !self.graph.has_node(id) {
            return Err(CoreError::Validation(format!("Node {id} does not exist")));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected node, always read from the canonical graph so the
    /// configuration panel never sees a stale copy.
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_deref().and_then(|id| self.graph.node(id))
    }

    // -- persistence --------------------------------------------------------

    /// Build the save payload: runtime state stripped, revision echoed.
    ///
    /// Fails when any node config is too incomplete to execute.
    pub fn draft(&self) -> Result<WorkflowDraft, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Workflow name must not be empty".to_string(),
            ));
        }
        self.graph.validate()?;
        Ok(WorkflowDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            workflow_data: self.graph.to_document(),
            revision: self.revision,
        })
    }

    /// Bind the session to the identity/revision the backend returned.
    pub fn mark_saved(&mut self, workflow_id: DbId, revision: Option<i64>) {
        self.workflow_id = Some(workflow_id);
        self.revision = revision;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_config::{NodeConfig, ScanConfig, UploadConfig, VideoLimit};
    use crate::types::Platform;

    fn editor_with_scan() -> (WorkflowEditor, String) {
        let mut editor = WorkflowEditor::new("bulk import");
        let scan = editor.add_node(NodeKind::Scan, Position::default());
        editor
            .update_config(
                &scan,
                NodeConfig::Scan(ScanConfig {
                    url: "https://youtube.com/@demo".to_string(),
                    video_limit: VideoLimit::All,
                }),
            )
            .unwrap();
        (editor, scan)
    }

    #[test]
    fn deleting_selected_node_clears_selection() {
        let (mut editor, scan) = editor_with_scan();
        editor.select(&scan).unwrap();
        assert!(editor.selected_node().is_some());

        assert!(editor.delete_node(&scan));
        assert!(editor.selected_node().is_none());
    }

    #[test]
    fn deleting_other_node_keeps_selection() {
        let (mut editor, scan) = editor_with_scan();
        let dl = editor.add_node(NodeKind::Download, Position::default());
        editor.select(&scan).unwrap();

        assert!(editor.delete_node(&dl));
        assert_eq!(editor.selected_node().map(|n| n.id.clone()), Some(scan));
    }

    #[test]
    fn selected_node_reflects_latest_config() {
        let (mut editor, scan) = editor_with_scan();
        editor.select(&scan).unwrap();
        editor
            .update_config(
                &scan,
                NodeConfig::Scan(ScanConfig {
                    url: "https://youtube.com/@other".to_string(),
                    video_limit: VideoLimit::Max(5),
                }),
            )
            .unwrap();

        match &editor.selected_node().unwrap().config {
            NodeConfig::Scan(c) => assert_eq!(c.url, "https://youtube.com/@other"),
            other => panic!("expected scan config, got {other:?}"),
        }
    }

    #[test]
    fn draft_requires_complete_configs() {
        let mut editor = WorkflowEditor::new("half done");
        editor.add_node(NodeKind::Upload, Position::default());
        assert!(editor.draft().is_err());

        let up = editor.graph().nodes()[0].id.clone();
        editor
            .update_config(
                &up,
                NodeConfig::Upload(UploadConfig {
                    platform: Some(Platform::Youtube),
                    account: Some(1),
                }),
            )
            .unwrap();
        assert!(editor.draft().is_ok());
    }

    #[test]
    fn draft_carries_revision_and_strips_runtime_state() {
        let (mut editor, _) = editor_with_scan();
        editor.mark_saved(12, Some(3));

        let draft = editor.draft().unwrap();
        assert_eq!(draft.revision, Some(3));
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value["workflow_data"]["nodes"][0].get("is_active").is_none());
    }

    #[test]
    fn load_round_trip_binds_identity() {
        let (editor, scan) = editor_with_scan();
        let doc = editor.graph().to_document();

        let loaded =
            WorkflowEditor::load(9, Some(1), "bulk import", None, doc).unwrap();
        assert_eq!(loaded.workflow_id(), Some(9));
        assert_eq!(loaded.revision(), Some(1));
        assert!(loaded.graph().has_node(&scan));
    }
}
