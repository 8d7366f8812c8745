//! In-memory workflow graph: pipeline stages as nodes, ordering as edges.
//!
//! [`PipelineGraph`] is the authoring-time model behind the workflow
//! editor. It maintains two invariants across every mutation:
//!
//! * no edge ever dangles -- deleting a node cascades to the edges that
//!   reference it;
//! * `is_start` on each node equals "no edge targets this node", and is
//!   recomputed after every node/edge change.
//!
//! A graph serializes to/from [`GraphDocument`] -- the `{nodes, edges}`
//! JSON blob the backend stores and executes. Runtime display state
//! (`is_start`, `is_active`) is never part of the document.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::execution::StreamEvent;
use crate::node_config::NodeConfig;
use crate::types::NodeKind;

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One pipeline stage on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
    pub config: NodeConfig,
    /// Derived: no edge targets this node. Never serialized.
    pub is_start: bool,
    /// Runtime overlay driven by `node_started`/`node_completed` events.
    /// Never serialized.
    pub is_active: bool,
}

/// Wire form of a node inside the workflow document. The backend reads
/// `type`, `position`, `data.label`, and `data.config`.
#[derive(Serialize, Deserialize)]
struct NodeRepr {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    position: Position,
    data: NodeDataRepr,
}

#[derive(Serialize, Deserialize)]
struct NodeDataRepr {
    label: String,
    #[serde(default)]
    config: serde_json::Value,
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRepr {
            id: self.id.clone(),
            kind: self.kind,
            position: self.position,
            data: NodeDataRepr {
                label: self.label.clone(),
                config: self.config.to_value(),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = NodeRepr::deserialize(deserializer)?;
        let config = NodeConfig::from_value(repr.kind, repr.data.config)
            .map_err(|e| D::Error::custom(format!("node {}: {e}", repr.id)))?;
        Ok(Node {
            id: repr.id,
            kind: repr.kind,
            label: repr.data.label,
            position: repr.position,
            config,
            is_start: false,
            is_active: false,
        })
    }
}

/// Directed ordering between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// The persisted `{nodes, edges}` workflow document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Authoring-time graph with derived display state.
#[derive(Debug, Clone, Default)]
pub struct PipelineGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from a persisted document, validating edge
    /// endpoints and recomputing start flags.
    pub fn from_document(doc: GraphDocument) -> Result<Self, CoreError> {
        let mut graph = Self {
            nodes: doc.nodes,
            edges: doc.edges,
        };
        for edge in &graph.edges {
            if !graph.has_node(&edge.source) || !graph.has_node(&edge.target) {
                return Err(CoreError::Validation(format!(
                    "Edge {} references a missing node ({} -> {})",
                    edge.id, edge.source, edge.target
                )));
            }
        }
        graph.recompute_start_flags();
        Ok(graph)
    }

    /// Serializable form with all runtime state stripped.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Nodes with no incoming edge. Multiple disjoint starts are legal.
    pub fn start_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_start)
    }

    /// Insert a node of `kind` at `position` with its default label and
    /// config. Returns the new node's id.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.nodes.push(Node {
            id: id.clone(),
            kind,
            label: kind.default_label().to_string(),
            position,
            config: NodeConfig::default_for(kind),
            is_start: false,
            is_active: false,
        });
        self.recompute_start_flags();
        id
    }

    /// Add an ordering edge. Duplicate edges and cycles are accepted
    /// (the backend only ever walks forward from the scan node), but
    /// both endpoints must exist and self-loops are rejected.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<String, CoreError> {
        if !self.has_node(source) {
            return Err(CoreError::Validation(format!(
                "Edge source {source} does not exist"
            )));
        }
        if !self.has_node(target) {
            return Err(CoreError::Validation(format!(
                "Edge target {target} does not exist"
            )));
        }
        if source == target {
            return Err(CoreError::Validation(
                "A node cannot connect to itself".to_string(),
            ));
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.edges.push(Edge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        });
        self.recompute_start_flags();
        Ok(id)
    }

    /// Remove a node and every edge that references it.
    ///
    /// Returns `false` when the node was not present.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|e| e.source != id && e.target != id);
        self.recompute_start_flags();
        true
    }

    /// Remove a single edge by id.
    pub fn delete_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        let removed = self.edges.len() != before;
        if removed {
            self.recompute_start_flags();
        }
        removed
    }

    /// Replace a node's configuration. The config's kind must match the
    /// node's kind.
    pub fn update_config(&mut self, id: &str, config: NodeConfig) -> Result<(), CoreError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(CoreError::Validation(format!("Node {id} does not exist")))?;
        if config.kind() != node.kind {
            return Err(CoreError::Validation(format!(
                "Config kind {} does not match node kind {}",
                config.kind(),
                node.kind
            )));
        }
        node.config = config;
        Ok(())
    }

    /// Validate every node's config is complete enough to execute.
    pub fn validate(&self) -> Result<(), CoreError> {
        for node in &self.nodes {
            node.config
                .validate()
                .map_err(|e| CoreError::Validation(format!("{}: {e}", node.label)))?;
        }
        Ok(())
    }

    /// Apply a runtime stream event to the display overlay.
    ///
    /// `node_started`/`node_completed` toggle `is_active` by node id;
    /// terminal workflow events clear every active flag. Topology and
    /// config are never touched.
    pub fn apply_event(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::NodeStarted(d) => {
                if let Some(node) = self.node_mut(&d.node_id) {
                    node.is_active = true;
                }
            }
            StreamEvent::NodeCompleted(d) => {
                if let Some(node) = self.node_mut(&d.node_id) {
                    node.is_active = false;
                }
            }
            StreamEvent::WorkflowCompleted(_) | StreamEvent::WorkflowFailed(_) => {
                self.clear_activity();
            }
            _ => {}
        }
    }

    /// Clear every node's runtime-active flag.
    pub fn clear_activity(&mut self) {
        for node in &mut self.nodes {
            node.is_active = false;
        }
    }

    fn recompute_start_flags(&mut self) {
        for i in 0..self.nodes.len() {
            let id = self.nodes[i].id.clone();
            let has_incoming = self.edges.iter().any(|e| e.target == id);
            self.nodes[i].is_start = !has_incoming;
        }
    }
}
