//! The fixed flow graph: node/edge definitions and the `flow.json` loader.
//!
//! The graph is owned by the project, not by the annotation system: nodes
//! are never created or deleted here, only looked up so annotations can be
//! attached to existing identifiers.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the graph definition inside a project directory.
pub const GRAPH_FILE: &str = "flow.json";

/// A unit of work in the construction-process graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    /// Unique identifier (e.g., "N-01"), referenced by every annotation
    pub id: String,

    /// Node title
    pub label: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Category key (e.g., "contract", "inspection", "junction")
    #[serde(default)]
    pub category: String,

    /// Optional responsible role from the graph definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl FlowNode {
    /// Junction nodes only route edges visually; they are excluded from
    /// annotation listings, export, and alerting.
    pub fn is_junction(&self) -> bool {
        self.category == "junction"
    }
}

/// A directed edge between two flow nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
}

/// The complete graph definition loaded from `flow.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowGraph {
    /// Free-form metadata carried through from the graph author
    #[serde(default)]
    pub meta: serde_json::Value,

    pub nodes: Vec<FlowNode>,

    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Load the graph definition for a project directory.
    pub fn load(project_path: &Path) -> Result<Self> {
        let path = project_path.join(GRAPH_FILE);
        let raw = std::fs::read_to_string(&path)
            .map_err(|_| Error::GraphNotFound(path.display().to_string()))?;
        let graph: FlowGraph = serde_json::from_str(&raw)
            .map_err(|e| Error::Other(format!("Could not parse {}: {}", path.display(), e)))?;
        Ok(graph)
    }

    /// All annotatable nodes, in graph order (junctions excluded).
    pub fn task_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter().filter(|n| !n.is_junction())
    }

    /// Look up a node by id.
    pub fn find(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by id, or fail with `NodeNotFound`.
    pub fn require(&self, id: &str) -> Result<&FlowNode> {
        self.find(id).ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }
}
