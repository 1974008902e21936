//! Flowmark - annotation tracking for construction-process flow graphs.
//!
//! This library provides the core functionality for the `fm` CLI tool:
//! per-node annotations (status, assignees, due date, memo) over a fixed
//! flow graph, spreadsheet round-tripping, and due-date alerting.

pub mod action_log;
pub mod alerts;
pub mod cli;
pub mod commands;
pub mod excel;
pub mod models;
pub mod overlay;
pub mod state;
pub mod storage;

/// Test utilities shared by the unit tests in this crate.
#[cfg(test)]
pub(crate) mod test_utils {
    use crate::models::graph::FlowGraph;
    use crate::state::AnnotationState;
    use crate::storage::MemStore;

    /// A small flow graph with three task nodes and one junction.
    pub fn sample_graph() -> FlowGraph {
        let json = r#"{
            "meta": {"name": "sample"},
            "nodes": [
                {"id": "N-01", "label": "Grid application", "category": "legal"},
                {"id": "N-02", "label": "Panel procurement", "category": "procurement"},
                {"id": "J-01", "label": "", "category": "junction"},
                {"id": "N-03", "label": "Final inspection", "category": "inspection"}
            ],
            "edges": [
                {"source": "N-01", "target": "J-01"},
                {"source": "N-02", "target": "J-01"},
                {"source": "J-01", "target": "N-03"}
            ]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    /// An annotation state backed by an in-memory store.
    pub fn mem_state() -> AnnotationState {
        AnnotationState::load(Box::new(MemStore::new()))
    }
}

/// Library-level error type for Flowmark operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Import-side failures: unreadable byte stream or no header row.
    /// The in-memory state is guaranteed untouched when this is returned.
    #[error("Import failed: {0}")]
    Format(String),

    #[error("No flow graph found: expected {0}")]
    GraphNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Flowmark operations.
pub type Result<T> = std::result::Result<T, Error>;
