//! Presentation overlay for the rendering collaborator.
//!
//! Merges annotation state onto a per-node decoration object and attaches
//! the ordered alert descriptor list for the notification tray. The
//! rendering engine is a black box that consumes this as JSON; nothing
//! here feeds back into the state model.

use crate::alerts::{derive_alerts, Alert};
use crate::models::graph::FlowGraph;
use crate::state::AnnotationState;
use chrono::NaiveDate;
use serde::Serialize;

/// Per-node decoration supplied to the graph renderer.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDecoration {
    pub id: String,
    pub is_favorite: bool,
    /// Resolved status key (default "pending")
    pub status: String,
    /// Assignee string (default empty)
    pub assignee: String,
    /// Raw due-date string (default empty)
    pub due_date: String,
}

/// One entry for the fixed-position notification tray.
#[derive(Debug, Clone, Serialize)]
pub struct AlertDescriptor {
    pub node_id: String,
    pub label: String,
    pub message: String,
}

impl From<&Alert> for AlertDescriptor {
    fn from(alert: &Alert) -> Self {
        Self {
            node_id: alert.node_id.clone(),
            label: alert.label().to_string(),
            message: format!("{}: {}", alert.title, alert.message()),
        }
    }
}

/// The complete overlay payload.
#[derive(Debug, Serialize)]
pub struct Overlay {
    pub nodes: Vec<NodeDecoration>,
    pub alerts: Vec<AlertDescriptor>,
}

/// Build the overlay for every non-junction node, with alerts ordered
/// overdue-first then due-soon, both groups in graph node order.
pub fn build_overlay(graph: &FlowGraph, state: &AnnotationState, today: NaiveDate) -> Overlay {
    let nodes = graph
        .task_nodes()
        .map(|node| NodeDecoration {
            id: node.id.clone(),
            is_favorite: state.is_favorite(&node.id),
            status: state.status_of(&node.id).as_str().to_string(),
            assignee: state.assignee_of(&node.id).to_string(),
            due_date: state.due_date_of(&node.id).to_string(),
        })
        .collect();

    let alerts = derive_alerts(graph, state, today)
        .iter()
        .map(AlertDescriptor::from)
        .collect();

    Overlay { nodes, alerts }
}
