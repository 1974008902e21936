//! Due-date alert derivation.
//!
//! A pure pass over the merged node + annotation view: every non-junction
//! node with a present due date and a non-terminal status is classified as
//! overdue, due-soon, or neither, against an injected reference date.
//! Alerts carry no identity and no acknowledgment state; they are
//! recomputed from scratch each time and can only be dismissed by changing
//! the status or the due date. A due-date string that fails to parse as
//! `YYYY-MM-DD` produces no alert.

use crate::models::graph::FlowGraph;
use crate::state::AnnotationState;
use chrono::NaiveDate;

/// Inclusive day window for the due-soon classification.
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

/// Alert classification with its day-granularity payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Due date strictly before the reference date; `days_late` is the
    /// magnitude of the delay.
    Overdue { days_late: i64 },
    /// Due within the window; `days_left` is 0 for "due today".
    DueSoon { days_left: i64 },
}

/// One derived alert for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub node_id: String,
    pub title: String,
    pub kind: AlertKind,
}

impl Alert {
    /// Short classification label for machine consumers.
    pub fn label(&self) -> &'static str {
        match self.kind {
            AlertKind::Overdue { .. } => "overdue",
            AlertKind::DueSoon { .. } => "due_soon",
        }
    }

    /// Human-readable message for the notification tray.
    pub fn message(&self) -> String {
        match self.kind {
            AlertKind::Overdue { days_late: 1 } => "1 day overdue".to_string(),
            AlertKind::Overdue { days_late } => format!("{} days overdue", days_late),
            AlertKind::DueSoon { days_left: 0 } => "due today".to_string(),
            AlertKind::DueSoon { days_left: 1 } => "due in 1 day".to_string(),
            AlertKind::DueSoon { days_left } => format!("due in {} days", days_left),
        }
    }
}

/// Parse a stored due-date string. Fails open: anything that is not a
/// valid `YYYY-MM-DD` date is `None`.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Derive the full alert list: overdue first, then due-soon, both groups
/// preserving graph node order.
pub fn derive_alerts(graph: &FlowGraph, state: &AnnotationState, today: NaiveDate) -> Vec<Alert> {
    let mut overdue = Vec::new();
    let mut due_soon = Vec::new();

    for node in graph.task_nodes() {
        if state.status_of(&node.id).is_terminal() {
            continue;
        }
        let Some(due) = parse_due_date(state.due_date_of(&node.id)) else {
            continue;
        };

        let diff_days = (due - today).num_days();
        let kind = if diff_days < 0 {
            AlertKind::Overdue {
                days_late: -diff_days,
            }
        } else if diff_days <= DUE_SOON_WINDOW_DAYS {
            AlertKind::DueSoon {
                days_left: diff_days,
            }
        } else {
            continue;
        };

        let alert = Alert {
            node_id: node.id.clone(),
            title: node.label.clone(),
            kind,
        };
        match kind {
            AlertKind::Overdue { .. } => overdue.push(alert),
            AlertKind::DueSoon { .. } => due_soon.push(alert),
        }
    }

    overdue.extend(due_soon);
    overdue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeStatus;
    use crate::test_utils::{mem_state, sample_graph};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_no_due_date_never_alerts() {
        let graph = sample_graph();
        let mut state = mem_state();
        state.set_status("N-01", NodeStatus::InProgress);
        assert!(derive_alerts(&graph, &state, date("2026-01-01")).is_empty());
    }

    #[test]
    fn test_overdue_boundary() {
        let graph = sample_graph();
        let today = date("2026-06-10");

        // Yesterday: overdue with delay 1.
        let mut state = mem_state();
        state.set_due_date("N-01", "2026-06-09");
        let alerts = derive_alerts(&graph, &state, today);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Overdue { days_late: 1 });
        assert_eq!(alerts[0].message(), "1 day overdue");

        // Today: due-soon with 0 days left.
        state.set_due_date("N-01", "2026-06-10");
        let alerts = derive_alerts(&graph, &state, today);
        assert_eq!(alerts[0].kind, AlertKind::DueSoon { days_left: 0 });
        assert_eq!(alerts[0].message(), "due today");

        // Today + 3: still due-soon.
        state.set_due_date("N-01", "2026-06-13");
        let alerts = derive_alerts(&graph, &state, today);
        assert_eq!(alerts[0].kind, AlertKind::DueSoon { days_left: 3 });

        // Today + 4: no alert.
        state.set_due_date("N-01", "2026-06-14");
        assert!(derive_alerts(&graph, &state, today).is_empty());
    }

    #[test]
    fn test_terminal_status_suppresses_alerts() {
        let graph = sample_graph();
        let today = date("2026-06-10");

        let mut state = mem_state();
        state.set_due_date("N-01", "2026-06-09");
        state.set_status("N-01", NodeStatus::Completed);
        assert!(derive_alerts(&graph, &state, today).is_empty());

        state.set_status("N-01", NodeStatus::NotApplicable);
        assert!(derive_alerts(&graph, &state, today).is_empty());

        // Non-terminal statuses still alert.
        state.set_status("N-01", NodeStatus::InProgress);
        assert_eq!(derive_alerts(&graph, &state, today).len(), 1);
    }

    #[test]
    fn test_malformed_due_date_fails_open() {
        let graph = sample_graph();
        let mut state = mem_state();
        state.set_due_date("N-01", "next tuesday");
        state.set_due_date("N-02", "2026/06/09");
        assert!(derive_alerts(&graph, &state, date("2026-06-10")).is_empty());
    }

    #[test]
    fn test_in_progress_overdue_scenario() {
        let graph = sample_graph();
        let mut state = mem_state();
        state.set_status("N-01", NodeStatus::InProgress);
        state.set_due_date("N-01", "2024-01-01");

        let alerts = derive_alerts(&graph, &state, date("2024-01-05"));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].node_id, "N-01");
        assert_eq!(alerts[0].kind, AlertKind::Overdue { days_late: 4 });
        assert_eq!(alerts[0].label(), "overdue");
    }

    #[test]
    fn test_ordering_overdue_first_then_graph_order() {
        let graph = sample_graph();
        let today = date("2026-06-10");
        let mut state = mem_state();
        // N-01 due-soon, N-02 overdue, N-03 overdue.
        state.set_due_date("N-01", "2026-06-11");
        state.set_due_date("N-02", "2026-06-01");
        state.set_due_date("N-03", "2026-06-05");

        let alerts = derive_alerts(&graph, &state, today);
        let ids: Vec<&str> = alerts.iter().map(|a| a.node_id.as_str()).collect();
        assert_eq!(ids, vec!["N-02", "N-03", "N-01"]);
    }

    #[test]
    fn test_junction_nodes_never_alert() {
        let graph = sample_graph();
        let mut state = mem_state();
        state.set_due_date("J-01", "2026-06-01");
        assert!(derive_alerts(&graph, &state, date("2026-06-10")).is_empty());
    }
}
