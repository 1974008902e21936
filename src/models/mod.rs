//! Data models for Flowmark entities.
//!
//! This module defines the core data structures:
//! - `NodeStatus` - Per-node progress status with display metadata
//! - `graph` - The fixed flow graph (nodes, edges, loader)
//! - Category display labels and the assignee suggestion list

pub mod graph;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress status attached to a flow node.
///
/// The serialized form is camelCase because that is the wire format of the
/// persisted mappings and the status keys exchanged through the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    NotApplicable,
}

impl NodeStatus {
    /// Display label shown in list views and written to the spreadsheet.
    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "未着手",
            NodeStatus::InProgress => "進行中",
            NodeStatus::Completed => "完了",
            NodeStatus::NotApplicable => "対象外",
        }
    }

    /// Foreground color for the rendering collaborator.
    pub fn color(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "#94a3b8",
            NodeStatus::InProgress => "#6366f1",
            NodeStatus::Completed => "#22c55e",
            NodeStatus::NotApplicable => "#64748b",
        }
    }

    /// Background color for the rendering collaborator.
    pub fn bg_color(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "rgba(148, 163, 184, 0.12)",
            NodeStatus::InProgress => "rgba(99, 102, 241, 0.12)",
            NodeStatus::Completed => "rgba(34, 197, 94, 0.12)",
            NodeStatus::NotApplicable => "rgba(100, 116, 139, 0.12)",
        }
    }

    /// Icon glyph for compact display.
    pub fn icon(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "○",
            NodeStatus::InProgress => "◐",
            NodeStatus::Completed => "●",
            NodeStatus::NotApplicable => "—",
        }
    }

    /// The status key as stored in the status mapping.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "pending",
            NodeStatus::InProgress => "inProgress",
            NodeStatus::Completed => "completed",
            NodeStatus::NotApplicable => "notApplicable",
        }
    }

    /// Reverse lookup from a display label. Exact match only; unknown
    /// labels yield `None` so hand-edited spreadsheet cells are dropped
    /// per-cell rather than rejected wholesale.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.label() == label)
    }

    /// True for statuses that suppress due-date alerting.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeStatus::Completed | NodeStatus::NotApplicable)
    }

    /// Get all statuses.
    pub fn all() -> &'static [NodeStatus] {
        &[
            NodeStatus::Pending,
            NodeStatus::InProgress,
            NodeStatus::Completed,
            NodeStatus::NotApplicable,
        ]
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NodeStatus {
    type Err = String;

    /// Parse a status key, tolerating `in-progress`/`in_progress` style
    /// aliases typed at the CLI.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(NodeStatus::Pending),
            "inprogress" => Ok(NodeStatus::InProgress),
            "completed" => Ok(NodeStatus::Completed),
            "notapplicable" => Ok(NodeStatus::NotApplicable),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Display label for a node category. `None` for categories outside the
/// known set; callers fall back to the raw category string.
pub fn category_label(category: &str) -> Option<&'static str> {
    let label = match category {
        "contract" => "契約",
        "legal" => "法令",
        "milestone" => "マイルストーン",
        "procurement" => "調達",
        "equipment" => "設備",
        "inspection" => "検査",
        "registration" => "登記",
        "handover" => "引渡",
        "power" => "受電・運開",
        "waste" => "廃棄物",
        "communication" => "通信・監視",
        "construction" => "工事",
        "junction" => "分岐点",
        "default" => "その他",
        _ => return None,
    };
    Some(label)
}

/// Closed suggestion list offered when assigning work. Names remain free
/// text; this list is advisory only.
pub const ASSIGNEES: &[&str] = &["宮崎", "若林", "猪又", "堀", "その他"];
