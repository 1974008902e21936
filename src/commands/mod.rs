//! Command implementations for the Flowmark CLI.
//!
//! Each command loads the project's flow graph and/or annotation state,
//! performs one operation, and returns an `Output` that renders as JSON
//! (the default) or human-readable text.

use crate::alerts::{self, AlertKind};
use crate::excel;
use crate::models::graph::FlowGraph;
use crate::models::{category_label, NodeStatus, ASSIGNEES};
use crate::overlay::build_overlay;
use crate::state::AnnotationState;
use crate::storage::FileStore;
use crate::{Error, Result};
use chrono::Local;
use serde_json::{json, Value};
use std::path::Path;

/// A command result renderable as JSON or human text.
pub struct Output {
    json: Value,
    human: String,
}

impl Output {
    fn new(json: Value, human: impl Into<String>) -> Self {
        Self {
            json,
            human: human.into(),
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> String {
        self.json.to_string()
    }

    /// Format for human-readable output.
    pub fn to_human(&self) -> String {
        self.human.clone()
    }
}

/// Print an output in the selected format.
pub fn print(output: &Output, human: bool) {
    if human {
        println!("{}", output.to_human());
    } else {
        println!("{}", output.to_json());
    }
}

fn open_state(project_path: &Path) -> Result<AnnotationState> {
    let store = FileStore::open(project_path)?;
    Ok(AnnotationState::load(Box::new(store)))
}

/// Due date for read views: formatted when parseable, raw otherwise.
fn display_due(raw: &str) -> String {
    if raw.is_empty() {
        return "-".to_string();
    }
    match alerts::parse_due_date(raw) {
        Some(date) => date.format("%Y/%m/%d").to_string(),
        None => raw.to_string(),
    }
}

fn node_row(state: &AnnotationState, id: &str, label: &str, category: &str) -> Value {
    let status = state.status_of(id);
    json!({
        "id": id,
        "title": label,
        "category": category,
        "status": status.as_str(),
        "status_label": status.label(),
        "assignee": state.assignee_of(id),
        "due_date": state.due_date_of(id),
        "memo": state.memo_of(id),
        "favorite": state.is_favorite(id),
    })
}

/// `fm list` - every annotatable node with resolved annotations.
pub fn list(project_path: &Path) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let state = open_state(project_path)?;

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for node in graph.task_nodes() {
        rows.push(node_row(&state, &node.id, &node.label, &node.category));
        let status = state.status_of(&node.id);
        let fav = if state.is_favorite(&node.id) { "★" } else { " " };
        lines.push(format!(
            "{} {} {:8} {} [{}] {} {}",
            fav,
            status.icon(),
            node.id,
            node.label,
            status.label(),
            state.assignee_of(&node.id),
            display_due(state.due_date_of(&node.id)),
        ));
    }

    let json = json!({
        "project_name": state.project_name(),
        "last_updated": state.last_updated(),
        "nodes": rows,
    });
    Ok(Output::new(json, lines.join("\n")))
}

/// `fm show <id>` - one node's definition and annotations.
pub fn show(project_path: &Path, id: &str) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let state = open_state(project_path)?;
    let node = graph.require(id)?;

    let status = state.status_of(id);
    let category = category_label(&node.category).unwrap_or(&node.category);
    let json = json!({
        "node": node,
        "annotations": node_row(&state, &node.id, &node.label, &node.category),
    });
    let human = format!(
        "{}  {}\nCategory: {}\nStatus:   {} {} ({})\nAssignee: {}\nDue:      {}\nMemo:     {}\nFavorite: {}",
        node.id,
        node.label,
        category,
        status.icon(),
        status.label(),
        status.as_str(),
        state.assignee_of(id),
        display_due(state.due_date_of(id)),
        state.memo_of(id),
        if state.is_favorite(id) { "yes" } else { "no" },
    );
    Ok(Output::new(json, human))
}

/// `fm status <id> [value]` - get or set a node's status.
pub fn status(project_path: &Path, id: &str, value: Option<&str>) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;

    if let Some(raw) = value {
        let status: NodeStatus = raw.parse().map_err(Error::InvalidInput)?;
        state.set_status(id, status);
    }

    let status = state.status_of(id);
    let json = json!({"id": id, "status": status.as_str(), "label": status.label()});
    let human = format!("{} {} {} ({})", status.icon(), id, status.label(), status.as_str());
    Ok(Output::new(json, human))
}

fn assignee_output(state: &AnnotationState, id: &str) -> Output {
    let assignee = state.assignee_of(id);
    let json = json!({"id": id, "assignee": assignee});
    let human = if assignee.is_empty() {
        format!("{} (unassigned)", id)
    } else {
        format!("{} {}", id, assignee)
    };
    Output::new(json, human)
}

/// `fm assignee add <id> <name>` - append a name.
pub fn assignee_add(project_path: &Path, id: &str, name: &str) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;
    state.add_assignee(id, name);
    Ok(assignee_output(&state, id))
}

/// `fm assignee remove <id> <name>` - remove a name.
pub fn assignee_remove(project_path: &Path, id: &str, name: &str) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;
    state.remove_assignee(id, name);
    Ok(assignee_output(&state, id))
}

/// `fm assignee set <id> <names...>` - replace the assignee set.
pub fn assignee_set(project_path: &Path, id: &str, names: &[String]) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;
    state.set_assignee(id, &names.join(", "));
    Ok(assignee_output(&state, id))
}

/// `fm assignee clear <id>` - unassign.
pub fn assignee_clear(project_path: &Path, id: &str) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;
    state.set_assignee(id, "");
    Ok(assignee_output(&state, id))
}

/// `fm due <id> [date] [--clear]` - get, set, or clear a due date.
pub fn due(project_path: &Path, id: &str, date: Option<&str>, clear: bool) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;

    if clear {
        state.set_due_date(id, "");
    } else if let Some(raw) = date {
        if alerts::parse_due_date(raw).is_none() {
            return Err(Error::InvalidInput(format!(
                "due date must be YYYY-MM-DD, got: {}",
                raw
            )));
        }
        state.set_due_date(id, raw);
    }

    let raw = state.due_date_of(id);
    let json = json!({"id": id, "due_date": raw});
    Ok(Output::new(json, format!("{} {}", id, display_due(raw))))
}

/// `fm memo <id> [text] [--clear]` - get, set, or clear a memo.
pub fn memo(project_path: &Path, id: &str, text: Option<&str>, clear: bool) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;
    graph.require(id)?;

    if clear {
        state.set_memo(id, "");
    } else if let Some(text) = text {
        state.set_memo(id, text);
    }

    let memo = state.memo_of(id);
    let json = json!({"id": id, "memo": memo});
    Ok(Output::new(json, format!("{}: {}", id, memo)))
}

/// `fm project [name]` - get or set the project name.
pub fn project(project_path: &Path, name: Option<&str>) -> Result<Output> {
    let mut state = open_state(project_path)?;

    if let Some(name) = name {
        state.set_project_name(name);
    }

    let json = json!({
        "project_name": state.project_name(),
        "last_updated": state.last_updated(),
    });
    let human = if state.last_updated().is_empty() {
        format!("Project: {}", state.project_name())
    } else {
        format!(
            "Project: {} (updated {})",
            state.project_name(),
            state.last_updated()
        )
    };
    Ok(Output::new(json, human))
}

/// `fm fav [id]` - toggle a favorite, or list favorites.
pub fn fav(project_path: &Path, id: Option<&str>) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let mut state = open_state(project_path)?;

    match id {
        Some(id) => {
            graph.require(id)?;
            let now_favorite = state.toggle_favorite(id);
            let json = json!({"id": id, "favorite": now_favorite});
            let human = if now_favorite {
                format!("★ {}", id)
            } else {
                format!("☆ {} (removed)", id)
            };
            Ok(Output::new(json, human))
        }
        None => {
            let favorites: Vec<&str> = state.favorites().collect();
            let json = json!({"favorites": favorites});
            let human = if favorites.is_empty() {
                "No favorites".to_string()
            } else {
                favorites.join("\n")
            };
            Ok(Output::new(json, human))
        }
    }
}

/// `fm assignees` - the closed suggestion list.
pub fn assignees() -> Result<Output> {
    let json = json!({"assignees": ASSIGNEES});
    Ok(Output::new(json, ASSIGNEES.join("\n")))
}

/// `fm export [--output <path>]` - write the workbook.
pub fn export(project_path: &Path, output: Option<&Path>) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let state = open_state(project_path)?;

    let bytes = excel::build_workbook(&graph, &state)?;
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => excel::export_filename(state.project_name(), Local::now()).into(),
    };
    std::fs::write(&path, bytes)?;

    let node_count = graph.task_nodes().count();
    let json = json!({"file": path.display().to_string(), "nodes": node_count});
    let human = format!("Exported {} nodes to {}", node_count, path.display());
    Ok(Output::new(json, human))
}

/// `fm import <file>` - atomic replacement from a workbook.
pub fn import(project_path: &Path, file: &Path) -> Result<Output> {
    let mut state = open_state(project_path)?;

    let bytes = std::fs::read(file)
        .map_err(|e| Error::Format(format!("could not read {}: {}", file.display(), e)))?;
    // Parse completely before mutating anything: a bad file must leave
    // the state untouched.
    let imported = excel::import_workbook(&bytes)?;

    let counts = (
        imported.status.len(),
        imported.assignee.len(),
        imported.due_date.len(),
    );
    state.apply_import(
        imported.status,
        imported.assignee,
        imported.due_date,
        &imported.project_name,
    );

    let json = json!({
        "statuses": counts.0,
        "assignees": counts.1,
        "due_dates": counts.2,
        "project_name": state.project_name(),
    });
    let human = format!(
        "Imported {} statuses, {} assignees, {} due dates",
        counts.0, counts.1, counts.2
    );
    Ok(Output::new(json, human))
}

/// `fm alerts [--today <date>]` - overdue and due-soon nodes.
pub fn alerts_cmd(project_path: &Path, today: Option<&str>) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let state = open_state(project_path)?;

    let today = match today {
        Some(raw) => alerts::parse_due_date(raw).ok_or_else(|| {
            Error::InvalidInput(format!("--today must be YYYY-MM-DD, got: {}", raw))
        })?,
        None => Local::now().date_naive(),
    };

    let alerts = alerts::derive_alerts(&graph, &state, today);
    let items: Vec<Value> = alerts
        .iter()
        .map(|a| {
            let mut item = json!({
                "node_id": a.node_id,
                "title": a.title,
                "label": a.label(),
                "message": a.message(),
            });
            match a.kind {
                AlertKind::Overdue { days_late } => item["days_late"] = json!(days_late),
                AlertKind::DueSoon { days_left } => item["days_left"] = json!(days_left),
            }
            item
        })
        .collect();

    let human = if alerts.is_empty() {
        "No alerts".to_string()
    } else {
        alerts
            .iter()
            .map(|a| format!("⚠ {} {} — {}", a.node_id, a.title, a.message()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let json = json!({
        "today": today.format("%Y-%m-%d").to_string(),
        "count": alerts.len(),
        "alerts": items,
    });
    Ok(Output::new(json, human))
}

/// `fm overlay` - decoration contract for the graph renderer.
pub fn overlay_cmd(project_path: &Path) -> Result<Output> {
    let graph = FlowGraph::load(project_path)?;
    let state = open_state(project_path)?;

    let overlay = build_overlay(&graph, &state, Local::now().date_naive());
    let json = serde_json::to_value(&overlay)?;
    let human = format!(
        "{} nodes, {} alerts",
        overlay.nodes.len(),
        overlay.alerts.len()
    );
    Ok(Output::new(json, human))
}

/// `fm clear --force` - bulk reset of every annotation field.
pub fn clear(project_path: &Path, force: bool) -> Result<Output> {
    if !force {
        return Err(Error::InvalidInput(
            "this resets every annotation and cannot be undone; re-run with --force".to_string(),
        ));
    }

    let mut state = open_state(project_path)?;
    state.clear_all();

    Ok(Output::new(json!({"cleared": true}), "All annotations cleared"))
}
