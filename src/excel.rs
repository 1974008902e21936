//! Spreadsheet codec: the only component that touches bytes.
//!
//! Export serializes the annotation state plus a snapshot of node
//! identity/title/category into a single-sheet workbook; import parses an
//! uploaded workbook back into the three spreadsheet-borne mappings plus
//! the project name. Columns are positional; the importer tolerates short
//! rows, extra trailing columns, blank optional cells, and a header row
//! that is not at its exported position.

use crate::models::graph::FlowGraph;
use crate::models::{category_label, NodeStatus};
use crate::state::AnnotationState;
use crate::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{DateTime, Local};
use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use std::io::Cursor;

/// Marker literal in row 0, column 0.
const MARKER_PROJECT: &str = "Project Name";
/// Marker literal in row 1, column 0.
const MARKER_UPDATED: &str = "Updated";
/// Header row literals, columns 0-5.
const HEADER: [&str; 6] = ["ID", "Title", "Category", "Status", "Assignee", "Due Date"];
/// The header row must appear within this many rows of the top.
const HEADER_SCAN_ROWS: usize = 10;
/// Sheet name for the exported workbook.
const SHEET_NAME: &str = "ステータス管理";

/// Cosmetic column width hints (ID, Title, Category, Status, Assignee,
/// Due Date).
const COLUMN_WIDTHS: [f64; 6] = [10.0, 30.0, 15.0, 12.0, 18.0, 12.0];

/// Mappings reconstructed from an imported workbook. The caller merges
/// them into the live state; the codec itself never mutates anything.
#[derive(Debug, Default)]
pub struct ImportedAnnotations {
    /// NodeId -> status key (only label-matched entries; sparse)
    pub status: HashMap<String, String>,
    /// NodeId -> assignee string (only non-empty cells)
    pub assignee: HashMap<String, String>,
    /// NodeId -> due-date string (only non-empty cells)
    pub due_date: HashMap<String, String>,
    /// Project name from row 0, empty when the marker was absent
    pub project_name: String,
}

/// Serialize the annotation state for every non-junction node into a
/// workbook, returning the raw `.xlsx` bytes.
pub fn build_workbook(graph: &FlowGraph, state: &AnnotationState) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    sheet.write_string(0, 0, MARKER_PROJECT)?;
    sheet.write_string(0, 1, state.project_name())?;
    sheet.write_string(1, 0, MARKER_UPDATED)?;
    sheet.write_string(1, 1, Local::now().format("%Y/%m/%d").to_string())?;
    // Row 2 stays empty.
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string(3, col as u16, *title)?;
    }

    let mut row: u32 = 4;
    for node in graph.task_nodes() {
        let category =
            category_label(&node.category).unwrap_or(node.category.as_str());
        // Export always writes a resolved status label; the default
        // resolves to pending's label. Import is deliberately sparser.
        let status_label = state.status_of(&node.id).label();

        sheet.write_string(row, 0, node.id.as_str())?;
        sheet.write_string(row, 1, node.label.as_str())?;
        sheet.write_string(row, 2, category)?;
        sheet.write_string(row, 3, status_label)?;
        sheet.write_string(row, 4, state.assignee_of(&node.id))?;
        sheet.write_string(row, 5, state.due_date_of(&node.id))?;
        row += 1;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Derive the export filename from the project name and a compact
/// date-time stamp. Filesystem-unsafe characters and whitespace become
/// underscores; an empty project name leaves the stamp alone.
pub fn export_filename(project_name: &str, now: DateTime<Local>) -> String {
    let stamp = now.format("%Y%m%d%H%M");
    let safe: String = project_name
        .chars()
        .map(|c| {
            if matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_whitespace()
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    if safe.is_empty() {
        format!("{}.xlsx", stamp)
    } else {
        format!("{}_{}.xlsx", safe, stamp)
    }
}

/// Parse an uploaded workbook (first sheet only) back into annotation
/// mappings.
///
/// Fails with `Error::Format` when the byte stream is unreadable or no
/// header row (column 0 equal to "ID") is found within the scan window.
/// Rows with a populated ID but blank optional cells leave those specific
/// mappings unset for that id; unknown status labels are dropped per-cell.
pub fn import_workbook(bytes: &[u8]) -> Result<ImportedAnnotations> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| Error::Format(format!("unreadable spreadsheet: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Format("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::Format(format!("unreadable sheet: {}", e)))?;

    let rows: Vec<&[Data]> = range.rows().collect();

    let mut imported = ImportedAnnotations::default();

    if let Some(first) = rows.first() {
        if cell_text(first, 0) == MARKER_PROJECT {
            imported.project_name = cell_text(first, 1);
        }
    }

    let header_idx = (1..rows.len().min(HEADER_SCAN_ROWS))
        .find(|&i| cell_text(rows[i], 0) == "ID")
        .ok_or_else(|| {
            Error::Format(format!(
                "no header row (column 0 = \"ID\") within the first {} rows",
                HEADER_SCAN_ROWS
            ))
        })?;

    for row in &rows[header_idx + 1..] {
        let node_id = cell_text(row, 0);
        if node_id.is_empty() {
            continue;
        }

        let status_label = cell_text(row, 3);
        if let Some(status) = NodeStatus::from_label(&status_label) {
            imported
                .status
                .insert(node_id.clone(), status.as_str().to_string());
        }

        let assignee = cell_text(row, 4);
        if !assignee.is_empty() {
            imported.assignee.insert(node_id.clone(), assignee);
        }

        let due_date = cell_text(row, 5);
        if !due_date.is_empty() {
            imported.due_date.insert(node_id.clone(), due_date);
        }
    }

    Ok(imported)
}

/// Render one cell as trimmed text. Absent and empty cells are the empty
/// string; numeric ids lose a spurious `.0`; real date cells come back as
/// `YYYY-MM-DD` so hand-edited files survive Excel's date coercion.
fn cell_text(row: &[Data], idx: usize) -> String {
    match row.get(idx) {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::DateTime(dt)) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Some(Data::DateTimeIso(s)) => s.chars().take(10).collect(),
        Some(other) => other.to_string().trim().to_string(),
    }
}
