//! Action logging for Flowmark commands.
//!
//! Every command invocation is appended as one JSON line to a shared log
//! file. Logging never fails a command: any error along the way is
//! swallowed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// ISO 8601 timestamp when the action occurred
    pub timestamp: DateTime<Utc>,

    /// Project path the command ran against
    pub project_path: String,

    /// Command name (e.g., "status", "import")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Append an action to the log file. Never fails - errors are swallowed
/// so logging problems cannot break commands.
pub fn log_action(
    project_path: &Path,
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) {
    let Some(log_path) = get_log_path() else {
        return;
    };

    let entry = ActionLog {
        timestamp: Utc::now(),
        project_path: project_path.to_string_lossy().to_string(),
        command: command.to_string(),
        args,
        success,
        error,
        duration_ms,
        user: get_current_user(),
    };

    let _ = write_log_entry(&log_path, &entry);
}

/// Log file location: `$FM_DATA_DIR/action.log` when the override is set,
/// otherwise `<data dir>/flowmark/action.log`.
fn get_log_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("FM_DATA_DIR") {
        return Some(PathBuf::from(dir).join("action.log"));
    }
    dirs::data_dir().map(|d| d.join("flowmark").join("action.log"))
}

fn write_log_entry(path: &Path, entry: &ActionLog) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;
    Ok(())
}

fn get_current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
