//! CLI argument definitions for Flowmark.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flowmark - annotation tracking for construction-process flow graphs.
///
/// Annotates the nodes of a project's flow graph (status, assignees, due
/// dates, memos) and exchanges that state as an Excel workbook.
#[derive(Parser, Debug)]
#[command(name = "fm")]
#[command(author, version, about = "A CLI tool for annotating construction-process flow graphs", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Run against the project in <path> instead of the current directory.
    /// The directory must contain flow.json. Can also be set via the
    /// FM_PROJECT environment variable.
    #[arg(short = 'C', long = "project", global = true, env = "FM_PROJECT")]
    pub project_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every annotatable node with its resolved annotations
    List,

    /// Show one node's definition and annotations
    Show {
        /// Node ID (e.g., N-01)
        id: String,
    },

    /// Get or set a node's status
    Status {
        /// Node ID
        id: String,

        /// New status (pending, in-progress, completed, not-applicable);
        /// omit to print the current status
        value: Option<String>,
    },

    /// Assignee management commands
    Assignee {
        #[command(subcommand)]
        command: AssigneeCommands,
    },

    /// Get, set, or clear a node's due date (YYYY-MM-DD)
    Due {
        /// Node ID
        id: String,

        /// New due date; omit to print the current one
        date: Option<String>,

        /// Remove the due date
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },

    /// Get, set, or clear a node's memo
    Memo {
        /// Node ID
        id: String,

        /// New memo text; omit to print the current one
        text: Option<String>,

        /// Remove the memo
        #[arg(long, conflicts_with = "text")]
        clear: bool,
    },

    /// Get or set the project name
    Project {
        /// New project name; omit to print the current one
        name: Option<String>,
    },

    /// Toggle a node's favorite flag, or list favorites when no ID given
    Fav {
        /// Node ID to toggle
        id: Option<String>,
    },

    /// Print the assignee suggestion list
    Assignees,

    /// Export annotations as an Excel workbook
    Export {
        /// Output path (default: a filename derived from the project name
        /// and the current date-time, in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import annotations from an Excel workbook
    ///
    /// Replaces the status, assignee, and due-date mappings atomically;
    /// a file that cannot be parsed leaves all state untouched.
    Import {
        /// Workbook to read (.xlsx or .xls)
        file: PathBuf,
    },

    /// Show overdue and due-soon nodes
    Alerts {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Emit the per-node decoration and alert list for the graph renderer
    Overlay,

    /// Reset every annotation, the favorites, and the project name
    ///
    /// Destructive and irreversible; refuses to run without --force.
    Clear {
        /// Confirm the reset
        #[arg(long)]
        force: bool,
    },
}

/// Assignee subcommands
#[derive(Subcommand, Debug)]
pub enum AssigneeCommands {
    /// Append a name to a node's assignees (no-op if already present)
    Add {
        /// Node ID
        id: String,
        /// Assignee name
        name: String,
    },

    /// Remove a name from a node's assignees
    Remove {
        /// Node ID
        id: String,
        /// Assignee name
        name: String,
    },

    /// Replace a node's assignees with the given names
    Set {
        /// Node ID
        id: String,
        /// Assignee names
        names: Vec<String>,
    },

    /// Remove all assignees from a node
    Clear {
        /// Node ID
        id: String,
    },
}
