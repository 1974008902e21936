//! Flowmark CLI - annotation tracking for construction-process flow graphs.

use clap::Parser;
use flowmark::action_log;
use flowmark::cli::{AssigneeCommands, Cli, Commands};
use flowmark::commands::{self, Output};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    // Determine project path: --project flag > FM_PROJECT env > cwd
    let project_path = resolve_project_path(cli.project_path, human);

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &project_path);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&project_path, &cmd_name, args_json, success, error, duration);

    match result {
        Ok(output) => commands::print(&output, human),
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!("{}", serde_json::json!({"error": e.to_string()}));
            }
            process::exit(1);
        }
    }
}

/// Resolve the project path from the explicit flag or the current
/// directory. An explicit path must exist; it is used literally.
fn resolve_project_path(explicit_path: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                if human {
                    eprintln!(
                        "Error: Specified project path does not exist: {}",
                        path.display()
                    );
                } else {
                    eprintln!(
                        "{}",
                        serde_json::json!({
                            "error": format!(
                                "Specified project path does not exist: {}",
                                path.display()
                            )
                        })
                    );
                }
                process::exit(1);
            }
            path
        }
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn run_command(command: Option<Commands>, project_path: &Path) -> flowmark::Result<Output> {
    match command {
        Some(Commands::List) | None => commands::list(project_path),
        Some(Commands::Show { id }) => commands::show(project_path, &id),
        Some(Commands::Status { id, value }) => {
            commands::status(project_path, &id, value.as_deref())
        }
        Some(Commands::Assignee { command }) => match command {
            AssigneeCommands::Add { id, name } => commands::assignee_add(project_path, &id, &name),
            AssigneeCommands::Remove { id, name } => {
                commands::assignee_remove(project_path, &id, &name)
            }
            AssigneeCommands::Set { id, names } => {
                commands::assignee_set(project_path, &id, &names)
            }
            AssigneeCommands::Clear { id } => commands::assignee_clear(project_path, &id),
        },
        Some(Commands::Due { id, date, clear }) => {
            commands::due(project_path, &id, date.as_deref(), clear)
        }
        Some(Commands::Memo { id, text, clear }) => {
            commands::memo(project_path, &id, text.as_deref(), clear)
        }
        Some(Commands::Project { name }) => commands::project(project_path, name.as_deref()),
        Some(Commands::Fav { id }) => commands::fav(project_path, id.as_deref()),
        Some(Commands::Assignees) => commands::assignees(),
        Some(Commands::Export { output }) => commands::export(project_path, output.as_deref()),
        Some(Commands::Import { file }) => commands::import(project_path, &file),
        Some(Commands::Alerts { today }) => commands::alerts_cmd(project_path, today.as_deref()),
        Some(Commands::Overlay) => commands::overlay_cmd(project_path),
        Some(Commands::Clear { force }) => commands::clear(project_path, force),
    }
}

/// Flatten the parsed command into a name and argument object for the
/// action log.
fn serialize_command(command: &Option<Commands>) -> (String, serde_json::Value) {
    use serde_json::json;

    match command {
        None => ("list".to_string(), json!({})),
        Some(Commands::List) => ("list".to_string(), json!({})),
        Some(Commands::Show { id }) => ("show".to_string(), json!({"id": id})),
        Some(Commands::Status { id, value }) => {
            ("status".to_string(), json!({"id": id, "value": value}))
        }
        Some(Commands::Assignee { command }) => match command {
            AssigneeCommands::Add { id, name } => {
                ("assignee add".to_string(), json!({"id": id, "name": name}))
            }
            AssigneeCommands::Remove { id, name } => (
                "assignee remove".to_string(),
                json!({"id": id, "name": name}),
            ),
            AssigneeCommands::Set { id, names } => {
                ("assignee set".to_string(), json!({"id": id, "names": names}))
            }
            AssigneeCommands::Clear { id } => ("assignee clear".to_string(), json!({"id": id})),
        },
        Some(Commands::Due { id, date, clear }) => (
            "due".to_string(),
            json!({"id": id, "date": date, "clear": clear}),
        ),
        Some(Commands::Memo { id, text, clear }) => (
            "memo".to_string(),
            json!({"id": id, "text": text, "clear": clear}),
        ),
        Some(Commands::Project { name }) => ("project".to_string(), json!({"name": name})),
        Some(Commands::Fav { id }) => ("fav".to_string(), json!({"id": id})),
        Some(Commands::Assignees) => ("assignees".to_string(), json!({})),
        Some(Commands::Export { output }) => (
            "export".to_string(),
            json!({"output": output.as_ref().map(|p| p.display().to_string())}),
        ),
        Some(Commands::Import { file }) => (
            "import".to_string(),
            json!({"file": file.display().to_string()}),
        ),
        Some(Commands::Alerts { today }) => ("alerts".to_string(), json!({"today": today})),
        Some(Commands::Overlay) => ("overlay".to_string(), json!({})),
        Some(Commands::Clear { force }) => ("clear".to_string(), json!({"force": force})),
    }
}
