//! Common test utilities for flowmark integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/flowmark/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A small flow graph used as the project fixture: three task nodes and
/// one junction.
const FIXTURE_GRAPH: &str = r#"{
    "meta": {"name": "fixture"},
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

/// A test environment with isolated project and data directories.
///
/// The `fm()` method returns a `Command` that sets `FM_DATA_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub project_dir: TempDir,
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with the fixture graph in place.
    pub fn new() -> Self {
        let env = Self {
            project_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
        };
        std::fs::write(env.project_dir.path().join("flow.json"), FIXTURE_GRAPH).unwrap();
        env
    }

    /// Create a test environment without a graph file.
    pub fn without_graph() -> Self {
        Self {
            project_dir: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the fm binary with isolated data directory.
    pub fn fm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fm"));
        cmd.current_dir(self.project_dir.path());
        cmd.env("FM_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Get the path to the project directory.
    pub fn project_path(&self) -> &std::path::Path {
        self.project_dir.path()
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
