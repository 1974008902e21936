//! Persistent key-value storage for annotation data.
//!
//! The annotation state talks to a `KvStore` port so the persistence
//! mechanism can be swapped: `FileStore` (one file per key under the
//! project's data directory) in production, `MemStore` in tests.
//!
//! Storage reads are deliberately forgiving: a missing or corrupt key
//! yields the type's empty default and is never surfaced as an error.
//! Writes are swallowed on failure so a broken disk degrades the session
//! to in-memory operation instead of aborting it.

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Store key for the status mapping (JSON object).
pub const KEY_STATUS: &str = "status";
/// Store key for the assignee mapping (JSON object).
pub const KEY_ASSIGNEE: &str = "assignee";
/// Store key for the due-date mapping (JSON object).
pub const KEY_DUE_DATE: &str = "due-date";
/// Store key for the memo mapping (JSON object).
pub const KEY_MEMO: &str = "memo";
/// Store key for the favorite node set (JSON array).
pub const KEY_FAVORITES: &str = "favorites";
/// Store key for the project name (raw string).
pub const KEY_PROJECT_NAME: &str = "project-name";
/// Store key for the last-updated stamp (raw formatted string).
pub const KEY_LAST_UPDATED: &str = "last-updated";

/// Port for raw key-value persistence.
///
/// `set` and `remove` are infallible at the signature level: implementations
/// swallow write failures so the annotation model keeps functioning
/// in-memory for the remainder of the session.
pub trait KvStore {
    /// Read the raw value for a key. Missing or unreadable keys are `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the raw value for a key.
    fn set(&mut self, key: &str, value: &str);

    /// Remove a key.
    fn remove(&mut self, key: &str);
}

/// Resolve the data directory for a project path.
///
/// `FM_DATA_DIR` overrides the platform location (used by tests for
/// isolation). Otherwise data lives under
/// `<data dir>/flowmark/<sha256(project path)[..12]>/`.
pub fn get_storage_dir(project_path: &Path) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FM_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;

    let canonical = project_path
        .canonicalize()
        .map_err(|e| Error::Other(format!("Could not canonicalize project path: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());
    let short_hash = &hash_hex[..12];

    Ok(data_dir.join("flowmark").join(short_hash))
}

/// File-backed store: one file per key under the project's data directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the store for a project directory.
    pub fn open(project_path: &Path) -> Result<Self> {
        let root = get_storage_dir(project_path)?;
        Self::open_at(root)
    }

    /// Open the store at an explicit data directory (dependency injection
    /// for tests).
    pub fn open_with_data_dir(data_dir: &Path) -> Result<Self> {
        Self::open_at(data_dir.to_path_buf())
    }

    fn open_at(root: PathBuf) -> Result<Self> {
        // Creation failure is not fatal: reads return defaults and writes
        // degrade to no-ops for the session.
        let _ = std::fs::create_dir_all(&root);
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // Write through a temp file and persist into place so a crash
        // never leaves a half-written mapping behind.
        let write = || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
            tmp.write_all(value.as_bytes())?;
            tmp.persist(self.key_path(key))?;
            Ok(())
        };
        let _ = write();
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.key_path(key));
    }
}

/// In-memory store for unit tests.
#[derive(Default)]
pub struct MemStore {
    entries: HashMap<String, String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Load a node-id mapping from the store. Missing or corrupt entries
/// yield the empty map, silently.
pub fn load_map(store: &dyn KvStore, key: &str) -> HashMap<String, String> {
    store
        .get(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Persist a node-id mapping to the store.
pub fn save_map(store: &mut dyn KvStore, key: &str, map: &HashMap<String, String>) {
    if let Ok(json) = serde_json::to_string(map) {
        store.set(key, &json);
    }
}

/// Load a node-id list from the store. Missing or corrupt entries yield
/// the empty list, silently.
pub fn load_list(store: &dyn KvStore, key: &str) -> Vec<String> {
    store
        .get(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Persist a node-id list to the store.
pub fn save_list(store: &mut dyn KvStore, key: &str, list: &[String]) {
    if let Ok(json) = serde_json::to_string(list) {
        store.set(key, &json);
    }
}
