//! The annotation state model.
//!
//! Four independent mappings from node id to a value (status key, assignee
//! string, due-date string, memo), plus the project name, the last-updated
//! stamp, and the favorite set. The state owns all mutation: every mutator
//! updates exactly one key, persists the affected mapping through the
//! injected store, and refreshes the last-updated stamp. Renaming the
//! project persists but does not refresh the stamp (naming is metadata,
//! not task progress), and neither does toggling a favorite.

use crate::models::NodeStatus;
use crate::storage::{
    self, KvStore, KEY_ASSIGNEE, KEY_DUE_DATE, KEY_FAVORITES, KEY_LAST_UPDATED, KEY_MEMO,
    KEY_PROJECT_NAME, KEY_STATUS,
};
use chrono::Local;
use std::collections::{BTreeSet, HashMap};

/// Session-long annotation state over an injected key-value store.
pub struct AnnotationState {
    status: HashMap<String, String>,
    assignee: HashMap<String, String>,
    due_date: HashMap<String, String>,
    memo: HashMap<String, String>,
    favorites: BTreeSet<String>,
    project_name: String,
    last_updated: String,
    store: Box<dyn KvStore>,
}

impl AnnotationState {
    /// Construct the state by loading every mapping from the store.
    /// Missing or corrupt entries load as their empty defaults.
    pub fn load(store: Box<dyn KvStore>) -> Self {
        let status = storage::load_map(store.as_ref(), KEY_STATUS);
        let assignee = storage::load_map(store.as_ref(), KEY_ASSIGNEE);
        let due_date = storage::load_map(store.as_ref(), KEY_DUE_DATE);
        let memo = storage::load_map(store.as_ref(), KEY_MEMO);
        let favorites = storage::load_list(store.as_ref(), KEY_FAVORITES)
            .into_iter()
            .collect();
        let project_name = store.get(KEY_PROJECT_NAME).unwrap_or_default();
        let last_updated = store.get(KEY_LAST_UPDATED).unwrap_or_default();

        Self {
            status,
            assignee,
            due_date,
            memo,
            favorites,
            project_name,
            last_updated,
            store,
        }
    }

    // --- Accessors: missing key means the documented default ---

    /// Resolved status for a node; `pending` when no entry exists or the
    /// stored key is unrecognized.
    pub fn status_of(&self, node_id: &str) -> NodeStatus {
        self.status
            .get(node_id)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Comma-joined assignee string; empty means unassigned.
    pub fn assignee_of(&self, node_id: &str) -> &str {
        self.assignee.get(node_id).map(String::as_str).unwrap_or("")
    }

    /// Raw due-date string (`YYYY-MM-DD`); empty means no due date.
    pub fn due_date_of(&self, node_id: &str) -> &str {
        self.due_date.get(node_id).map(String::as_str).unwrap_or("")
    }

    /// Free-text memo; empty when none.
    pub fn memo_of(&self, node_id: &str) -> &str {
        self.memo.get(node_id).map(String::as_str).unwrap_or("")
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    pub fn is_favorite(&self, node_id: &str) -> bool {
        self.favorites.contains(node_id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &str> {
        self.favorites.iter().map(String::as_str)
    }

    // --- Mutators: persist the affected mapping, refresh last-updated ---

    pub fn set_status(&mut self, node_id: &str, status: NodeStatus) {
        self.status
            .insert(node_id.to_string(), status.as_str().to_string());
        storage::save_map(self.store.as_mut(), KEY_STATUS, &self.status);
        self.touch();
    }

    pub fn set_assignee(&mut self, node_id: &str, assignee: &str) {
        self.assignee
            .insert(node_id.to_string(), assignee.to_string());
        storage::save_map(self.store.as_mut(), KEY_ASSIGNEE, &self.assignee);
        self.touch();
    }

    /// Append a name to the node's assignee set if not already present.
    pub fn add_assignee(&mut self, node_id: &str, name: &str) {
        let mut names = split_assignees(self.assignee_of(node_id));
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        self.set_assignee(node_id, &names.join(", "));
    }

    /// Remove a name from the node's assignee set.
    pub fn remove_assignee(&mut self, node_id: &str, name: &str) {
        let names: Vec<String> = split_assignees(self.assignee_of(node_id))
            .into_iter()
            .filter(|n| n != name)
            .collect();
        self.set_assignee(node_id, &names.join(", "));
    }

    pub fn set_due_date(&mut self, node_id: &str, date: &str) {
        self.due_date.insert(node_id.to_string(), date.to_string());
        storage::save_map(self.store.as_mut(), KEY_DUE_DATE, &self.due_date);
        self.touch();
    }

    pub fn set_memo(&mut self, node_id: &str, memo: &str) {
        self.memo.insert(node_id.to_string(), memo.to_string());
        storage::save_map(self.store.as_mut(), KEY_MEMO, &self.memo);
        self.touch();
    }

    /// Rename the project. Persists, but does not refresh last-updated.
    pub fn set_project_name(&mut self, name: &str) {
        self.project_name = name.to_string();
        self.store.set(KEY_PROJECT_NAME, name);
    }

    /// Toggle favorite membership; returns the new membership state.
    /// Favorites persist separately and never enter the spreadsheet.
    pub fn toggle_favorite(&mut self, node_id: &str) -> bool {
        let now_favorite = if self.favorites.remove(node_id) {
            false
        } else {
            self.favorites.insert(node_id.to_string());
            true
        };
        let list: Vec<String> = self.favorites.iter().cloned().collect();
        storage::save_list(self.store.as_mut(), KEY_FAVORITES, &list);
        now_favorite
    }

    /// Atomic replacement of the imported mappings plus project name.
    /// The memo mapping is not part of the spreadsheet and is untouched.
    /// An empty imported project name leaves the current name in place.
    pub fn apply_import(
        &mut self,
        status: HashMap<String, String>,
        assignee: HashMap<String, String>,
        due_date: HashMap<String, String>,
        project_name: &str,
    ) {
        self.status = status;
        storage::save_map(self.store.as_mut(), KEY_STATUS, &self.status);
        self.assignee = assignee;
        storage::save_map(self.store.as_mut(), KEY_ASSIGNEE, &self.assignee);
        self.due_date = due_date;
        storage::save_map(self.store.as_mut(), KEY_DUE_DATE, &self.due_date);
        if !project_name.is_empty() {
            self.set_project_name(project_name);
        }
        self.touch();
    }

    /// Bulk reset: every mapping, the favorite set, and the project name
    /// return to their defaults; the last-updated key is removed.
    pub fn clear_all(&mut self) {
        self.status.clear();
        storage::save_map(self.store.as_mut(), KEY_STATUS, &self.status);
        self.assignee.clear();
        storage::save_map(self.store.as_mut(), KEY_ASSIGNEE, &self.assignee);
        self.due_date.clear();
        storage::save_map(self.store.as_mut(), KEY_DUE_DATE, &self.due_date);
        self.memo.clear();
        storage::save_map(self.store.as_mut(), KEY_MEMO, &self.memo);
        self.favorites.clear();
        storage::save_list(self.store.as_mut(), KEY_FAVORITES, &[]);
        self.set_project_name("");
        self.last_updated.clear();
        self.store.remove(KEY_LAST_UPDATED);
    }

    fn touch(&mut self) {
        self.last_updated = Local::now().format("%Y/%m/%d %H:%M").to_string();
        self.store.set(KEY_LAST_UPDATED, &self.last_updated);
    }
}

/// Split a comma-joined assignee string into trimmed names.
fn split_assignees(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
