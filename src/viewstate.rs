//! Persisted view state.
//!
//! Remembers presentation choices (which groups are expanded) between runs.
//! Only the app reads and writes it; the engine never sees it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Key under which the expanded group names are stored.
pub const EXPANDED_GROUPS_KEY: &str = "expandedGroups";

/// A string key-value store for view state.
pub trait ViewStateStore: Send + Debug {
    /// Read a value. `None` if it was never written.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// Store kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryViewStore {
    values: BTreeMap<String, String>,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewStateStore for MemoryViewStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// The file is read once when opened and rewritten on every `set`. A missing
/// or unreadable file starts out empty.
#[derive(Debug)]
pub struct FileViewStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileViewStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();
        debug!("opened view state {}", path.display());
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewStateStore for FileViewStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write view state {}", self.path.display()))
    }
}

/// Expanded group names, or `None` if never saved (all groups expanded).
pub fn load_expanded_groups(store: &dyn ViewStateStore) -> Option<BTreeSet<String>> {
    let raw = store.get(EXPANDED_GROUPS_KEY)?;
    serde_json::from_str(&raw).ok()
}

/// Save the expanded group names.
pub fn save_expanded_groups(store: &mut dyn ViewStateStore, groups: &BTreeSet<String>) -> Result<()> {
    store.set(EXPANDED_GROUPS_KEY, serde_json::to_string(groups)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryViewStore::new();
        assert!(store.get("missing").is_none());
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_expanded_groups_roundtrip() {
        let mut store = MemoryViewStore::new();
        assert!(load_expanded_groups(&store).is_none());

        let groups: BTreeSet<String> = ["Core".to_string()].into_iter().collect();
        save_expanded_groups(&mut store, &groups).unwrap();
        assert_eq!(load_expanded_groups(&store), Some(groups));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");

        let mut store = FileViewStore::open(&path);
        assert!(store.get(EXPANDED_GROUPS_KEY).is_none());
        store.set(EXPANDED_GROUPS_KEY, "[\"Edge\"]".to_string()).unwrap();

        let reopened = FileViewStore::open(&path);
        assert_eq!(reopened.path(), path.as_path());
        let groups = load_expanded_groups(&reopened).unwrap();
        assert!(groups.contains("Edge"));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        fs::write(&path, "garbage").unwrap();

        let store = FileViewStore::open(&path);
        assert!(store.get(EXPANDED_GROUPS_KEY).is_none());
    }
}
