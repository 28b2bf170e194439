use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Well-known store keys. One key per record family, last write wins.
pub mod keys {
    pub const GATE_BLOCKED: &str = "gate_blocked";
    pub const LAST_NAVIGATED_URL: &str = "last_navigated_url";
    pub const COOKIE_JAR: &str = "cookie_jar";
    pub const PROJECTS: &str = "projects";
    pub const TASKS: &str = "tasks";
    pub const MILESTONES: &str = "milestones";
    pub const RESOURCES: &str = "resources";
    pub const CATEGORIES: &str = "categories";
    pub const HISTORY: &str = "history";
    pub const TOTAL_PROJECTS_CREATED: &str = "total_projects_created";
    pub const TOTAL_TASKS_COMPLETED: &str = "total_tasks_completed";
    pub const HAS_SEEN_ONBOARDING: &str = "has_seen_onboarding";
}

/// Durable key-value store backing all persisted application state.
///
/// One JSON document on disk, loaded at open and written through on every
/// mutation. The interior mutex makes writes safe to issue from the gate
/// engine and the session actor without external coordination.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl KvStore {
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read store at {}", path.display()))?;
            serde_json::from_str(&contents).context("parse store JSON")?
        } else {
            HashMap::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "store opened");
        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let value = entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Loads an array-valued key, defaulting to empty when absent or unreadable.
    pub fn get_vec<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.get(key).unwrap_or_default()
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .with_context(|| format!("encode store value for {key}"))?;
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), encoded);
        self.flush(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(key);
        self.flush(&entries)
    }

    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.contains_key(key)
    }

    /// The explicit "clear all data" user action. Wipes every key,
    /// including the browser session state.
    pub fn clear_all(&self) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.clear();
        self.flush(&entries)
    }

    /// Renders the whole store as pretty JSON for export.
    pub fn dump(&self) -> Result<String> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let output = serde_json::to_string_pretty(&*entries).context("render store JSON")?;
        Ok(output)
    }

    fn flush(&self, entries: &HashMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create store dir {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(entries).context("render store JSON")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("write store at {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_store() -> (tempfile::TempDir, KvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(&dir.path().join("defaults.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_get_round_trip() {
        let (_dir, store) = open_temp_store();
        store.set(keys::GATE_BLOCKED, &true).unwrap();
        assert_eq!(store.get::<bool>(keys::GATE_BLOCKED), Some(true));
        assert_eq!(store.get::<bool>("missing"), None);
    }

    #[test]
    fn test_last_write_wins_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        {
            let store = KvStore::open(&path).unwrap();
            store.set(keys::LAST_NAVIGATED_URL, &"https://x/a").unwrap();
            store.set(keys::LAST_NAVIGATED_URL, &"https://x/b").unwrap();
        }
        let reopened = KvStore::open(&path).unwrap();
        assert_eq!(
            reopened.get::<String>(keys::LAST_NAVIGATED_URL).as_deref(),
            Some("https://x/b")
        );
    }

    #[test]
    fn test_clear_all_removes_everything() {
        let (_dir, store) = open_temp_store();
        store.set(keys::GATE_BLOCKED, &false).unwrap();
        store.set(keys::TOTAL_TASKS_COMPLETED, &7u32).unwrap();
        store.clear_all().unwrap();
        assert!(!store.contains(keys::GATE_BLOCKED));
        assert!(!store.contains(keys::TOTAL_TASKS_COMPLETED));
    }

    #[test]
    fn test_get_vec_defaults_to_empty() {
        let (_dir, store) = open_temp_store();
        let values: Vec<String> = store.get_vec(keys::PROJECTS);
        assert!(values.is_empty());
    }
}
