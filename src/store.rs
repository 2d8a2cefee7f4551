//! Key-value store implementations for the persisted voice preference.
//!
//! The browser host injects local storage here; for tests and the demo
//! binary we ship an in-memory map and a JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::platform::KeyValueStore;

/// Volatile store, used in tests and as a safe default.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// JSON-file-backed store: one flat string map, written through on every set.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Load the store from `path`. A missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.values) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize preference store: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), "failed to save preference store: {}", e);
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("voice-enabled"), None);
        store.set("voice-enabled", "true");
        assert_eq!(store.get("voice-enabled").as_deref(), Some("true"));
    }

    #[test]
    fn test_file_store_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = JsonFileStore::load(&path);
        store.set("voice-enabled", "false");

        let reloaded = JsonFileStore::load(&path);
        assert_eq!(reloaded.get("voice-enabled").as_deref(), Some("false"));
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::load(&path);
        assert_eq!(store.get("anything"), None);
    }
}
