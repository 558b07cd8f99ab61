//! Key-value storage used for layout persistence and the child session cache
//!
//! The workspace treats storage as opaque: `get` and `set` on string keys.
//! Failures are reported to the caller, which logs them and carries on with
//! in-memory state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Default key namespace for persisted layouts
pub const DEFAULT_NAMESPACE: &str = "paneframe.layout";

/// Storage key for a user's layout: `<namespace>:<user>`
pub fn layout_key(namespace: &str, user: &str) -> String {
    format!("{}:{}", namespace, user)
}

/// Opaque string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store (session scope)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `~/.config/paneframe/layouts/`
    pub fn in_config_dir() -> Result<Self> {
        let dir = crate::config_paths::ensure_layouts_dir().map_err(anyhow::Error::msg)?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(target: "storage", "Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_overwrites_and_sanitizes_key() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp.path());
        let key = layout_key(DEFAULT_NAMESPACE, "alice@corp/eu");

        store.set(&key, "first").unwrap();
        store.set(&key, "second").unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("second"));

        let files: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert!(store.path_for(&key).starts_with(temp.path()));
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let temp = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp.path().join("not-created-yet"));
        assert_eq!(store.get("nobody").unwrap(), None);
    }
}
