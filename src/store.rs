//! Key-value persistence for tasks and the user profile.
//!
//! The store is a plain `get`/`set` of JSON values. `JsonFileStore` keeps one
//! `<key>.json` file per key inside a data directory; `MemoryStore` keeps
//! everything in a map and is used by tests and throwaway sessions.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, TickitError};

/// Key holding the task collection.
pub const TASKS_KEY: &str = "tickit-tasks";
/// Key holding the user profile.
pub const USER_KEY: &str = "tickit-user";

/// Synchronous JSON key-value storage.
pub trait KeyValueStore {
    /// Read the value for `key`. Missing or unreadable values are `None`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Replace the value for `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Load a typed value, falling back to `default` when the key is absent or
/// its contents do not match `T`.
pub fn load_or_default<T, S>(store: &S, key: &str, default: impl FnOnce() -> T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        None => default(),
        Some(value) => match serde_json::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "stored value is malformed, using defaults");
                default()
            }
        },
    }
}

/// Serialize and write a typed value.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(key, value)
}

/// Directory-backed store with one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| TickitError::Store {
            path: dir.clone(),
            source,
        })?;
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        let mut buf = String::new();
        match File::open(&path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "error parsing store file, treating as absent"
                    );
                    None
                }
            },
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "error reading store file, treating as absent"
                );
                None
            }
        }
    }

    /// Atomic-ish write via temp file + rename.
    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&value)?;
        let write = || -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(data.as_bytes())?;
            f.flush()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|source| TickitError::Store {
            path: path.clone(),
            source,
        })?;
        debug!(key, path = %path.display(), "saved");
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized bytes for `key`, for byte-level comparisons.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.to_string())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", json!({"a": 1})).unwrap();
        assert_eq!(store.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn test_load_or_default_on_absent_and_malformed() {
        let mut store = MemoryStore::new();
        let v: Vec<u32> = load_or_default(&store, "nums", || vec![7]);
        assert_eq!(v, vec![7]);

        store.set("nums", json!({"not": "a list"})).unwrap();
        let v: Vec<u32> = load_or_default(&store, "nums", Vec::new);
        assert!(v.is_empty());

        save(&mut store, "nums", &vec![1u32, 2]).unwrap();
        let v: Vec<u32> = load_or_default(&store, "nums", Vec::new);
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn test_file_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("data")).unwrap();
        store.set(TASKS_KEY, json!([])).unwrap();
        store.set(USER_KEY, json!({"level": 1})).unwrap();

        assert!(store.path_for(TASKS_KEY).exists());
        assert!(store.path_for(USER_KEY).exists());
        assert!(!store.path_for(TASKS_KEY).with_extension("json.tmp").exists());
        assert_eq!(store.get(USER_KEY), Some(json!({"level": 1})));
    }

    #[test]
    fn test_file_store_treats_corrupt_file_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        fs::write(store.path_for(USER_KEY), "{ this is not json").unwrap();
        assert!(store.get(USER_KEY).is_none());
    }
}
