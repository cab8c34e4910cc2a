use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Opaque string storage addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Reads and decodes `key`, falling back to `default` when the value is
/// missing, unreadable or does not decode.
pub fn load_or_default<T, F>(store: &dyn KeyValueStore, key: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Stored value is corrupt, using default");
                default()
            }
        },
        Ok(None) => default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read from store, using default");
            default()
        }
    }
}

pub fn persist<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened JSON file store");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid store key {key:?}"),
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // write-then-rename so readers never observe a half-written file
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::temp_store_dir;

    #[test]
    fn in_memory_round_trip() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn file_store_round_trip_and_overwrite() {
        let store = JsonFileStore::new(temp_store_dir("kv")).unwrap();
        assert_eq!(store.get("shield_orders").unwrap(), None);
        store.set("shield_orders", "[1]".to_string()).unwrap();
        store.set("shield_orders", "[1,2]".to_string()).unwrap();
        assert_eq!(store.get("shield_orders").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let store = JsonFileStore::new(temp_store_dir("kv")).unwrap();
        assert!(store.get("../etc/passwd").is_err());
        assert!(store.set("", "x".to_string()).is_err());
    }

    #[test]
    fn corrupt_values_fall_back_to_default() {
        let store = InMemoryStore::new();
        store.set("nums", "{not json".to_string()).unwrap();
        let nums: Vec<u32> = load_or_default(&store, "nums", || vec![7]);
        assert_eq!(nums, vec![7]);
    }

    #[test]
    fn persist_then_load_preserves_types_and_order() {
        let store = InMemoryStore::new();
        let value = vec![(3u32, true, 1.5f64), (1, false, 0.0)];
        persist(&store, "tuples", &value).unwrap();
        let back: Vec<(u32, bool, f64)> = load_or_default(&store, "tuples", Vec::new);
        assert_eq!(back, value);
    }
}
