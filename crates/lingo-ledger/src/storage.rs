//! Key-value storage backends for the ledger.
//!
//! Every value is text (serialized JSON). The ledger only needs
//! "get/set string by key", so backends stay small: an in-memory map for
//! tests and a one-file-per-key directory store for real use.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LedgerError;

/// Learning-progress record
pub const USER_DATA_KEY: &str = "userData";
/// History log, newest first
pub const HISTORY_KEY: &str = "learningHistory";
/// Profile-editing scratch state
pub const SETTINGS_KEY: &str = "userSettings";
/// Avatar image data
pub const AVATAR_KEY: &str = "userAvatar";
/// Dark-mode flag
pub const DARK_MODE_KEY: &str = "darkMode";

/// Durable text storage addressed by key
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), LedgerError>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail, as a full or unavailable
    /// browser storage would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every subsequent `get` fail, as a storage backend that is
    /// present but cannot be read would.
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        if self.fail_reads {
            return Err(LedgerError::Storage(format!("storage unavailable reading {}", key)));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        if self.fail_writes {
            return Err(LedgerError::Storage(format!("quota exceeded writing {}", key)));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), LedgerError> {
        if self.fail_writes {
            return Err(LedgerError::Storage(format!("storage unavailable removing {}", key)));
        }
        self.values.remove(key);
        Ok(())
    }
}

/// Directory store: one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, LedgerError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LedgerError::Storage(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write to temp file then rename (atomic)
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), LedgerError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("userData").unwrap(), None);

        store.set("userData", "{}").unwrap();
        assert_eq!(store.get("userData").unwrap(), Some("{}".to_string()));

        store.remove("userData").unwrap();
        store.remove("userData").unwrap(); // absent is fine
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_fail_writes() {
        let mut store = MemoryStore::new();
        store.set("darkMode", "true").unwrap();
        store.set_fail_writes(true);

        assert!(store.set("darkMode", "false").is_err());
        // Reads still work, old value untouched
        assert_eq!(store.get("darkMode").unwrap(), Some("true".to_string()));
    }

    #[test]
    fn test_memory_store_fail_reads() {
        let mut store = MemoryStore::new();
        store.set("userData", "{}").unwrap();
        store.set_fail_reads(true);
        assert!(store.get("userData").is_err());

        store.set_fail_reads(false);
        assert_eq!(store.get("userData").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_creates_dir_and_overwrites() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.set("userData", r#"{"level":1}"#).unwrap();
        store.set("userData", r#"{"level":2}"#).unwrap();

        assert_eq!(store.get("userData").unwrap().as_deref(), Some(r#"{"level":2}"#));
        assert!(dir.path().join("nested").join("userData.json").exists());
        assert!(!dir.path().join("nested").join("userData.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_file_store_remove_absent() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.remove("learningHistory").unwrap();
        assert_eq!(store.get("learningHistory").unwrap(), None);
    }
}
