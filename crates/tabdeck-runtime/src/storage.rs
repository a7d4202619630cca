#![forbid(unsafe_code)]

//! Key-value storage backends.
//!
//! [`StorageBackend`] has the shape of the browser's `localStorage`: string
//! keys mapped to string values. Two backends ship here:
//!
//! | Backend          | Persistence | Use case                         |
//! |------------------|-------------|----------------------------------|
//! | [`MemoryStorage`] | None        | Tests, hosts without storage     |
//! | [`FileStorage`]   | JSON file   | Native hosts, cross-session state |
//!
//! # Invariants
//!
//! 1. `get` after `set` on the same key returns the stored value.
//! 2. File writes use write-then-rename, so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Errors from storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Stored data is corrupted or a lock was poisoned.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::Corruption(_)
            | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value store.
pub trait StorageBackend {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Memory storage
// ---------------------------------------------------------------------------

/// In-memory storage; state is lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<AHashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory storage pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn poisoned() -> StorageError {
        StorageError::Corruption("lock poisoned".into())
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().map_err(|_| Self::poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| Self::poisoned())?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| Self::poisoned())?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// File storage
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct StateFile {
    format_version: u32,
    entries: BTreeMap<String, String>,
}

impl StateFile {
    const FORMAT_VERSION: u32 = 1;

    fn new() -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON-file storage.
///
/// # File Format
///
/// ```json
/// {
///   "format_version": 1,
///   "entries": {
///     "tabdeck.visible_count": "5"
///   }
/// }
/// ```
///
/// Writes go to `{path}.tmp`, are flushed, then renamed over `{path}`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at `path`; the file is created on first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Storage at the platform state directory for `app_name`.
    ///
    /// Uses `$XDG_STATE_HOME/{app_name}/state.json`, falling back to
    /// `~/.local/state` and finally the current directory.
    #[must_use]
    pub fn default_for_app(app_name: &str) -> Self {
        let base = if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            PathBuf::from(state_home)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state")
        } else {
            PathBuf::from(".")
        };
        Self::new(base.join(app_name).join("state.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }

    fn load(&self) -> StorageResult<StateFile> {
        if !self.path.exists() {
            return Ok(StateFile::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let state: StateFile = serde_json::from_reader(reader)?;
        if state.format_version != StateFile::FORMAT_VERSION {
            tracing::warn!(
                stored = state.format_version,
                expected = StateFile::FORMAT_VERSION,
                path = %self.path.display(),
                "state file format version mismatch, ignoring stored state"
            );
            return Ok(StateFile::new());
        }
        Ok(state)
    }

    fn save(&self, state: &StateFile) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut state = self.load()?;
        state.entries.insert(key.to_owned(), value.to_owned());
        self.save(&state)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut state = self.load()?;
        if state.entries.remove(key).is_some() {
            self.save(&state)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.path
            .parent()
            .is_none_or(|p| p.as_os_str().is_empty() || p.exists() || fs::create_dir_all(p).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn memory_with_entries() {
        let storage = MemoryStorage::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(format!("{storage:?}"), "MemoryStorage { entries: 2 }");
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("state.json"));
        assert!(storage.is_available());
        assert_eq!(storage.get("missing").unwrap(), None);

        storage.set("tabdeck.visible_count", "5").unwrap();
        storage.set("other", "x").unwrap();
        let reopened = FileStorage::new(storage.path());
        assert_eq!(
            reopened.get("tabdeck.visible_count").unwrap().as_deref(),
            Some("5")
        );
        reopened.remove("other").unwrap();
        assert_eq!(storage.get("other").unwrap(), None);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let err = FileStorage::new(&path).get("k").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn version_mismatch_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"format_version":99,"entries":{"k":"v"}}"#).unwrap();
        assert_eq!(FileStorage::new(&path).get("k").unwrap(), None);
    }

    #[test]
    fn error_display_and_source() {
        use std::error::Error;
        let io = StorageError::from(std::io::Error::other("disk"));
        assert!(io.to_string().contains("disk"));
        assert!(io.source().is_some());
        assert!(StorageError::Unavailable("x".into()).source().is_none());
    }
}
