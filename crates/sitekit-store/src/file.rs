//! File-backed persistent store
//!
//! The whole key space lives in one JSON object file. Every mutation reloads
//! the file, applies the change and rewrites the full snapshot through a
//! temporary file that is renamed into place, so a reader never observes a
//! half-written file.
//!
//! Two processes sharing the same file are not coordinated: each writes its
//! own full snapshot and the last rename wins. An update made by one process
//! between another's load and rename is lost.

use crate::error::{Result, StoreError};
use crate::memory::usage_after_set;
use crate::LocalStore;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persistent key-value store backed by a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    quota: Option<usize>,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`; the file is created on first write
    #[inline]
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
            guard: Mutex::new(()),
        }
    }

    /// Limit the total bytes (keys + values) the store may hold
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    /// Backing file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::io_error(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Unreadable {
            path: self.path.clone(),
            source,
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io_error(&dir, e))?;

        let json =
            serde_json::to_string_pretty(entries).map_err(|source| StoreError::Unwritable {
                path: self.path.clone(),
                source,
            })?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::io_error(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| StoreError::io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io_error(&self.path, e.error))?;

        Ok(())
    }

    fn check_quota(
        &self,
        entries: &BTreeMap<String, String>,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let Some(limit) = self.quota else {
            return Ok(());
        };

        let requested = usage_after_set(entries, key, value);

        if requested > limit {
            tracing::warn!(
                path = %self.path.display(),
                requested,
                limit,
                "file store quota exceeded"
            );
            return Err(StoreError::QuotaExceeded { requested, limit });
        }
        Ok(())
    }

    /// Snapshot of every key and value currently persisted
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backing file cannot be read.
    pub fn snapshot(&self) -> Result<HashMap<String, String>> {
        let _guard = self.guard.lock();
        Ok(self.load()?.into_iter().collect())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard.lock();
        let mut entries = self.load()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard.lock();
        let mut entries = self.load()?;
        self.check_quota(&entries, key, value)?;

        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)?;

        tracing::debug!(path = %self.path.display(), key, bytes = value.len(), "file store set");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard.lock();
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }

        self.persist(&entries)?;
        tracing::debug!(path = %self.path.display(), key, "file store remove");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("profile").join("store.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let (dir, store) = temp_store();
        store.set("clubContacts", "[]").unwrap();
        store.set("favoritePlayer", "7").unwrap();

        let reopened = FileStore::open(dir.path().join("profile").join("store.json"));
        assert_eq!(reopened.get("favoritePlayer").unwrap().as_deref(), Some("7"));
        assert_eq!(reopened.snapshot().unwrap().len(), 2);
    }

    #[test]
    fn remove_deletes_key() {
        let (_dir, store) = temp_store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn quota_rejects_write_and_keeps_file() {
        let (_dir, store) = temp_store();
        let store = store.with_quota(8);
        store.set("k", "1234").unwrap();

        let err = store.set("k", "123456789").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 8, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn garbage_file_is_unavailable() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.get("k").unwrap_err(),
            StoreError::Unreadable { .. }
        ));
        // A failed load must not clobber the file
        assert!(store.set("k", "v").is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not json");
    }
}
