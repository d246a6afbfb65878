//! In-process store
//!
//! Same semantics as the persistent store minus durability. Useful as the
//! degraded fallback and as the default in tests.

use crate::error::{Result, StoreError};
use crate::LocalStore;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory key-value store with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStore {
    /// Create an empty, unbounded store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes past `limit` bytes
    ///
    /// Usage counts key and value lengths, matching how browsers account
    /// local storage.
    #[inline]
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// Create a store where every operation reports unavailability
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Bytes currently held
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        usage(&self.entries.lock())
    }

    /// Number of keys held
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn check_enabled(&self) -> Result<()> {
        if self.disabled {
            return Err(StoreError::disabled("memory store is disabled"));
        }
        Ok(())
    }
}

pub(crate) fn usage(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Bytes a key space would hold after replacing `key` with `value`
pub(crate) fn usage_after_set<'a>(
    entries: impl IntoIterator<Item = (&'a String, &'a String)>,
    key: &str,
    value: &str,
) -> usize {
    let kept: usize = entries
        .into_iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    kept + key.len() + value.len()
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_enabled()?;
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_enabled()?;
        let mut entries = self.entries.lock();

        if let Some(limit) = self.quota {
            let requested = usage_after_set(entries.iter(), key, value);
            if requested > limit {
                tracing::warn!(key, requested, limit, "memory store quota exceeded");
                return Err(StoreError::QuotaExceeded { requested, limit });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        tracing::debug!(key, bytes = value.len(), "memory store set");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_enabled()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_absent_key_succeeds() {
        let store = MemoryStore::new();
        store.remove("absent").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap();

        let err = store.set("other", "123456").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                requested: 17,
                limit: 10
            }
        ));
        // Rejected write leaves the store untouched
        assert_eq!(store.get("other").unwrap(), None);
        assert_eq!(store.used_bytes(), 6);
    }

    #[test]
    fn quota_accounts_for_replaced_value() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Replacing the value does not double-count the old one
        store.set("k", "987654321").unwrap();
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn disabled_store_fails_every_operation() {
        let store = MemoryStore::disabled();
        assert!(store.get("k").is_err());
        assert!(store.set("k", "v").is_err());
        assert!(store.remove("k").is_err());
    }
}
