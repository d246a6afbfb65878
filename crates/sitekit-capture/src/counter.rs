//! Persisted submission counter ("Reviews completed: N")

use sitekit_store::{JsonSlot, LocalStore, SlotError};

/// Integer counter under one store key
#[derive(Debug, Clone)]
pub struct SubmissionCounter {
    slot: JsonSlot<u64>,
}

impl SubmissionCounter {
    /// Create counter stored under `key`
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            slot: JsonSlot::new(key),
        }
    }

    /// Store key of the counter
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        self.slot.key()
    }

    /// Current count; an absent key counts as zero
    ///
    /// # Errors
    /// Returns [`SlotError`] if the store is unavailable or the stored value
    /// is not an integer.
    pub fn current(&self, store: &dyn LocalStore) -> Result<u64, SlotError> {
        Ok(self.slot.load(store)?.unwrap_or(0))
    }

    /// Add one and persist; returns the new count
    ///
    /// # Errors
    /// Returns [`SlotError`] if the count cannot be read or written.
    pub fn increment(&self, store: &dyn LocalStore) -> Result<u64, SlotError> {
        let next = self.current(store)?.saturating_add(1);
        self.slot.save(store, &next)?;
        Ok(next)
    }
}
