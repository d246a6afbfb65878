//! Typed JSON slot over a raw store key
//!
//! The store itself never encodes; each component owns a [`JsonSlot`] per
//! key it manages, so the on-disk format is decided by the component.

use crate::error::SlotError;
use crate::LocalStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// One store key holding a JSON-encoded `T`
pub struct JsonSlot<T> {
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSlot<T> {
    /// Bind a slot to `key`
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _marker: PhantomData,
        }
    }

    /// Store key this slot reads and writes
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Delete the key
    ///
    /// # Errors
    /// Returns [`SlotError::Store`] when the store rejects the removal.
    pub fn clear(&self, store: &dyn LocalStore) -> Result<(), SlotError> {
        store.remove(&self.key)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> JsonSlot<T> {
    /// Load and decode the value, `None` if the key is absent
    ///
    /// # Errors
    /// - [`SlotError::Store`] if the store cannot be read
    /// - [`SlotError::Decode`] if the stored text is not a valid `T`
    pub fn load(&self, store: &dyn LocalStore) -> Result<Option<T>, SlotError> {
        let Some(raw) = store.get(&self.key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| SlotError::Decode {
                key: self.key.clone(),
                source,
            })
    }
}

impl<T: Serialize> JsonSlot<T> {
    /// Encode and write the value
    ///
    /// # Errors
    /// - [`SlotError::Encode`] if `value` cannot be encoded
    /// - [`SlotError::Store`] if the store rejects the write
    pub fn save(&self, store: &dyn LocalStore, value: &T) -> Result<(), SlotError> {
        let json = serde_json::to_string(value).map_err(|source| SlotError::Encode {
            key: self.key.clone(),
            source,
        })?;
        store.set(&self.key, &json)?;
        Ok(())
    }
}

impl<T> Clone for JsonSlot<T> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<T> fmt::Debug for JsonSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSlot")
            .field("key", &self.key)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
