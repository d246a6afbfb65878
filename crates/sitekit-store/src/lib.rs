//! sitekit Local Store
//!
//! A single persistent key-value space scoped to one profile, in the shape
//! of browser local storage: string keys, string values, no implicit
//! encoding.
//!
//! # Core Operations
//!
//! - **get**: read the raw value stored under a key
//! - **set**: overwrite the value under a key
//! - **remove**: delete a key (no-op when absent)
//!
//! Every failure is a [`StoreError`], and every [`StoreError`] means the
//! storage is unavailable. Callers decide whether to degrade (treat reads as
//! empty) or to surface the condition.
//!
//! # Architecture
//!
//! ```text
//! RecordCapture ─┐
//! Selection     ─┼─> JsonSlot<T> ──> dyn LocalStore ──> MemoryStore | FileStore
//! Counter       ─┘     (encoding)      (raw strings)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sitekit_store::{JsonSlot, LocalStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("greeting", "\"hello\"").unwrap();
//!
//! let slot: JsonSlot<String> = JsonSlot::new("greeting");
//! assert_eq!(slot.load(&store).unwrap().as_deref(), Some("hello"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod memory;
pub mod slot;

pub use error::{Result, SlotError, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use slot::JsonSlot;

use std::sync::Arc;

/// Raw persistent key-value space
///
/// Implementations must be usable through a shared reference; the
/// components that hold a store never need `&mut` access.
pub trait LocalStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    ///
    /// # Errors
    /// Returns [`StoreError`] when the storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    ///
    /// # Errors
    /// Returns [`StoreError`] when the write is rejected (quota, disabled,
    /// I/O).
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; removing an absent key succeeds
    ///
    /// # Errors
    /// Returns [`StoreError`] when the storage cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: LocalStore + ?Sized> LocalStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Shared handle to an injected store
pub type SharedStore = Arc<dyn LocalStore>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the local store
    pub use crate::{FileStore, JsonSlot, LocalStore, MemoryStore, SharedStore, StoreError};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_store_delegates_to_inner() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set("k", "v").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
