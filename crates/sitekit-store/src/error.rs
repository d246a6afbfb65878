//! Error types for the local store
//!
//! Every [`StoreError`] variant is one flavour of "storage unavailable".
//! [`SlotError`] adds the encoding failures a typed slot can hit on top.

use std::path::PathBuf;

/// Storage cannot be read or written
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Write would push the store past its byte quota
    #[error("storage unavailable: quota exceeded ({requested} bytes requested, limit {limit})")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write
        requested: usize,
        /// Configured quota
        limit: usize,
    },

    /// Storage is switched off for this profile
    #[error("storage unavailable: {0}")]
    Disabled(String),

    /// Backing file could not be read or written
    #[error("storage unavailable: io error on {path}: {source}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but is not a JSON object of strings
    #[error("storage unavailable: unreadable store file {path}: {source}")]
    Unreadable {
        /// Backing file
        path: PathBuf,
        /// Decode error
        #[source]
        source: serde_json::Error,
    },

    /// Store contents could not be serialized for writing
    #[error("storage unavailable: cannot encode store file {path}: {source}")]
    Unwritable {
        /// Backing file
        path: PathBuf,
        /// Encode error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create disabled error
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::Disabled(reason.into())
    }
}

/// Errors from a typed [`JsonSlot`](crate::JsonSlot)
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    /// Underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Stored text is not valid JSON for the slot type
    #[error("value under '{key}' cannot be decoded: {source}")]
    Decode {
        /// Slot key
        key: String,
        /// Decode error
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be encoded
    #[error("value for '{key}' cannot be encoded: {source}")]
    Encode {
        /// Slot key
        key: String,
        /// Encode error
        #[source]
        source: serde_json::Error,
    },
}

impl SlotError {
    /// Check if the failure came from the storage layer
    #[inline]
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
