//! Error types for record capture

use crate::record::Record;
use sitekit_store::{SlotError, StoreError};

/// Capture pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A required field is missing or blank; nothing was written
    #[error("required field '{field}' is empty")]
    Validation {
        /// Normalized key of the first failing field
        field: String,
    },

    /// The store could not be read or written
    ///
    /// When the failure happened after validation, `record` carries the
    /// accepted record so the caller can keep or retry it.
    #[error("records under '{storage_key}' are unavailable: {source}")]
    StorageUnavailable {
        /// Collection key
        storage_key: String,
        /// Validated record that was not persisted
        record: Option<Box<Record>>,
        /// Store failure
        #[source]
        source: StoreError,
    },

    /// The stored collection is not a valid record list; it is left as is
    #[error("stored records under '{storage_key}' cannot be read: {source}")]
    CorruptCollection {
        /// Collection key
        storage_key: String,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },
}

impl CaptureError {
    /// Create validation error for field
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    pub(crate) fn from_slot(storage_key: &str, record: Option<Record>, err: SlotError) -> Self {
        match err {
            SlotError::Store(source) => Self::StorageUnavailable {
                storage_key: storage_key.to_owned(),
                record: record.map(Box::new),
                source,
            },
            SlotError::Decode { source, .. } | SlotError::Encode { source, .. } => {
                Self::CorruptCollection {
                    storage_key: storage_key.to_owned(),
                    source,
                }
            }
        }
    }

    /// Check if the user can fix this by editing the form
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if the persistence layer is the cause
    #[inline]
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// The validated record that could not be saved, if any
    #[must_use]
    pub fn unsaved_record(&self) -> Option<&Record> {
        match self {
            Self::StorageUnavailable { record, .. } => record.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = CaptureError::validation("email");
        assert_eq!(err.to_string(), "required field 'email' is empty");
        assert!(err.is_validation());
        assert!(err.unsaved_record().is_none());
    }

    #[test]
    fn store_slot_error_maps_to_unavailable() {
        let slot_err = SlotError::Store(StoreError::disabled("off"));
        let err = CaptureError::from_slot("clubContacts", None, slot_err);

        assert!(err.is_storage_unavailable());
        assert!(err.to_string().contains("clubContacts"));
    }

    #[test]
    fn decode_slot_error_maps_to_corrupt() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let slot_err = SlotError::Decode {
            key: "clubContacts".into(),
            source,
        };
        let err = CaptureError::from_slot("clubContacts", None, slot_err);

        assert!(matches!(err, CaptureError::CorruptCollection { .. }));
    }
}
