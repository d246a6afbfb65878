//! Error types for the selection register

use sitekit_store::{SlotError, StoreError};

/// Selection failures
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// The id has no entry in the catalog
    #[error("no catalog entry for '{id}'")]
    NotFound {
        /// Requested or stored id, rendered as text
        id: String,
    },

    /// The selection could not be read or written
    #[error("selection is unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    /// The id could not be serialized for storage
    #[error("selection cannot be encoded: {0}")]
    Encode(#[source] SlotError),
}

impl SelectError {
    /// Create not-found error for id
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Check if the id is unknown to the catalog
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for selection operations
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = SelectError::not_found(12);
        assert_eq!(err.to_string(), "no catalog entry for '12'");
        assert!(err.is_not_found());
    }

    #[test]
    fn encode_error_is_not_storage_unavailable() {
        let source = serde::ser::Error::custom("id refuses to encode");
        let err = SelectError::Encode(SlotError::Encode {
            key: "favoritePlayer".to_string(),
            source,
        });
        assert_eq!(
            err.to_string(),
            "selection cannot be encoded: \
             value for 'favoritePlayer' cannot be encoded: id refuses to encode"
        );
        assert!(!matches!(err, SelectError::StorageUnavailable(_)));
    }

    #[test]
    fn store_error_conversion() {
        let err: SelectError = StoreError::disabled("off").into();
        assert!(matches!(err, SelectError::StorageUnavailable(_)));
        assert!(!err.is_not_found());
    }
}
