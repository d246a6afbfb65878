//! Error types for avatar generation

/// Inputs that cannot be turned into an avatar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Identity is empty after trimming
    #[error("avatar identity is empty")]
    EmptyIdentity,

    /// Identity has more characters than a badge can show
    #[error("avatar identity '{identity}' is longer than {max} characters")]
    IdentityTooLong {
        /// Offending identity
        identity: String,
        /// Maximum character count
        max: usize,
    },

    /// Style is not a `#rgb` or `#rrggbb` color
    #[error("avatar style '{style}' is not a hex color")]
    InvalidStyle {
        /// Offending style
        style: String,
    },
}

/// Result type alias for avatar operations
pub type Result<T> = std::result::Result<T, GenerationError>;
