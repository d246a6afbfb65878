//! Validated avatar inputs and the asset reference they produce

use crate::error::{GenerationError, Result};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Identity shown when a consumer carries none
pub const DEFAULT_IDENTITY: &str = "??";

/// Background used when a consumer carries none
pub const DEFAULT_STYLE: &str = "#0b6623";

/// Longest identity (in characters) that fits the badge
pub const MAX_IDENTITY_CHARS: usize = 4;

fn is_hex_color(style: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(style))
}

/// `(identity, style)` pair that is known to render
///
/// Two keys are equal exactly when their trimmed identity and style are
/// equal, so the key doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AvatarKey {
    identity: String,
    style: String,
}

impl AvatarKey {
    /// Validate raw attributes
    ///
    /// # Errors
    /// - [`GenerationError::EmptyIdentity`] for a blank identity
    /// - [`GenerationError::IdentityTooLong`] past [`MAX_IDENTITY_CHARS`]
    /// - [`GenerationError::InvalidStyle`] for a non-hex style
    pub fn new(identity: &str, style: &str) -> Result<Self> {
        let identity = identity.trim();
        let style = style.trim();

        if identity.is_empty() {
            return Err(GenerationError::EmptyIdentity);
        }
        if identity.chars().count() > MAX_IDENTITY_CHARS {
            return Err(GenerationError::IdentityTooLong {
                identity: identity.to_string(),
                max: MAX_IDENTITY_CHARS,
            });
        }
        if !is_hex_color(style) {
            return Err(GenerationError::InvalidStyle {
                style: style.to_string(),
            });
        }

        Ok(Self {
            identity: identity.to_string(),
            style: style.to_string(),
        })
    }

    /// The `??` on green placeholder
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            identity: DEFAULT_IDENTITY.to_string(),
            style: DEFAULT_STYLE.to_string(),
        }
    }

    /// Badge text
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Background color
    #[inline]
    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }
}

impl fmt::Display for AvatarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity, self.style)
    }
}

/// Self-contained asset reference (a `data:` URI), cheap to clone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRef(Arc<str>);

impl AssetRef {
    /// Wrap an already-built URI
    #[inline]
    #[must_use]
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// URI text, usable as an image `src`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AssetRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_and_long_hex() {
        assert!(AvatarKey::new("TM", "#0b6623").is_ok());
        assert!(AvatarKey::new("TM", "#FFF").is_ok());
    }

    #[test]
    fn trims_inputs() {
        let key = AvatarKey::new("  BN ", " #0a8b4d").unwrap();
        assert_eq!(key.identity(), "BN");
        assert_eq!(key.style(), "#0a8b4d");
        assert_eq!(key, AvatarKey::new("BN", "#0a8b4d").unwrap());
    }

    #[test]
    fn rejects_malformed_inputs() {
        assert_eq!(AvatarKey::new("   ", "#fff"), Err(GenerationError::EmptyIdentity));
        assert!(matches!(
            AvatarKey::new("ABCDE", "#fff"),
            Err(GenerationError::IdentityTooLong { max: 4, .. })
        ));
        for style in ["green", "#12", "#12345", "0b6623", "#0b6623ff", "#ggg"] {
            assert!(
                matches!(AvatarKey::new("TM", style), Err(GenerationError::InvalidStyle { .. })),
                "{style} should be rejected"
            );
        }
    }

    #[test]
    fn identity_limit_counts_characters() {
        assert!(AvatarKey::new("ÄÖÜß", "#fff").is_ok());
    }

    #[test]
    fn placeholder_is_valid() {
        let placeholder = AvatarKey::placeholder();
        assert_eq!(
            AvatarKey::new(placeholder.identity(), placeholder.style()).unwrap(),
            placeholder
        );
    }
}
