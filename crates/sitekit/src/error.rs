//! Error types for the sitekit facade

use sitekit_capture::CaptureError;
use sitekit_select::SelectError;
use std::path::PathBuf;

/// Site configuration failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`SiteConfig`](crate::SiteConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("cannot render config: {0}")]
    Render(#[from] toml::ser::Error),

    /// Two forms share a name
    #[error("form '{0}' is defined more than once")]
    DuplicateForm(String),
}

/// Facade failures
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No form with this name is configured
    #[error("unknown form '{0}'")]
    UnknownForm(String),

    /// Record capture failed
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Favourite selection failed
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SiteError {
    /// Check if the failure came from unavailable storage
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        match self {
            Self::Capture(e) => e.is_storage_unavailable(),
            Self::Select(e) => matches!(e, SelectError::StorageUnavailable(_)),
            Self::UnknownForm(_) | Self::Config(_) => false,
        }
    }
}

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, SiteError>;
