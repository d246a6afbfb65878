//! Site configuration
//!
//! Everything a site varies on is data here: the store location, each
//! form's capture settings and messages, the favourites key and roster, and
//! avatar defaults. [`SiteConfig::default`] reproduces the club, lodge,
//! review and newsletter forms.
//!
//! ```toml
//! [storage]
//! path = "site-store.json"
//! quota_bytes = 5242880
//!
//! [[forms]]
//! name = "contact"
//! storage_key = "clubContacts"
//! required_fields = ["name", "email", "message"]
//! columns = ["Name", "Email", "Subject", "Message"]
//!
//! [selection]
//! key = "favoritePlayer"
//!
//! [avatars]
//! visibility = "observed"
//! ```

use crate::error::ConfigError;
use crate::roster::{club_squad, Member};
use serde::{Deserialize, Serialize};
use sitekit_avatar::{VisibilitySupport, DEFAULT_IDENTITY, DEFAULT_STYLE};
use sitekit_capture::FormSpec;
use sitekit_select::DEFAULT_SELECTION_KEY;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Browser-like default quota (5 MiB)
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Complete site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Local store settings
    pub storage: StorageConfig,
    /// Captured forms
    pub forms: Vec<FormConfig>,
    /// Favourites register
    pub selection: SelectionConfig,
    /// Avatar generation
    pub avatars: AvatarConfig,
    /// Favourites catalog
    pub members: Vec<Member>,
}

impl SiteConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for invalid TOML and
    /// [`ConfigError::DuplicateForm`] when form names repeat.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SiteConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), forms = config.forms.len(), "config loaded");
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateForm`] when form names repeat.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for form in &self.forms {
            if !seen.insert(form.name.as_str()) {
                return Err(ConfigError::DuplicateForm(form.name.clone()));
            }
        }
        Ok(())
    }

    /// Form by name
    #[must_use]
    pub fn form(&self, name: &str) -> Option<&FormConfig> {
        self.forms.iter().find(|f| f.name == name)
    }

    /// With store file
    #[inline]
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.path = path.into();
        self
    }

    /// With store quota; `None` disables the limit
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.storage.quota_bytes = quota_bytes;
        self
    }

    /// With an additional form, replacing one of the same name
    #[must_use]
    pub fn with_form(mut self, form: FormConfig) -> Self {
        self.forms.retain(|f| f.name != form.name);
        self.forms.push(form);
        self
    }

    /// With favourites key
    #[inline]
    #[must_use]
    pub fn with_selection_key(mut self, key: impl Into<String>) -> Self {
        self.selection.key = key.into();
        self
    }

    /// With avatar visibility support
    #[inline]
    #[must_use]
    pub fn with_visibility(mut self, visibility: VisibilitySupport) -> Self {
        self.avatars.visibility = visibility;
        self
    }

    /// With favourites catalog
    #[inline]
    #[must_use]
    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            forms: default_forms(),
            selection: SelectionConfig::default(),
            avatars: AvatarConfig::default(),
            members: club_squad(),
        }
    }
}

/// Local store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the store
    pub path: PathBuf,
    /// Byte quota over keys and values
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sitekit-store.json"),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }
}

/// One captured form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Name used to address the form
    pub name: String,
    /// Capture settings
    #[serde(flatten)]
    pub spec: FormSpec,
    /// Visitor messages
    #[serde(default)]
    pub messages: FormMessages,
}

impl FormConfig {
    /// Create form with default messages
    #[must_use]
    pub fn new(name: impl Into<String>, spec: FormSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            messages: FormMessages::default(),
        }
    }

    /// With messages
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: FormMessages) -> Self {
        self.messages = messages;
        self
    }
}

/// Visitor messages for a form
///
/// Templates may use `{field}` (the failing field, in `invalid`), any
/// submitted field key, and `{count}` (the submission count, in `success`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormMessages {
    /// Shown after a successful capture
    pub success: String,
    /// Shown when a required field is blank
    pub invalid: String,
}

impl FormMessages {
    /// Create messages
    #[must_use]
    pub fn new(success: impl Into<String>, invalid: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            invalid: invalid.into(),
        }
    }
}

impl Default for FormMessages {
    fn default() -> Self {
        Self::new(
            "Thanks, your submission has been saved locally.",
            "Please fill in {field}.",
        )
    }
}

/// Favourites register settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Store key of the selection
    pub key: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_SELECTION_KEY.to_string(),
        }
    }
}

/// Avatar settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Identity for consumers without one
    pub default_identity: String,
    /// Background for consumers without one
    pub default_style: String,
    /// Host visibility support
    pub visibility: VisibilitySupport,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            default_identity: DEFAULT_IDENTITY.to_string(),
            default_style: DEFAULT_STYLE.to_string(),
            visibility: VisibilitySupport::Observed,
        }
    }
}

fn default_forms() -> Vec<FormConfig> {
    vec![
        FormConfig::new(
            "contact",
            FormSpec::new("clubContacts", ["Name", "Email", "Subject", "Message"])
                .with_required(["name", "email", "message"]),
        )
        .with_messages(FormMessages::new(
            "Thanks, your message has been saved locally.",
            "Please fill in your name, email and message.",
        )),
        FormConfig::new(
            "booking",
            FormSpec::new(
                "lodgeBookings",
                ["Owner-name", "Email", "Lodge", "Check-in", "Check-out", "Guests"],
            )
            .with_required(["owner-name", "email", "lodge"]),
        )
        .with_messages(FormMessages::new(
            "Thanks {owner-name}, your booking request for {lodge} has been saved.",
            "Please fill in {field}.",
        )),
        FormConfig::new(
            "review",
            FormSpec::new(
                "productReviews",
                ["Product", "Rating", "Installed", "Features", "Review", "User-name"],
            )
            .with_required(["product", "rating", "installed"])
            .with_count_key("reviewCount"),
        )
        .with_messages(FormMessages::new(
            "Thanks for your review. Reviews completed: {count}",
            "Please fill in {field}.",
        )),
        FormConfig::new(
            "newsletter",
            FormSpec::new("newsletterSubscribers", ["Email", "ReceivedAt"])
                .with_required(["email"]),
        )
        .with_messages(FormMessages::new(
            "Thanks, {email} has been added to the list.",
            "Please enter a valid email.",
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_site_form() {
        let config = SiteConfig::default();
        let names: Vec<_> = config.forms.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["contact", "booking", "review", "newsletter"]);
        assert_eq!(config.form("contact").unwrap().spec.storage_key, "clubContacts");
        assert_eq!(
            config.form("review").unwrap().spec.count_key.as_deref(),
            Some("reviewCount")
        );
        assert_eq!(config.selection.key, "favoritePlayer");
        assert_eq!(config.members.len(), 5);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
            [storage]
            path = "club.json"

            [avatars]
            visibility = "unsupported"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.path, PathBuf::from("club.json"));
        assert_eq!(config.storage.quota_bytes, Some(DEFAULT_QUOTA_BYTES));
        assert_eq!(config.avatars.visibility, VisibilitySupport::Unsupported);
        assert_eq!(config.forms.len(), 4);
    }

    #[test]
    fn forms_from_toml() {
        let config = SiteConfig::from_toml_str(
            r#"
            [[forms]]
            name = "signup"
            storage_key = "signups"
            required_fields = ["email"]
            columns = ["Email"]

            [forms.messages]
            success = "Welcome {email}"
            "#,
        )
        .unwrap();

        let form = config.form("signup").unwrap();
        assert_eq!(form.spec.storage_key, "signups");
        assert_eq!(form.messages.success, "Welcome {email}");
        assert_eq!(form.messages.invalid, FormMessages::default().invalid);
        assert!(config.form("contact").is_none());
    }

    #[test]
    fn duplicate_form_names_are_rejected() {
        let err = SiteConfig::from_toml_str(
            r#"
            [[forms]]
            name = "a"
            storage_key = "x"
            columns = []

            [[forms]]
            name = "a"
            storage_key = "y"
            columns = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateForm(ref name) if name == "a"));
    }

    #[test]
    fn toml_roundtrip_of_defaults() {
        let config = SiteConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SiteConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn with_form_replaces_by_name() {
        let config = SiteConfig::default().with_form(FormConfig::new(
            "contact",
            FormSpec::new("otherContacts", ["Email"]),
        ));
        assert_eq!(config.forms.len(), 4);
        assert_eq!(config.form("contact").unwrap().spec.storage_key, "otherContacts");
    }
}
