//! sitekit
//!
//! Browser-local behaviour for small static sites, as a library: form
//! submissions captured into a local store and exported as CSV, a persisted
//! favourite picked from a roster, and lazily generated avatars.
//!
//! # Crates
//!
//! - [`sitekit_store`]: the local key-value store
//! - [`sitekit_capture`]: form → record → collection → CSV
//! - [`sitekit_select`]: single persisted selection over a catalog
//! - [`sitekit_avatar`]: memoized, visibility-deferred avatars
//!
//! This crate wires them together from a [`SiteConfig`] into a [`Site`]
//! whose operations answer with a [`Notice`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sitekit::{FormData, Site, SiteConfig};
//! use sitekit_store::MemoryStore;
//!
//! let site = Site::new(SiteConfig::default(), Arc::new(MemoryStore::new()));
//!
//! let notice = site.submit(
//!     "newsletter",
//!     &FormData::from_pairs([("email", "fan@example.com")]),
//! );
//! assert_eq!(notice.message, "Thanks, fan@example.com has been added to the list.");
//!
//! let notice = site.toggle_favorite(7);
//! assert_eq!(notice.message, "Saved Tawanda Moyo as your favourite.");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod notice;
pub mod roster;
pub mod site;

pub use config::{
    AvatarConfig, FormConfig, FormMessages, SelectionConfig, SiteConfig, StorageConfig,
    DEFAULT_QUOTA_BYTES,
};
pub use error::{ConfigError, Result, SiteError};
pub use notice::{render_template, Notice, NoticeLevel};
pub use roster::{club_squad, roster, Member, Roster};
pub use site::{FavoriteSummary, Site};

pub use sitekit_avatar as avatar;
pub use sitekit_capture as capture;
pub use sitekit_select as select;
pub use sitekit_store as store;

pub use sitekit_capture::{CsvExport, FormData};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a site
    pub use crate::{FormData, Member, Notice, NoticeLevel, Site, SiteConfig};
    pub use sitekit_store::{FileStore, LocalStore, MemoryStore};
}
