//! sitekit Avatar Cache
//!
//! On-demand avatar synthesis for roster pages: a badge with a short
//! identity (initials) on a colored square, delivered as a self-contained
//! `data:` URI.
//!
//! - [`AvatarCache`] memoizes rendering per `(identity, style)`; malformed
//!   attributes get a fallback badge instead of an error
//! - [`AvatarLoader`] defers rendering until a consumer is reported visible
//!
//! # Example
//!
//! ```rust
//! use sitekit_avatar::{AvatarCache, AvatarLoader, VisibilitySupport};
//!
//! let loader = AvatarLoader::new(AvatarCache::svg(), VisibilitySupport::Observed);
//! let id = loader.register(Some("TM"), Some("#0b6623")).pending_id().unwrap();
//!
//! let asset = loader.notify_visible(id).unwrap();
//! assert!(asset.as_str().starts_with("data:image/svg+xml;base64,"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod key;
pub mod loader;
pub mod render;

pub use cache::AvatarCache;
pub use error::{GenerationError, Result};
pub use key::{AssetRef, AvatarKey, DEFAULT_IDENTITY, DEFAULT_STYLE, MAX_IDENTITY_CHARS};
pub use loader::{AvatarLoader, ConsumerId, Registration, VisibilitySupport};
pub use render::{escape_xml, AvatarRenderer, SvgAvatarRenderer, SVG_MIME_TYPE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
