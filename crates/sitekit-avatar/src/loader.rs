//! Visibility-deferred avatar resolution
//!
//! Consumers (avatar slots on a page) register their attributes up front and
//! are resolved the first time they are reported visible. A consumer resolves
//! at most once; after resolution or cancellation its id is forgotten.

use crate::cache::AvatarCache;
use crate::key::{AssetRef, DEFAULT_IDENTITY, DEFAULT_STYLE};
use crate::render::{AvatarRenderer, SvgAvatarRenderer};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Whether the host can report visibility changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilitySupport {
    /// Resolution waits for [`AvatarLoader::notify_visible`]
    #[default]
    Observed,
    /// Every consumer resolves at registration
    Unsupported,
}

/// Handle for a registered consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u64);

impl ConsumerId {
    /// Raw numeric id
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "avatar-{}", self.0)
    }
}

/// Result of registering a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Waiting for visibility
    Pending(ConsumerId),
    /// Resolved immediately (no visibility support)
    Resolved(AssetRef),
}

impl Registration {
    /// Pending id, if not yet resolved
    #[must_use]
    pub fn pending_id(&self) -> Option<ConsumerId> {
        match self {
            Self::Pending(id) => Some(*id),
            Self::Resolved(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingAvatar {
    identity: String,
    style: String,
}

/// Defers avatar generation until a consumer becomes visible
pub struct AvatarLoader<R = SvgAvatarRenderer> {
    cache: AvatarCache<R>,
    support: VisibilitySupport,
    default_identity: String,
    default_style: String,
    pending: Mutex<IndexMap<ConsumerId, PendingAvatar>>,
    next_id: AtomicU64,
}

impl<R: AvatarRenderer + 'static> AvatarLoader<R> {
    /// Create loader resolving through `cache`
    #[must_use]
    pub fn new(cache: AvatarCache<R>, support: VisibilitySupport) -> Self {
        Self {
            cache,
            support,
            default_identity: DEFAULT_IDENTITY.to_string(),
            default_style: DEFAULT_STYLE.to_string(),
            pending: Mutex::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set attributes used when a consumer omits them
    #[must_use]
    pub fn with_defaults(mut self, identity: impl Into<String>, style: impl Into<String>) -> Self {
        self.default_identity = identity.into();
        self.default_style = style.into();
        self
    }

    /// Backing cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &AvatarCache<R> {
        &self.cache
    }

    /// Host visibility support
    #[inline]
    #[must_use]
    pub fn support(&self) -> VisibilitySupport {
        self.support
    }

    /// Register a consumer; missing or blank attributes take the defaults
    pub fn register(&self, identity: Option<&str>, style: Option<&str>) -> Registration {
        let avatar = PendingAvatar {
            identity: non_blank(identity).unwrap_or(&self.default_identity).to_string(),
            style: non_blank(style).unwrap_or(&self.default_style).to_string(),
        };

        if self.support == VisibilitySupport::Unsupported {
            return Registration::Resolved(self.resolve(&avatar));
        }

        let id = ConsumerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.pending.lock().insert(id, avatar);
        tracing::debug!(consumer = %id, "avatar deferred");
        Registration::Pending(id)
    }

    /// Resolve a consumer that just became visible
    ///
    /// Returns `None` for unknown, cancelled or already resolved consumers.
    pub fn notify_visible(&self, id: ConsumerId) -> Option<AssetRef> {
        let avatar = self.pending.lock().shift_remove(&id)?;
        tracing::debug!(consumer = %id, "avatar visible");
        Some(self.resolve(&avatar))
    }

    /// Forget a consumer removed before it became visible
    pub fn cancel(&self, id: ConsumerId) -> bool {
        self.pending.lock().shift_remove(&id).is_some()
    }

    /// Resolve every consumer still waiting, in registration order
    pub fn flush(&self) -> Vec<(ConsumerId, AssetRef)> {
        let drained: Vec<_> = self.pending.lock().drain(..).collect();
        drained
            .into_iter()
            .map(|(id, avatar)| (id, self.resolve(&avatar)))
            .collect()
    }

    /// Number of consumers waiting for visibility
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    fn resolve(&self, avatar: &PendingAvatar) -> AssetRef {
        self.cache.get_or_create(&avatar.identity, &avatar.style)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl<R> fmt::Debug for AvatarLoader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarLoader")
            .field("support", &self.support)
            .field("pending", &self.pending.lock().len())
            .finish_non_exhaustive()
    }
}
