//! Identity-keyed avatar cache using moka
//!
//! Each key is rendered at most once per cache; concurrent requests for the
//! same key wait on a single initialization. The cache is unbounded: entries
//! are never evicted, so the set of identities a site shows bounds its size.

use crate::error::Result;
use crate::key::{AssetRef, AvatarKey};
use crate::render::{AvatarRenderer, SvgAvatarRenderer};
use moka::sync::Cache;
use std::fmt;
use std::sync::Arc;

/// Memoizing front for an [`AvatarRenderer`]
pub struct AvatarCache<R = SvgAvatarRenderer> {
    inner: Cache<AvatarKey, AssetRef>,
    renderer: Arc<R>,
    fallback: AvatarKey,
}

impl AvatarCache<SvgAvatarRenderer> {
    /// Create cache over the SVG renderer
    #[must_use]
    pub fn svg() -> Self {
        Self::new(SvgAvatarRenderer)
    }
}

impl<R: AvatarRenderer + 'static> AvatarCache<R> {
    /// Create cache over `renderer`
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            inner: Cache::builder().build(),
            renderer: Arc::new(renderer),
            fallback: AvatarKey::placeholder(),
        }
    }

    /// Replace the asset substituted for malformed input
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, fallback: AvatarKey) -> Self {
        self.fallback = fallback;
        self
    }

    /// Key rendered for malformed input
    #[inline]
    #[must_use]
    pub fn fallback(&self) -> &AvatarKey {
        &self.fallback
    }

    /// Asset for a validated key, rendering it on first request
    #[must_use]
    pub fn get(&self, key: &AvatarKey) -> AssetRef {
        self.inner.get_with_by_ref(key, || {
            tracing::debug!(%key, "rendering avatar");
            self.renderer.render(key)
        })
    }

    /// Asset for raw attributes
    ///
    /// # Errors
    /// Returns a [`GenerationError`](crate::GenerationError) if the
    /// attributes are malformed; nothing is rendered or cached then.
    pub fn try_get_or_create(&self, identity: &str, style: &str) -> Result<AssetRef> {
        let key = AvatarKey::new(identity, style)?;
        Ok(self.get(&key))
    }

    /// Asset for raw attributes, substituting the fallback when malformed
    #[must_use]
    pub fn get_or_create(&self, identity: &str, style: &str) -> AssetRef {
        match self.try_get_or_create(identity, style) {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(identity, style, error = %e, "using fallback avatar");
                self.get(&self.fallback)
            }
        }
    }

    /// Check if `key` has been rendered
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &AvatarKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of cached avatars
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for AvatarCache<SvgAvatarRenderer> {
    fn default() -> Self {
        Self::svg()
    }
}

impl<R> Clone for AvatarCache<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            renderer: Arc::clone(&self.renderer),
            fallback: self.fallback.clone(),
        }
    }
}

impl<R> fmt::Debug for AvatarCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarCache")
            .field("fallback", &self.fallback)
            .field("entries", &self.inner.entry_count())
            .finish_non_exhaustive()
    }
}
