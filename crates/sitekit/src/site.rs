//! Site facade: the calls page scripts make
//!
//! Every visitor-facing operation returns a [`Notice`] instead of an error.
//! The typed operations underneath stay available for callers that need
//! more than a message.

use crate::config::{FormConfig, SiteConfig};
use crate::error::{Result, SiteError};
use crate::notice::{render_template, Notice};
use crate::roster::{roster, Member, Roster};
use indexmap::IndexMap;
use sitekit_avatar::{AvatarCache, AvatarKey, AvatarLoader, Registration, SvgAvatarRenderer};
use sitekit_capture::{CaptureError, CsvExport, FormData, RecordCapture};
use sitekit_select::{SelectError, SelectOutcome, SelectionRegister};
use sitekit_store::{FileStore, SharedStore};
use std::fmt;
use std::sync::Arc;

/// What the favourites panel should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteSummary<'a> {
    /// Nothing selected
    Unset,
    /// Selected member
    Member(&'a Member),
    /// Stored id no longer in the roster
    Missing(u32),
}

impl FavoriteSummary<'_> {
    /// Panel text
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unset => "You have not set a favourite player yet.".to_string(),
            Self::Member(member) => {
                format!("{} ({}, #{})", member.name, member.position, member.number)
            }
            Self::Missing(_) => "Favourite player not found.".to_string(),
        }
    }
}

struct SiteForm {
    config: FormConfig,
    capture: RecordCapture,
}

/// One site's forms, favourites and avatars over a shared store
pub struct Site {
    store: SharedStore,
    forms: IndexMap<String, SiteForm>,
    favorites: SelectionRegister<u32, Member>,
    avatars: AvatarLoader,
}

impl Site {
    /// Build a site over an injected store
    #[must_use]
    pub fn new(config: SiteConfig, store: SharedStore) -> Self {
        let forms = config
            .forms
            .into_iter()
            .map(|form| {
                let capture = RecordCapture::new(form.spec.clone(), Arc::clone(&store));
                (form.name.clone(), SiteForm { config: form, capture })
            })
            .collect();

        let favorites = SelectionRegister::with_key(
            Arc::new(roster(config.members)),
            Arc::clone(&store),
            config.selection.key,
        );

        let cache = AvatarCache::new(SvgAvatarRenderer);
        let defaults =
            AvatarKey::new(&config.avatars.default_identity, &config.avatars.default_style);
        let cache = match defaults {
            Ok(fallback) => cache.with_fallback(fallback),
            Err(e) => {
                tracing::warn!(error = %e, "invalid avatar defaults, using built-in placeholder");
                cache
            }
        };
        let avatars = AvatarLoader::new(cache, config.avatars.visibility).with_defaults(
            config.avatars.default_identity,
            config.avatars.default_style,
        );

        Self {
            store,
            forms,
            favorites,
            avatars,
        }
    }

    /// Build a site over the configured [`FileStore`]
    #[must_use]
    pub fn open(config: SiteConfig) -> Self {
        let mut store = FileStore::open(&config.storage.path);
        if let Some(quota) = config.storage.quota_bytes {
            store = store.with_quota(quota);
        }
        tracing::info!(path = %config.storage.path.display(), "opening site store");
        Self::new(config, Arc::new(store))
    }

    /// Shared store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Configured form names
    pub fn form_names(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    /// Capture pipeline for a form
    ///
    /// # Errors
    /// Returns [`SiteError::UnknownForm`] if no form has this name.
    pub fn form(&self, name: &str) -> Result<&RecordCapture> {
        self.site_form(name).map(|f| &f.capture)
    }

    fn site_form(&self, name: &str) -> Result<&SiteForm> {
        self.forms
            .get(name)
            .ok_or_else(|| SiteError::UnknownForm(name.to_string()))
    }

    /// Handle a form submission
    pub fn submit(&self, form: &str, data: &FormData) -> Notice {
        let site_form = match self.site_form(form) {
            Ok(f) => f,
            Err(e) => return Notice::error(e.to_string()),
        };
        let messages = &site_form.config.messages;

        match site_form.capture.capture(data) {
            Ok(collection) => {
                let count = site_form
                    .capture
                    .submission_count()
                    .map_or_else(|| collection.len().to_string(), |c| c.to_string());
                let values = collection
                    .last()
                    .into_iter()
                    .flat_map(|r| r.fields.iter())
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .chain([("count", count.as_str())]);
                Notice::success(render_template(&messages.success, values))
            }
            Err(CaptureError::Validation { field }) => {
                Notice::warning(render_template(&messages.invalid, [("field", field.as_str())]))
            }
            Err(e @ CaptureError::StorageUnavailable { .. }) => {
                tracing::warn!(form, error = %e, "submission not saved");
                Notice::error(
                    "Your submission could not be saved because local storage is unavailable.",
                )
            }
            Err(e @ CaptureError::CorruptCollection { .. }) => {
                tracing::error!(form, error = %e, "stored submissions unreadable");
                Notice::error("Saved submissions could not be read, so nothing was added.")
            }
        }
    }

    /// Render a form's collection as CSV
    ///
    /// # Errors
    /// Returns [`SiteError::UnknownForm`] or the capture error.
    pub fn export_csv(&self, form: &str) -> Result<CsvExport> {
        Ok(self.form(form)?.export()?)
    }

    /// Favourites register
    #[inline]
    #[must_use]
    pub fn favorites(&self) -> &SelectionRegister<u32, Member> {
        &self.favorites
    }

    /// Roster behind the favourites
    #[inline]
    #[must_use]
    pub fn roster(&self) -> &Roster {
        self.favorites.catalog()
    }

    /// Toggle a member as favourite, reporting the outcome
    ///
    /// # Errors
    /// Returns the selection error.
    pub fn select_favorite(&self, id: u32) -> Result<SelectOutcome<u32>> {
        Ok(self.favorites.select(id)?)
    }

    /// Handle a favourite button click
    pub fn toggle_favorite(&self, id: u32) -> Notice {
        match self.select_favorite(id) {
            Ok(outcome) => {
                let name = self.roster().get(&id).map_or("", |m| m.name.as_str());
                if outcome.toggled_off() {
                    Notice::info(format!("Removed {name} from favourites."))
                } else {
                    Notice::success(format!("Saved {name} as your favourite."))
                }
            }
            Err(SiteError::Select(SelectError::NotFound { .. })) => {
                Notice::warning("Favourite player not found.")
            }
            Err(e) if e.is_storage_unavailable() => {
                tracing::warn!(id, error = %e, "favourite not saved");
                Notice::error(
                    "Your favourite could not be saved because local storage is unavailable.",
                )
            }
            Err(e) => {
                tracing::error!(id, error = %e, "favourite not saved");
                Notice::error("Your favourite could not be saved.")
            }
        }
    }

    /// Current favourite for display
    #[must_use]
    pub fn favorite_summary(&self) -> FavoriteSummary<'_> {
        match self.favorites.current() {
            None => FavoriteSummary::Unset,
            Some(id) => self
                .roster()
                .get(&id)
                .map_or(FavoriteSummary::Missing(id), FavoriteSummary::Member),
        }
    }

    /// Avatar loader
    #[inline]
    #[must_use]
    pub fn avatars(&self) -> &AvatarLoader {
        &self.avatars
    }

    /// Register a roster member's avatar slot
    pub fn register_avatar(&self, member: &Member) -> Registration {
        self.avatars
            .register(Some(&member.initials), Some(&member.color))
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("forms", &self.forms.keys().collect::<Vec<_>>())
            .field("favorites", &self.favorites)
            .field("avatars", &self.avatars)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use sitekit_store::{LocalStore, MemoryStore};

    fn site() -> Site {
        Site::new(SiteConfig::default(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn contact_submission_messages() {
        let site = site();
        let missing = site.submit("contact", &FormData::from_pairs([("name", "Amy")]));
        assert_eq!(
            missing,
            Notice::warning("Please fill in your name, email and message.")
        );

        let saved = site.submit(
            "contact",
            &FormData::from_pairs([("name", "Amy"), ("email", "a@x.com"), ("message", "Hi")]),
        );
        assert_eq!(saved, Notice::success("Thanks, your message has been saved locally."));
    }

    #[test]
    fn unknown_form_is_an_error_notice() {
        let notice = site().submit("guestbook", &FormData::new());
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "unknown form 'guestbook'");
    }

    #[test]
    fn favourite_toggle_messages() {
        let site = site();
        assert_eq!(site.toggle_favorite(7).message, "Saved Tawanda Moyo as your favourite.");
        assert_eq!(site.toggle_favorite(7).message, "Removed Tawanda Moyo from favourites.");
        assert_eq!(site.toggle_favorite(99), Notice::warning("Favourite player not found."));
    }

    #[test]
    fn favourite_summary_states() {
        let site = site();
        assert_eq!(site.favorite_summary(), FavoriteSummary::Unset);

        let _ = site.toggle_favorite(4);
        assert_eq!(
            site.favorite_summary().message(),
            "Brian Ncube (Midfield, #4)"
        );

        site.store().set("favoritePlayer", "23").unwrap();
        assert_eq!(site.favorite_summary(), FavoriteSummary::Missing(23));
        assert_eq!(site.favorite_summary().message(), "Favourite player not found.");
    }

    #[test]
    fn member_avatar_is_deferred() {
        let site = site();
        let member = site.roster().get(&9).unwrap().clone();

        let id = site.register_avatar(&member).pending_id().unwrap();
        assert_eq!(site.avatars().cache().entry_count(), 0);
        assert!(site.avatars().notify_visible(id).is_some());
    }
}
