//! Single-slot persisted selection

use crate::catalog::Catalog;
use crate::error::{Result, SelectError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sitekit_store::{JsonSlot, SharedStore, SlotError};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

/// Store key used when none is configured
pub const DEFAULT_SELECTION_KEY: &str = "favoritePlayer";

/// What a `select` call changed
///
/// `previous` lets callers reset the control that was marked before without
/// a second read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome<I> {
    /// Selection before the call
    pub previous: Option<I>,
    /// Selection after the call
    pub current: Option<I>,
}

impl<I: PartialEq> SelectOutcome<I> {
    /// Check if the call cleared the selection (same id selected twice)
    #[inline]
    #[must_use]
    pub fn toggled_off(&self) -> bool {
        self.current.is_none()
    }

    /// Check if a different id was selected before
    #[inline]
    #[must_use]
    pub fn superseded(&self) -> bool {
        self.previous.is_some() && self.previous != self.current && self.current.is_some()
    }
}

/// At most one selected catalog id, persisted under one key
pub struct SelectionRegister<I: Hash + Eq, E> {
    catalog: Arc<Catalog<I, E>>,
    store: SharedStore,
    slot: JsonSlot<I>,
}

impl<I, E> SelectionRegister<I, E>
where
    I: Serialize + DeserializeOwned + FromStr + Clone + Hash + Eq + Display,
{
    /// Create register under [`DEFAULT_SELECTION_KEY`]
    #[must_use]
    pub fn new(catalog: Arc<Catalog<I, E>>, store: SharedStore) -> Self {
        Self::with_key(catalog, store, DEFAULT_SELECTION_KEY)
    }

    /// Create register under a custom key
    #[must_use]
    pub fn with_key(
        catalog: Arc<Catalog<I, E>>,
        store: SharedStore,
        key: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            slot: JsonSlot::new(key),
        }
    }

    /// Catalog the ids are drawn from
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog<I, E> {
        &self.catalog
    }

    /// Store key holding the selection
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        self.slot.key()
    }

    /// Read the stored id
    ///
    /// A value that is not JSON for `I` is parsed as plain text (`"07"`,
    /// `" 7 "`); anything else reads as no selection.
    fn stored(&self) -> Result<Option<I>> {
        match self.slot.load(&*self.store) {
            Ok(id) => Ok(id),
            Err(SlotError::Store(e)) => Err(SelectError::StorageUnavailable(e)),
            Err(e) => {
                let raw = self.store.get(self.key())?;
                match raw.as_deref().and_then(|r| r.trim().parse::<I>().ok()) {
                    Some(id) => {
                        tracing::debug!(key = self.key(), %id, "read plain-text selection");
                        Ok(Some(id))
                    }
                    None => {
                        tracing::warn!(
                            key = self.key(),
                            error = %e,
                            "discarding unreadable selection"
                        );
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Select `id`, or clear the selection if `id` is already selected
    ///
    /// Performs exactly one store write.
    ///
    /// # Errors
    /// - [`SelectError::NotFound`] if `id` is not in the catalog (nothing is
    ///   written)
    /// - [`SelectError::StorageUnavailable`] if the store fails
    pub fn select(&self, id: I) -> Result<SelectOutcome<I>> {
        if !self.catalog.contains(&id) {
            tracing::debug!(key = self.key(), %id, "ignoring selection of unknown id");
            return Err(SelectError::not_found(&id));
        }

        let previous = self.stored()?;

        if previous.as_ref() == Some(&id) {
            self.store.remove(self.key())?;
            tracing::info!(key = self.key(), %id, "selection cleared");
            return Ok(SelectOutcome {
                previous,
                current: None,
            });
        }

        self.slot.save(&*self.store, &id).map_err(|e| match e {
            SlotError::Store(e) => SelectError::StorageUnavailable(e),
            other => SelectError::Encode(other),
        })?;
        tracing::info!(key = self.key(), %id, "selection stored");

        Ok(SelectOutcome {
            previous,
            current: Some(id),
        })
    }

    /// Clear the selection; `true` if something was removed
    ///
    /// # Errors
    /// Returns [`SelectError::StorageUnavailable`] if the store fails.
    pub fn deselect(&self) -> Result<bool> {
        if self.store.get(self.key())?.is_none() {
            return Ok(false);
        }
        self.store.remove(self.key())?;
        tracing::info!(key = self.key(), "selection cleared");
        Ok(true)
    }

    /// The selected id, even if the catalog no longer lists it
    ///
    /// An unavailable store reads as no selection.
    #[must_use]
    pub fn current(&self) -> Option<I> {
        match self.stored() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(
                    key = self.key(),
                    error = %e,
                    "selection unavailable, treating as none"
                );
                None
            }
        }
    }

    /// Check if `id` is the selected id
    #[must_use]
    pub fn is_selected(&self, id: &I) -> bool {
        self.current().as_ref() == Some(id)
    }

    /// The selected id with its catalog entry
    ///
    /// # Errors
    /// Returns [`SelectError::NotFound`] if the stored id has no catalog
    /// entry.
    pub fn current_entry(&self) -> Result<Option<(I, &E)>> {
        let Some(id) = self.current() else {
            return Ok(None);
        };
        let entry = self.catalog.resolve(&id)?;
        Ok(Some((id, entry)))
    }
}

impl<I: Hash + Eq + Debug, E> Debug for SelectionRegister<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionRegister")
            .field("key", &self.slot.key())
            .field("catalog_len", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_store::{LocalStore, MemoryStore};

    fn register() -> (Arc<MemoryStore>, SelectionRegister<u32, &'static str>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::new([
            (7, "Tawanda Moyo"),
            (4, "Brian Ncube"),
            (1, "Peter Mlambo"),
        ]));
        (store.clone(), SelectionRegister::new(catalog, store))
    }

    #[test]
    fn nothing_selected_initially() {
        let (_, register) = register();
        assert_eq!(register.current(), None);
        assert!(!register.is_selected(&7));
    }

    #[test]
    fn selecting_twice_toggles_off() {
        let (store, register) = register();
        register.select(7).unwrap();
        let outcome = register.select(7).unwrap();

        assert!(outcome.toggled_off());
        assert_eq!(outcome.previous, Some(7));
        assert_eq!(register.current(), None);
        assert_eq!(store.get(DEFAULT_SELECTION_KEY).unwrap(), None);
    }

    #[test]
    fn new_selection_supersedes_old() {
        let (_, register) = register();
        let first = register.select(7).unwrap();
        let second = register.select(4).unwrap();

        assert_eq!(first.previous, None);
        assert_eq!(second.previous, Some(7));
        assert!(second.superseded());
        assert_eq!(register.current(), Some(4));
        assert!(register.is_selected(&4));
        assert!(!register.is_selected(&7));
    }

    #[test]
    fn unknown_id_is_rejected_without_write() {
        let (store, register) = register();
        register.select(4).unwrap();

        let err = register.select(99).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.get(DEFAULT_SELECTION_KEY).unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn deselect_reports_removal() {
        let (_, register) = register();
        assert!(!register.deselect().unwrap());

        register.select(1).unwrap();
        assert!(register.deselect().unwrap());
        assert_eq!(register.current(), None);
    }

    #[test]
    fn stale_id_is_returned_raw_but_not_resolved() {
        let (store, register) = register();
        store.set(DEFAULT_SELECTION_KEY, "11").unwrap();

        assert_eq!(register.current(), Some(11));
        assert!(register.current_entry().unwrap_err().is_not_found());
    }

    #[test]
    fn current_entry_resolves_catalog() {
        let (_, register) = register();
        register.select(7).unwrap();

        let (id, name) = register.current_entry().unwrap().unwrap();
        assert_eq!(id, 7);
        assert_eq!(*name, "Tawanda Moyo");
    }

    #[test]
    fn garbage_value_reads_as_none_and_is_replaced() {
        let (store, register) = register();
        store.set(DEFAULT_SELECTION_KEY, "not-json").unwrap();

        assert_eq!(register.current(), None);
        let outcome = register.select(4).unwrap();
        assert_eq!(outcome.previous, None);
        assert_eq!(register.current(), Some(4));
    }

    #[test]
    fn plain_text_legacy_values_are_parsed() {
        let (store, register) = register();

        store.set(DEFAULT_SELECTION_KEY, "07").unwrap();
        assert_eq!(register.current(), Some(7));

        store.set(DEFAULT_SELECTION_KEY, " 4 ").unwrap();
        assert_eq!(register.current(), Some(4));
        assert!(register.select(4).unwrap().toggled_off());
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize)]
    struct Unencodable(u32);

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(
            &self,
            _: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refuses to encode"))
        }
    }

    impl FromStr for Unencodable {
        type Err = std::num::ParseIntError;

        fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
            s.parse().map(Self)
        }
    }

    impl Display for Unencodable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[test]
    fn encode_failure_is_reported_as_encode() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::new([(Unencodable(3), "Kundai")]));
        let register = SelectionRegister::new(catalog, store.clone());

        let err = register.select(Unencodable(3)).unwrap_err();
        assert!(matches!(err, SelectError::Encode(_)));
        assert_eq!(store.get(DEFAULT_SELECTION_KEY).unwrap(), None);
    }

    #[test]
    fn disabled_store_degrades_reads_and_fails_writes() {
        let catalog = Arc::new(Catalog::new([(7_u32, "Tawanda Moyo")]));
        let register = SelectionRegister::new(catalog, Arc::new(MemoryStore::disabled()));

        assert_eq!(register.current(), None);
        assert!(matches!(
            register.select(7),
            Err(SelectError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn custom_key() {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(Catalog::new([("kruger".to_string(), "Kruger Lodge")]));
        let register = SelectionRegister::with_key(catalog, store.clone(), "preferredLodge");

        register.select("kruger".to_string()).unwrap();
        assert_eq!(
            store.get("preferredLodge").unwrap().as_deref(),
            Some("\"kruger\"")
        );
    }
}
