//! Fixed, read-only catalog of selectable entries

use crate::error::{Result, SelectError};
use indexmap::IndexMap;
use std::fmt::Display;
use std::hash::Hash;

/// Immutable id → entry table, built once and shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog<I: Hash + Eq, E> {
    entries: IndexMap<I, E>,
}

impl<I: Hash + Eq, E> Catalog<I, E> {
    /// Build from `(id, entry)` pairs; a repeated id keeps the last entry
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (I, E)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Entry for `id`
    #[inline]
    #[must_use]
    pub fn get(&self, id: &I) -> Option<&E> {
        self.entries.get(id)
    }

    /// Check if `id` is in the catalog
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &I) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&I, &E)> {
        self.entries.iter()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: Hash + Eq + Display, E> Catalog<I, E> {
    /// Entry for `id`, or [`SelectError::NotFound`]
    ///
    /// # Errors
    /// Returns [`SelectError::NotFound`] if the id is unknown.
    pub fn resolve(&self, id: &I) -> Result<&E> {
        self.get(id).ok_or_else(|| SelectError::not_found(id))
    }
}

impl<I: Hash + Eq, E> FromIterator<(I, E)> for Catalog<I, E> {
    fn from_iter<T: IntoIterator<Item = (I, E)>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squad() -> Catalog<u32, &'static str> {
        Catalog::new([(7, "Tawanda Moyo"), (4, "Brian Ncube"), (1, "Peter Mlambo")])
    }

    #[test]
    fn keeps_catalog_order() {
        let ids: Vec<u32> = squad().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [7, 4, 1]);
    }

    #[test]
    fn resolve_known_and_unknown() {
        let catalog = squad();
        assert_eq!(catalog.resolve(&4).unwrap(), &"Brian Ncube");
        assert!(catalog.resolve(&99).unwrap_err().is_not_found());
    }
}
