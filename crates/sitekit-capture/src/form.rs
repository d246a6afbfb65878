//! Raw submitted form data and per-form capture settings

use crate::column::{field_key, ColumnSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Capture settings for one form
///
/// Everything that used to be a hard-coded literal in each site's script:
/// where records go, what must be filled in, and how they export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FormSpec {
    /// Store key namespacing this form's records
    pub storage_key: String,
    /// Fields that must be non-blank, checked in this order
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Export column labels
    pub columns: ColumnSpec,
    /// Store key of a persisted submission counter, if the form keeps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_key: Option<String>,
}

impl FormSpec {
    /// Create spec with storage key and export columns
    #[must_use]
    pub fn new<I, S>(storage_key: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            storage_key: storage_key.into(),
            required_fields: Vec::new(),
            columns: ColumnSpec::new(columns),
            count_key: None,
        }
    }

    /// With required fields
    #[must_use]
    pub fn with_required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// With a persisted submission counter
    #[must_use]
    pub fn with_count_key(mut self, key: impl Into<String>) -> Self {
        self.count_key = Some(key.into());
        self
    }
}

/// Submitted name/value pairs in submission order
///
/// A name may appear more than once (multi-selects, repeated query
/// parameters); [`FormData::resolve`] decides how repeats collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Create empty form data
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from name/value pairs
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` query string
    ///
    /// A leading `?` is ignored, so `location.search` can be passed as is.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Append one pair
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// With one more pair
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// First raw value submitted under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every raw value submitted under `name`, in order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Raw pairs in submission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of submitted pairs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if nothing was submitted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Normalize into record fields
    ///
    /// Names go through [`field_key`], values are trimmed. When a key repeats,
    /// its non-blank values are joined with `", "` in submission order; a key
    /// whose every value is blank maps to `""`. Keys keep first-seen order.
    #[must_use]
    pub fn resolve(&self) -> IndexMap<String, String> {
        let mut fields: IndexMap<String, String> = IndexMap::with_capacity(self.pairs.len());

        for (name, value) in &self.pairs {
            let value = value.trim();
            let slot = fields.entry(field_key(name)).or_default();
            if value.is_empty() {
                continue;
            }
            if !slot.is_empty() {
                slot.push_str(", ");
            }
            slot.push_str(value);
        }

        fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
