//! Export columns and the label → field key transform

use serde::{Deserialize, Serialize};

/// Canonical field key for a column label or form field name
///
/// Trims surrounding whitespace and lower-cases; punctuation is kept, so
/// `Owner-name` and `owner-name` address the same field while `owner_name`
/// does not.
#[must_use]
pub fn field_key(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Ordered export column labels
///
/// Output columns always follow this order, never the order in which a
/// record's fields were captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSpec(Vec<String>);

impl ColumnSpec {
    /// Create spec from labels
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Labels in output order
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Field keys in output order
    pub fn field_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.0.iter().map(|label| field_key(label))
    }

    /// Number of columns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no columns
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
