//! Captured records and the append-only collection that holds them

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ulid::Ulid;

/// One accepted form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Generated identifier, sortable by creation time
    pub id: Ulid,
    /// Capture time
    pub received_at: DateTime<Utc>,
    /// Normalized field key → trimmed value, in submission order
    pub fields: IndexMap<String, String>,
}

impl Record {
    /// Create record with a fresh identifier
    #[must_use]
    pub fn new(fields: IndexMap<String, String>, received_at: DateTime<Utc>) -> Self {
        Self {
            id: Ulid::new(),
            received_at,
            fields,
        }
    }

    /// Value addressed by a field key
    ///
    /// Form fields win; otherwise `id` and `receivedat` expose the record
    /// metadata so exports can include them as columns.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.fields.get(key) {
            return Some(Cow::Borrowed(value.as_str()));
        }
        match key {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "receivedat" => Some(Cow::Owned(
                self.received_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            _ => None,
        }
    }
}

/// Records under one storage key, in capture order
///
/// Only ever grows through capture; nothing here mutates or drops an
/// existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection(Vec<Record>);

impl RecordCollection {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, record: Record) {
        self.0.push(record);
    }

    /// Records in capture order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.0
    }

    /// Iterate records in capture order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    /// Most recent record
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Record> {
        self.0.last()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing has been captured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
