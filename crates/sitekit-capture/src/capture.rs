//! The capture pipeline: validate → normalize → append
//!
//! Each capture is a synchronous read-modify-write of the whole collection
//! under the form's storage key. Within one process nothing interleaves with
//! it. Across processes (or browser tabs) sharing a store there is no
//! coordination: two writers that load the same snapshot each persist their
//! own extended copy and the later write drops the other's record.

use crate::column::field_key;
use crate::counter::SubmissionCounter;
use crate::csv::CsvExport;
use crate::error::{CaptureError, Result};
use crate::form::{FormData, FormSpec};
use crate::record::{Record, RecordCollection};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sitekit_store::{JsonSlot, LocalStore, SharedStore};

/// Check required fields and normalize a submission
///
/// Fails on the first required field (in spec order) that is missing or
/// blank after trimming.
///
/// # Errors
/// Returns [`CaptureError::Validation`] naming that field.
pub fn validate(spec: &FormSpec, data: &FormData) -> Result<IndexMap<String, String>> {
    let fields = data.resolve();

    for required in &spec.required_fields {
        let key = field_key(required);
        let filled = fields.get(&key).is_some_and(|value| !value.is_empty());
        if !filled {
            tracing::debug!(storage_key = %spec.storage_key, field = %key, "submission rejected");
            return Err(CaptureError::Validation { field: key });
        }
    }

    Ok(fields)
}

/// Validate `data` and append it to the collection under `spec.storage_key`
///
/// Returns the updated collection. Exactly one store write happens on
/// success and none when validation fails.
///
/// # Errors
/// - [`CaptureError::Validation`] if a required field is blank
/// - [`CaptureError::StorageUnavailable`] if the store cannot be read or
///   written; the validated record is attached
/// - [`CaptureError::CorruptCollection`] if the stored collection cannot be
///   decoded (it is not overwritten)
pub fn capture(
    store: &dyn LocalStore,
    spec: &FormSpec,
    data: &FormData,
) -> Result<RecordCollection> {
    capture_at(store, spec, data, Utc::now())
}

pub(crate) fn capture_at(
    store: &dyn LocalStore,
    spec: &FormSpec,
    data: &FormData,
    received_at: DateTime<Utc>,
) -> Result<RecordCollection> {
    let fields = validate(spec, data)?;
    let record = Record::new(fields, received_at);
    let slot: JsonSlot<RecordCollection> = JsonSlot::new(spec.storage_key.as_str());

    let mut collection = match slot.load(store) {
        Ok(existing) => existing.unwrap_or_default(),
        Err(e) => return Err(CaptureError::from_slot(&spec.storage_key, Some(record), e)),
    };

    collection.append(record.clone());
    if let Err(e) = slot.save(store, &collection) {
        tracing::warn!(storage_key = %spec.storage_key, error = %e, "record not persisted");
        return Err(CaptureError::from_slot(&spec.storage_key, Some(record), e));
    }

    tracing::info!(
        storage_key = %spec.storage_key,
        record_id = %record.id,
        records = collection.len(),
        "record captured"
    );
    Ok(collection)
}

/// Capture pipeline bound to one form and one store
#[derive(Clone)]
pub struct RecordCapture {
    spec: FormSpec,
    store: SharedStore,
    counter: Option<SubmissionCounter>,
}

impl RecordCapture {
    /// Create pipeline for `spec` writing into `store`
    #[must_use]
    pub fn new(spec: FormSpec, store: SharedStore) -> Self {
        let counter = spec.count_key.as_deref().map(SubmissionCounter::new);
        Self {
            spec,
            store,
            counter,
        }
    }

    /// Form settings
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    /// Check a submission without writing anything
    ///
    /// # Errors
    /// Returns [`CaptureError::Validation`] for the first blank required
    /// field.
    pub fn validate(&self, data: &FormData) -> Result<IndexMap<String, String>> {
        validate(&self.spec, data)
    }

    /// Validate and append a submission; see [`capture`]
    ///
    /// A configured submission counter is bumped after the append. A counter
    /// failure is logged and does not fail the capture.
    ///
    /// # Errors
    /// Same as [`capture`].
    pub fn capture(&self, data: &FormData) -> Result<RecordCollection> {
        self.capture_at(data, Utc::now())
    }

    /// [`RecordCapture::capture`] with an explicit capture time
    ///
    /// # Errors
    /// Same as [`capture`].
    pub fn capture_at(
        &self,
        data: &FormData,
        received_at: DateTime<Utc>,
    ) -> Result<RecordCollection> {
        let collection = capture_at(&*self.store, &self.spec, data, received_at)?;

        if let Some(counter) = &self.counter {
            match counter.increment(&*self.store) {
                Ok(count) => tracing::debug!(key = counter.key(), count, "submission counted"),
                Err(e) => {
                    tracing::warn!(key = counter.key(), error = %e, "submission count not updated");
                }
            }
        }

        Ok(collection)
    }

    /// Everything captured so far; empty if nothing was stored yet
    ///
    /// # Errors
    /// - [`CaptureError::StorageUnavailable`] if the store cannot be read
    /// - [`CaptureError::CorruptCollection`] if the stored value is invalid
    pub fn collection(&self) -> Result<RecordCollection> {
        let slot: JsonSlot<RecordCollection> = JsonSlot::new(self.spec.storage_key.as_str());
        slot.load(&*self.store)
            .map(Option::unwrap_or_default)
            .map_err(|e| CaptureError::from_slot(&self.spec.storage_key, None, e))
    }

    /// Render the current collection as a CSV download
    ///
    /// Read-only; safe to call any number of times.
    ///
    /// # Errors
    /// Same as [`RecordCapture::collection`].
    pub fn export(&self) -> Result<CsvExport> {
        let collection = self.collection()?;
        Ok(CsvExport::new(
            &self.spec.storage_key,
            &collection,
            &self.spec.columns,
        ))
    }

    /// Persisted submission count, if this form keeps one and it is readable
    #[must_use]
    pub fn submission_count(&self) -> Option<u64> {
        let counter = self.counter.as_ref()?;
        match counter.current(&*self.store) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(key = counter.key(), error = %e, "submission count unreadable");
                None
            }
        }
    }
}

impl std::fmt::Debug for RecordCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCapture")
            .field("spec", &self.spec)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sitekit_store::MemoryStore;
    use std::sync::Arc;

    fn contact_spec() -> FormSpec {
        FormSpec::new("clubContacts", ["Name", "Email", "Subject", "Message"])
            .with_required(["name", "email", "message"])
    }

    fn amy() -> FormData {
        FormData::from_pairs([
            ("name", " Amy "),
            ("email", "a@x.com"),
            ("subject", ""),
            ("message", "Hi, there"),
        ])
    }

    #[test]
    fn first_blank_required_field_is_reported() {
        let data = FormData::from_pairs([("name", "Amy"), ("email", "  "), ("message", "")]);
        let err = validate(&contact_spec(), &data).unwrap_err();
        assert!(matches!(err, CaptureError::Validation { ref field } if field == "email"));
    }

    #[test]
    fn absent_required_field_is_reported() {
        let data = FormData::from_pairs([("name", "Amy"), ("email", "a@x.com")]);
        let err = validate(&contact_spec(), &data).unwrap_err();
        assert!(matches!(err, CaptureError::Validation { ref field } if field == "message"));
    }

    #[test]
    fn required_names_are_case_insensitive() {
        let spec = FormSpec::new("bookings", ["Owner-name"]).with_required(["Owner-name"]);
        let data = FormData::from_pairs([("owner-name", "Thandi")]);
        assert!(validate(&spec, &data).is_ok());
    }

    #[test]
    fn capture_appends_trimmed_record() {
        let store = MemoryStore::new();
        let collection = capture(&store, &contact_spec(), &amy()).unwrap();

        assert_eq!(collection.len(), 1);
        let record = collection.last().unwrap();
        assert_eq!(record.fields["name"], "Amy");
        assert_eq!(record.fields["subject"], "");
    }

    #[test]
    fn failed_validation_writes_nothing() {
        let store = MemoryStore::new();
        let data = FormData::from_pairs([("name", "Amy")]);

        assert!(capture(&store, &contact_spec(), &data).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_collection_is_not_overwritten() {
        let store = MemoryStore::new();
        store.set("clubContacts", "{oops").unwrap();

        let err = capture(&store, &contact_spec(), &amy()).unwrap_err();
        assert!(matches!(err, CaptureError::CorruptCollection { .. }));
        assert_eq!(store.get("clubContacts").unwrap().as_deref(), Some("{oops"));
    }

    #[test]
    fn capture_at_stamps_given_time() {
        let when = Utc.with_ymd_and_hms(2025, 3, 16, 9, 0, 0).unwrap();
        let pipeline = RecordCapture::new(contact_spec(), Arc::new(MemoryStore::new()));

        let collection = pipeline.capture_at(&amy(), when).unwrap();
        assert_eq!(collection.last().unwrap().received_at, when);
    }

    #[test]
    fn counter_tracks_successful_captures_only() {
        let spec = contact_spec().with_count_key("contactCount");
        let pipeline = RecordCapture::new(spec, Arc::new(MemoryStore::new()));

        pipeline.capture(&amy()).unwrap();
        let _ = pipeline.capture(&FormData::new());
        pipeline.capture(&amy()).unwrap();

        assert_eq!(pipeline.submission_count(), Some(2));
    }

    #[test]
    fn no_counter_means_no_count() {
        let pipeline = RecordCapture::new(contact_spec(), Arc::new(MemoryStore::new()));
        assert_eq!(pipeline.submission_count(), None);
    }

    #[test]
    fn export_is_read_only_and_repeatable() {
        let store = Arc::new(MemoryStore::new());
        let pipeline = RecordCapture::new(contact_spec(), store.clone());
        pipeline.capture(&amy()).unwrap();
        let before = store.get("clubContacts").unwrap();

        let first = pipeline.export().unwrap();
        let second = pipeline.export().unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get("clubContacts").unwrap(), before);
        assert_eq!(
            first.content,
            "Name,Email,Subject,Message\n\"Amy\",\"a@x.com\",\"\",\"Hi, there\""
        );
    }
}
