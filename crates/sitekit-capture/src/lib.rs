//! sitekit Record Capture
//!
//! Turns a submitted form into a validated [`Record`], appends it to the
//! [`RecordCollection`] stored under the form's storage key, and renders the
//! accumulated collection as CSV on request.
//!
//! # Pipeline
//!
//! ```text
//! FormData ─validate─> fields ─normalize─> Record ─append─> LocalStore
//!                                                                    │
//!                                     CsvExport <──to_csv── RecordCollection
//! ```
//!
//! One parameterized [`RecordCapture`] serves every form; the storage key,
//! required fields and export columns are data in a [`FormSpec`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sitekit_capture::{FormData, FormSpec, RecordCapture};
//! use sitekit_store::MemoryStore;
//!
//! let spec = FormSpec::new("clubContacts", ["Name", "Email", "Message"])
//!     .with_required(["name", "email", "message"]);
//! let capture = RecordCapture::new(spec, Arc::new(MemoryStore::new()));
//!
//! let data = FormData::from_pairs([
//!     ("name", "Amy"),
//!     ("email", "a@x.com"),
//!     ("message", "Hi, there"),
//! ]);
//! let collection = capture.capture(&data).unwrap();
//! assert_eq!(collection.len(), 1);
//!
//! let export = capture.export().unwrap();
//! assert_eq!(export.file_name, "clubContacts.csv");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod capture;
pub mod column;
pub mod counter;
pub mod csv;
pub mod error;
pub mod form;
pub mod record;

pub use capture::{capture, RecordCapture};
pub use column::{field_key, ColumnSpec};
pub use counter::SubmissionCounter;
pub use csv::{quote_cell, to_csv, CsvExport};
pub use error::{CaptureError, Result};
pub use form::{FormData, FormSpec};
pub use record::{Record, RecordCollection};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for capturing and exporting records
    pub use crate::{
        CaptureError, ColumnSpec, CsvExport, FormData, FormSpec, Record, RecordCapture,
        RecordCollection, SubmissionCounter,
    };
}
