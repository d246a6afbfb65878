//! Deterministic CSV rendering of record collections
//!
//! Header cells are the column labels verbatim; every data cell is quoted.
//! Rows are separated by a single `\n` and the output has no trailing
//! newline.

use crate::column::ColumnSpec;
use crate::record::{Record, RecordCollection};
use std::path::{Path, PathBuf};

/// Quote one cell, doubling embedded quotes
#[must_use]
pub fn quote_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Render records under `columns`
///
/// A field the record does not have renders as `""`; the row is never cut
/// short. Pure: same inputs, same bytes.
#[must_use]
pub fn to_csv<'a, I>(records: I, columns: &ColumnSpec) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let keys: Vec<String> = columns.field_keys().collect();
    let mut rows = vec![columns.labels().join(",")];

    for record in records {
        let row = keys
            .iter()
            .map(|key| quote_cell(record.value(key).as_deref().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(",");
        rows.push(row);
    }

    rows.join("\n")
}

/// A client-side CSV download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name, `<storageKey>.csv`
    pub file_name: String,
    /// Always [`CsvExport::MIME_TYPE`]
    pub mime_type: &'static str,
    /// Rendered CSV
    pub content: String,
}

impl CsvExport {
    /// MIME type offered with the download
    pub const MIME_TYPE: &'static str = "text/csv";

    /// Render a collection for download
    #[must_use]
    pub fn new(storage_key: &str, collection: &RecordCollection, columns: &ColumnSpec) -> Self {
        Self {
            file_name: format!("{storage_key}.csv"),
            mime_type: Self::MIME_TYPE,
            content: to_csv(collection, columns),
        }
    }

    /// Write the export into `dir` under its file name
    ///
    /// # Errors
    /// Returns the I/O error if the file cannot be written.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let fields: IndexMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Record::new(fields, Utc::now())
    }

    #[test]
    fn quote_doubles_embedded_quotes() {
        assert_eq!(quote_cell(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(quote_cell(""), r#""""#);
    }

    #[test]
    fn contact_row_keeps_comma_inside_quotes() {
        let columns = ColumnSpec::new(["Name", "Email", "Message"]);
        let records = [record(&[
            ("name", "Amy"),
            ("email", "a@x.com"),
            ("message", "Hi, there"),
        ])];

        assert_eq!(
            to_csv(&records, &columns),
            "Name,Email,Message\n\"Amy\",\"a@x.com\",\"Hi, there\""
        );
    }

    #[test]
    fn column_order_beats_field_order() {
        let columns = ColumnSpec::new(["Message", "Name"]);
        let records = [record(&[("name", "Amy"), ("message", "Hello")])];

        assert_eq!(
            to_csv(&records, &columns),
            "Message,Name\n\"Hello\",\"Amy\""
        );
    }

    #[test]
    fn missing_fields_render_empty() {
        let columns = ColumnSpec::new(["Name", "Phone", "Email"]);
        let records = [record(&[("name", "Amy"), ("email", "a@x.com")])];

        assert_eq!(
            to_csv(&records, &columns),
            "Name,Phone,Email\n\"Amy\",\"\",\"a@x.com\""
        );
    }

    #[test]
    fn newlines_stay_inside_the_cell() {
        let columns = ColumnSpec::new(["Message"]);
        let records = [record(&[("message", "line one\nline \"two\"")])];

        assert_eq!(
            to_csv(&records, &columns),
            "Message\n\"line one\nline \"\"two\"\"\""
        );
    }

    #[test]
    fn header_casing_variants_export_identically() {
        let records = [record(&[("owner-name", "Thandi")])];
        let upper = to_csv(&records, &ColumnSpec::new(["Owner-name"]));
        let lower = to_csv(&records, &ColumnSpec::new(["owner-name"]));

        assert_eq!(upper.lines().nth(1), lower.lines().nth(1));
        assert_eq!(upper.lines().nth(1), Some("\"Thandi\""));
    }

    #[test]
    fn empty_collection_is_header_only() {
        let columns = ColumnSpec::new(["Name", "Email"]);
        let export = CsvExport::new("clubContacts", &RecordCollection::new(), &columns);

        assert_eq!(export.content, "Name,Email");
        assert_eq!(export.file_name, "clubContacts.csv");
        assert_eq!(export.mime_type, "text/csv");
    }

    #[test]
    fn rendering_is_deterministic() {
        let columns = ColumnSpec::new(["Name", "Id"]);
        let records = [record(&[("name", "Amy")]), record(&[("name", "Ben")])];

        assert_eq!(to_csv(&records, &columns), to_csv(&records, &columns));
    }

    #[test]
    fn write_to_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let columns = ColumnSpec::new(["Name"]);
        let export = CsvExport::new("lodgeBookings", &RecordCollection::new(), &columns);

        let path = export.write_to(dir.path()).unwrap();
        assert!(path.ends_with("lodgeBookings.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Name");
    }
}
