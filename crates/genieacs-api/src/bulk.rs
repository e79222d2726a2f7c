// Bulk import/export of JSON-array files
//
// Export writes what the server returns, verbatim, as a pretty-printed
// JSON array. Import reads such a file back, strips the identifying key
// from each record and re-submits the remainder. A file that isn't a JSON
// array fails before any request goes out; after that, each record stands
// on its own and failures are collected in an `ImportReport`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::client::GenieClient;
use crate::collections::Collection;
use crate::error::Error;
use crate::models::Task;

/// Key identifying presets, objects and provisions.
pub const ID_KEY: &str = "_id";

/// Key identifying the target device of an exported task.
pub const DEVICE_KEY: &str = "device";

/// Server-managed task fields dropped before re-queueing.
const TASK_SERVER_FIELDS: [&str; 4] = ["_id", "timestamp", "retries", "fault"];

// ── Report ───────────────────────────────────────────────────────────

/// A record that could not be imported.
#[derive(Debug)]
pub struct ImportFailure {
    /// Position of the record in the file.
    pub index: usize,
    /// The record's key, if it had one.
    pub key: Option<String>,
    pub error: Error,
}

/// Outcome of importing one file.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Keys of successfully submitted records, in file order.
    pub imported: Vec<String>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.imported.len() + self.failures.len()
    }

    /// `true` if every record was submitted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, index: usize, key: Option<String>, result: Result<(), Error>) {
        match (result, key) {
            (Ok(()), Some(key)) => self.imported.push(key),
            (Ok(()), None) => self.imported.push(index.to_string()),
            (Err(error), key) => {
                warn!(index, key = key.as_deref().unwrap_or("-"), %error, "record import failed");
                self.failures.push(ImportFailure { index, key, error });
            }
        }
    }
}

// ── File helpers ─────────────────────────────────────────────────────

/// Write `records` to `path` as a pretty-printed JSON array.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|e| Error::malformed(format!("failed to serialize records: {e}")))?;
    writer.write_all(b"\n").map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Read a JSON array from `path`.
///
/// Fails with [`Error::MalformedData`] if the content isn't a JSON array.
pub fn read_records(path: &Path) -> Result<Vec<Value>, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| {
        Error::malformed(format!(
            "{} is not a JSON array of records: {e}",
            path.display()
        ))
    })
}

/// Split the string field `key` off `record`, returning it and the rest.
pub fn take_key(record: Value, key: &str) -> Result<(String, Map<String, Value>), Error> {
    let Value::Object(mut map) = record else {
        return Err(Error::malformed("record is not a JSON object"));
    };
    match map.remove(key) {
        Some(Value::String(k)) => Ok((k, map)),
        Some(other) => Err(Error::malformed(format!(
            "record key '{key}' must be a string, got {other}"
        ))),
        None => Err(Error::malformed(format!("record is missing '{key}'"))),
    }
}

// ── Collections ──────────────────────────────────────────────────────

impl Collection<'_> {
    /// Fetch every document and write them to `path`.
    ///
    /// Returns the documents so callers can act on them without
    /// re-reading the file.
    pub fn export(&self, path: &Path) -> Result<Vec<Value>, Error> {
        let docs = self.list()?;
        write_records(path, &docs)?;
        info!(collection = %self.kind(), count = docs.len(), path = %path.display(), "exported");
        Ok(docs)
    }

    /// Re-create every document stored in `path`.
    ///
    /// Each record's `_id` names the document and is stripped from the
    /// body before the PUT.
    pub fn import(&self, path: &Path) -> Result<ImportReport, Error> {
        let records = read_records(path)?;
        let mut report = ImportReport::default();

        for (index, record) in records.into_iter().enumerate() {
            match take_key(record, ID_KEY) {
                Ok((name, body)) => {
                    let result = self.put(&name, Value::Object(body));
                    report.record(index, Some(name), result);
                }
                Err(e) => report.record(index, None, Err(e)),
            }
        }

        info!(
            collection = %self.kind(),
            imported = report.imported.len(),
            failed = report.failures.len(),
            "import finished"
        );
        Ok(report)
    }
}

// ── Tasks ────────────────────────────────────────────────────────────

impl GenieClient {
    /// Fetch a device's pending tasks and write them to `path`.
    pub fn export_tasks(&self, device_id: &str, path: &Path) -> Result<Vec<Task>, Error> {
        let tasks = self.tasks_for_device(device_id)?;
        write_records(path, &tasks)?;
        info!(device_id, count = tasks.len(), path = %path.display(), "exported tasks");
        Ok(tasks)
    }

    /// Re-queue every task stored in `path` on its `device`.
    ///
    /// Server-managed fields (`_id`, `timestamp`, `retries`, `fault`) are
    /// dropped along with `device`.
    pub fn import_tasks(&self, path: &Path, connection_request: bool) -> Result<ImportReport, Error> {
        let records = read_records(path)?;
        let mut report = ImportReport::default();

        for (index, record) in records.into_iter().enumerate() {
            match take_key(record, DEVICE_KEY) {
                Ok((device, mut body)) => {
                    for field in TASK_SERVER_FIELDS {
                        body.remove(field);
                    }
                    let result = self.post_raw_task(&device, &body, connection_request);
                    report.record(index, Some(device), result);
                }
                Err(e) => report.record(index, None, Err(e)),
            }
        }

        info!(
            imported = report.imported.len(),
            failed = report.failures.len(),
            "task import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn take_key_strips_identifier() {
        let (key, rest) = take_key(json!({"_id": "Tagging", "weight": 0}), ID_KEY).unwrap();
        assert_eq!(key, "Tagging");
        assert_eq!(Value::Object(rest), json!({"weight": 0}));
    }

    #[test]
    fn take_key_rejects_missing_or_non_string() {
        assert!(matches!(
            take_key(json!({"weight": 0}), ID_KEY),
            Err(Error::MalformedData { .. })
        ));
        assert!(take_key(json!({"_id": 7}), ID_KEY).is_err());
        assert!(take_key(json!("Tagging"), ID_KEY).is_err());
    }

    #[test]
    fn write_then_read_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        let records = vec![json!({"_id": "a", "weight": 1}), json!({"_id": "b", "weight": 2})];

        write_records(&path, &records).unwrap();
        assert_eq!(read_records(&path).unwrap(), records);
    }

    #[test]
    fn read_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"_id": "a"}"#).unwrap();
        assert!(matches!(read_records(&path), Err(Error::MalformedData { .. })));

        std::fs::write(&path, "[{").unwrap();
        assert!(matches!(read_records(&path), Err(Error::MalformedData { .. })));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_records(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn report_counts_both_outcomes() {
        let mut report = ImportReport::default();
        report.record(0, Some("a".into()), Ok(()));
        report.record(1, None, Err(Error::malformed("no _id")));
        assert_eq!(report.total(), 2);
        assert_eq!(report.imported, ["a"]);
        assert!(!report.is_complete());
        assert_eq!(report.failures[0].index, 1);
    }
}
