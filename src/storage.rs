//! Storage layer for taskman
//!
//! The task file is a single JSON document:
//!
//! ```text
//! [
//!   { "name": "...", "description": "...", "priority": "High", "due_date": "2025-01-05" },
//!   ...
//! ]
//! ```
//!
//! Reading is tolerant per record: an entry that cannot be decoded is skipped
//! and reported, the rest of the file still loads. Skipped entries keep their
//! raw JSON so a later write can put them back. A document that is not a
//! JSON array at all is reported as [`Error::CorruptStore`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::TaskRecord;

/// Default file name of the task file
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// A record left out of a load, with the position it had in the file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: String,
    /// The entry as it appeared in the task file, if it came from one
    #[serde(skip)]
    pub raw: Option<serde_json::Value>,
}

impl SkippedRecord {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Human-readable warning line
    pub fn warning(&self) -> String {
        let kept = if self.raw.is_some() {
            " (kept in the file as written)"
        } else {
            ""
        };
        format!("skipped record #{}: {}{kept}", self.index + 1, self.reason)
    }
}

/// Decoded contents of the task file
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Records that decoded, paired with their position in the file
    pub records: Vec<(usize, TaskRecord)>,
    /// Entries that could not be decoded
    pub skipped: Vec<SkippedRecord>,
}

/// Handle on the persisted task file
#[derive(Debug, Clone)]
pub struct TaskFile {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl TaskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from the file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read_records(&self) -> Result<Option<RecordSet>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                return Err(self.corrupt(format!("not valid UTF-8: {err}")));
            }
            Err(err) => return Err(Error::Io(err)),
        };

        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|err| self.corrupt(err.to_string()))?;
        let entries = match document {
            serde_json::Value::Array(entries) => entries,
            other => {
                return Err(self.corrupt(format!(
                    "expected a list of tasks, found {}",
                    json_type_name(&other)
                )));
            }
        };

        let mut set = RecordSet::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<TaskRecord>(entry.clone()) {
                Ok(record) => set.records.push((index, record)),
                Err(err) => {
                    let skipped = SkippedRecord::new(index, err.to_string()).with_raw(entry);
                    tracing::warn!(
                        path = %self.path.display(),
                        index,
                        reason = %skipped.reason,
                        "skipping unreadable task record"
                    );
                    set.skipped.push(skipped);
                }
            }
        }

        Ok(Some(set))
    }

    /// Replace the file with `records` followed by the `retained` raw
    /// entries, atomically and under the file lock.
    pub fn write_records(
        &self,
        records: &[TaskRecord],
        retained: &[serde_json::Value],
    ) -> Result<()> {
        let mut entries = records
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        entries.extend(retained.iter().cloned());

        let mut json = serde_json::to_string_pretty(&entries)?;
        json.push('\n');
        lock::write_atomic_locked(&self.path, json.as_bytes(), self.lock_timeout_ms)
    }

    fn corrupt(&self, message: String) -> Error {
        Error::CorruptStore {
            path: self.path.clone(),
            message,
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> TaskRecord {
        TaskRecord {
            name: name.to_string(),
            description: String::new(),
            priority: "Medium".to_string(),
            due_date: "2025-04-01".to_string(),
        }
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TaskFile::new(dir.path().join("tasks.json"));
        assert!(file.read_records().expect("read").is_none());
    }

    #[test]
    fn write_then_read_preserves_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TaskFile::new(dir.path().join("tasks.json"));
        file.write_records(&[record("b"), record("a")], &[])
            .expect("write");

        let set = file.read_records().expect("read").expect("present");
        let names: Vec<_> = set.records.iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(set.skipped.is_empty());
    }

    #[test]
    fn non_array_document_is_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"{"name": "x"}"#).expect("write");

        let err = TaskFile::new(&path).read_records().expect_err("corrupt");
        match err {
            Error::CorruptStore { message, .. } => assert!(message.contains("an object")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        fs::write(&path, "[{").expect("write");

        let err = TaskFile::new(&path).read_records().expect_err("corrupt");
        assert!(matches!(err, Error::CorruptStore { .. }));
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        let content = r#"[
            {"name": "ok", "description": "", "priority": "Low", "due_date": "2025-01-01"},
            {"name": "no date", "description": "", "priority": "Low"},
            42
        ]"#;
        fs::write(&path, content).expect("write");

        let set = TaskFile::new(&path)
            .read_records()
            .expect("read")
            .expect("present");
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.skipped.len(), 2);
        assert_eq!(set.skipped[0].index, 1);
        assert!(set.skipped[0].reason.contains("due_date"));
        assert!(set.skipped[0].warning().starts_with("skipped record #2"));
        assert_eq!(set.skipped[1].raw, Some(serde_json::json!(42)));
    }

    #[test]
    fn retained_entries_are_written_after_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = TaskFile::new(dir.path().join("tasks.json"));
        let broken = serde_json::json!({"name": "no date", "priority": "Low"});
        file.write_records(&[record("a")], std::slice::from_ref(&broken))
            .expect("write");

        let set = file.read_records().expect("read").expect("present");
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].index, 1);
        assert_eq!(set.skipped[0].raw, Some(broken));
    }
}
