//! Reader for the older line-based task list.
//!
//! Before the JSON task file, tasks were kept one per line as
//! `name,description,priority,due_date`. Lines without exactly four fields
//! are skipped; values are not validated here, that happens when the
//! records go through [`TaskStore::import`](crate::store::TaskStore::import).

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::storage::{RecordSet, SkippedRecord};
use crate::task::TaskRecord;

/// Default file name used by the line-based format
pub const LEGACY_TASKS_FILE: &str = "tasks.txt";

const FIELD_SEPARATOR: char = ',';
const FIELD_COUNT: usize = 4;

/// Parse the line-based format. Record indices are zero-based line numbers.
pub fn parse_lines(content: &str) -> RecordSet {
    let mut set = RecordSet::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            let skipped = SkippedRecord::new(
                index,
                format!(
                    "expected {FIELD_COUNT} comma-separated fields, found {} (missing or extra information)",
                    fields.len()
                ),
            );
            tracing::warn!(line = index + 1, reason = %skipped.reason, "skipping legacy task line");
            set.skipped.push(skipped);
            continue;
        }

        set.records.push((
            index,
            TaskRecord {
                name: fields[0].to_string(),
                description: fields[1].to_string(),
                priority: fields[2].to_string(),
                due_date: fields[3].to_string(),
            },
        ));
    }

    set
}

/// Read and parse a line-based task file
pub fn read_file(path: impl AsRef<Path>) -> Result<RecordSet> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(parse_lines(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_lines() {
        let set = parse_lines("Pay rent,landlord,High,2025-01-05\nLaundry,,Low,2025-01-07\n");
        assert!(set.skipped.is_empty());
        assert_eq!(set.records.len(), 2);

        let (index, record) = &set.records[1];
        assert_eq!(*index, 1);
        assert_eq!(record.name, "Laundry");
        assert_eq!(record.description, "");
        assert_eq!(record.priority, "Low");
        assert_eq!(record.due_date, "2025-01-07");
    }

    #[test]
    fn skips_lines_with_wrong_field_count() {
        let content = "A,desc,High,2025-01-01\n\nB,High,2025-01-01\nC,a,b,High,2025-01-01\n";
        let set = parse_lines(content);

        assert_eq!(set.records.len(), 1);
        let indices: Vec<usize> = set.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![2, 3]);
        assert!(set.skipped[0].reason.contains("found 3"));
    }

    #[test]
    fn read_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = read_file(dir.path().join(LEGACY_TASKS_FILE));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
