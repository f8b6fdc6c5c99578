//! In-memory task collection backed by the task file.
//!
//! [`TaskStore`] owns every [`Task`] for the lifetime of a run. Callers load
//! it once, run CRUD/filter/sort operations against it, and decide when to
//! [`TaskStore::save`] it back. All field validation happens here; callers
//! may pass raw user input straight through.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::storage::{SkippedRecord, TaskFile};
use crate::task::{name_key, DueDate, Priority, Task, TaskRecord};

/// Key selecting the order applied by [`TaskStore::sort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive name, ascending
    Name,
    /// High, then Medium, then Low
    Priority,
    /// Earliest due date first
    DueDate,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Priority => "priority",
            SortKey::DueDate => "due_date",
        }
    }

    fn compare(&self, left: &Task, right: &Task) -> Ordering {
        match self {
            SortKey::Name => left.name().to_lowercase().cmp(&right.name().to_lowercase()),
            SortKey::Priority => left.priority().rank().cmp(&right.priority().rank()),
            SortKey::DueDate => left.due_date().cmp(&right.due_date()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "name" => Ok(SortKey::Name),
            "priority" => Ok(SortKey::Priority),
            "due_date" | "due" => Ok(SortKey::DueDate),
            other => Err(Error::Validation(format!(
                "unknown sort key '{other}' (expected name, priority or due_date)"
            ))),
        }
    }
}

/// Criteria for [`TaskStore::filter`]; every supplied criterion must match.
///
/// Priority and due date compare against the stored text exactly, so a value
/// that no task carries (`high`, `2025-1-5`) matches nothing rather than
/// failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    name: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring of the task name. Blank text matches everything.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = criterion(name.into()).map(|name| name.to_lowercase());
        self
    }

    /// Exact priority text, e.g. `High`. Blank text matches everything.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = criterion(priority.into());
        self
    }

    /// Exact `YYYY-MM-DD` text. Blank text matches everything.
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = criterion(due_date.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.priority.is_none() && self.due_date.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(name) = &self.name {
            if !task.name().to_lowercase().contains(name.as_str()) {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if task.priority().as_str() != priority.as_str() {
                return false;
            }
        }
        if let Some(due_date) = &self.due_date {
            if task.due_date().to_string() != *due_date {
                return false;
            }
        }
        true
    }
}

fn criterion(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Field changes for [`TaskStore::update`]; `None` or blank keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        supplied(&self.description).is_none()
            && supplied(&self.priority).is_none()
            && supplied(&self.due_date).is_none()
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Outcome of [`TaskStore::load`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Whether the task file existed
    pub found: bool,
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn warnings(&self) -> Vec<String> {
        self.skipped.iter().map(SkippedRecord::warning).collect()
    }
}

/// Outcome of [`TaskStore::import`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// The task collection
#[derive(Debug, Clone)]
pub struct TaskStore {
    file: TaskFile,
    tasks: Vec<Task>,
    /// Raw entries skipped by the last load, written back by `save`
    retained: Vec<serde_json::Value>,
    loaded: bool,
}

impl TaskStore {
    /// An empty store bound to `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_file(TaskFile::new(path))
    }

    pub fn with_file(file: TaskFile) -> Self {
        Self {
            file,
            tasks: Vec::new(),
            retained: Vec::new(),
            loaded: false,
        }
    }

    /// Bind to `path` and load it.
    ///
    /// A corrupt file is returned as an error; use [`new`](Self::new) and
    /// [`load`](Self::load) to keep the (empty) store after that error.
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, LoadReport)> {
        let mut store = Self::new(path);
        let report = store.load()?;
        Ok((store, report))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replace the in-memory tasks with the contents of the task file.
    ///
    /// Records that cannot become tasks are skipped and reported; their raw
    /// entries are kept and written back by [`save`](Self::save).
    /// A missing file yields an empty store. On [`Error::CorruptStore`] the
    /// store is left empty and loaded, so callers may continue with it. Any
    /// other read failure leaves the current tasks untouched.
    pub fn load(&mut self) -> Result<LoadReport> {
        let set = match self.file.read_records() {
            Ok(Some(set)) => set,
            Ok(None) => {
                tracing::debug!(path = %self.path().display(), "no task file; starting empty");
                self.reset();
                return Ok(LoadReport::default());
            }
            Err(err @ Error::CorruptStore { .. }) => {
                tracing::warn!(path = %self.path().display(), error = %err, "task file is corrupt; starting empty");
                self.reset();
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        self.reset();

        let mut report = LoadReport {
            found: true,
            loaded: 0,
            skipped: set.skipped,
        };
        let mut seen = HashSet::new();
        for (index, record) in set.records {
            let task = match Task::try_from(record.clone()) {
                Ok(task) => task,
                Err(err) => {
                    report.skip(index, err.to_string(), &record);
                    continue;
                }
            };
            if !seen.insert(task.name_key()) {
                let reason = format!("duplicate task name '{}'", task.name());
                report.skip(index, reason, &record);
                continue;
            }
            self.tasks.push(task);
        }
        report.skipped.sort_by_key(|skipped| skipped.index);
        report.loaded = self.tasks.len();
        self.retained = report
            .skipped
            .iter()
            .filter_map(|skipped| skipped.raw.clone())
            .collect();

        tracing::debug!(
            path = %self.path().display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "loaded tasks"
        );
        Ok(report)
    }

    /// Write every task to the task file, replacing it atomically.
    ///
    /// Entries skipped by the last load follow the tasks unchanged.
    pub fn save(&self) -> Result<()> {
        let records: Vec<TaskRecord> = self.tasks.iter().map(Task::to_record).collect();
        self.file.write_records(&records, &self.retained)?;
        tracing::debug!(
            path = %self.path().display(),
            tasks = records.len(),
            retained = self.retained.len(),
            "saved tasks"
        );
        Ok(())
    }

    /// Add a task. Names are unique regardless of case.
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        priority: &str,
        due_date: &str,
    ) -> Result<&Task> {
        if let Some(existing) = self.find_ignore_case(name) {
            return Err(Error::DuplicateName(existing.name().to_string()));
        }
        let task = Task::new(name, description, priority, due_date)?;
        tracing::debug!(name = task.name(), "created task");
        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    pub fn read_all(&self) -> &[Task] {
        &self.tasks
    }

    /// Exact, case-sensitive lookup by name
    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name() == name)
    }

    /// Lookup ignoring case, as used by the uniqueness check
    pub fn find_ignore_case(&self, name: &str) -> Option<&Task> {
        let key = name_key(name);
        self.tasks.iter().find(|task| task.name_key() == key)
    }

    /// Change description, priority and/or due date of the named task.
    ///
    /// Every supplied field is validated before any is applied.
    pub fn update(&mut self, name: &str, changes: TaskUpdate) -> Result<&Task> {
        let index = self.position(name)?;

        let description = changes
            .description
            .filter(|description| !description.trim().is_empty());
        let priority = supplied(&changes.priority)
            .map(str::parse::<Priority>)
            .transpose()?;
        let due_date = supplied(&changes.due_date)
            .map(str::parse::<DueDate>)
            .transpose()?;

        {
            let task = &mut self.tasks[index];
            if let Some(description) = description {
                task.set_description(description);
            }
            if let Some(priority) = priority {
                task.set_priority(priority);
            }
            if let Some(due_date) = due_date {
                task.set_due_date(due_date);
            }
        }
        let task = &self.tasks[index];
        tracing::debug!(name = task.name(), "updated task");
        Ok(task)
    }

    /// Remove the named task and hand it back
    pub fn delete(&mut self, name: &str) -> Result<Task> {
        let index = self.position(name)?;
        let task = self.tasks.remove(index);
        tracing::debug!(name = task.name(), "deleted task");
        Ok(task)
    }

    /// Tasks matching every criterion of `filter`, in current order
    pub fn filter(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    /// Stable in-place reorder
    pub fn sort(&mut self, key: SortKey) {
        self.tasks.sort_by(|left, right| key.compare(left, right));
    }

    /// Create each record through [`create`](Self::create), skipping the ones it rejects.
    pub fn import<I>(&mut self, records: I) -> ImportReport
    where
        I: IntoIterator<Item = (usize, TaskRecord)>,
    {
        let mut report = ImportReport::default();
        for (index, record) in records {
            match self.create(
                &record.name,
                &record.description,
                &record.priority,
                &record.due_date,
            ) {
                Ok(_) => report.imported += 1,
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping imported task");
                    report.skipped.push(SkippedRecord::new(index, err.to_string()));
                }
            }
        }
        report
    }

    fn reset(&mut self) {
        self.tasks.clear();
        self.retained.clear();
        self.loaded = true;
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.name() == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}

impl LoadReport {
    fn skip(&mut self, index: usize, reason: String, record: &TaskRecord) {
        tracing::warn!(index, reason = %reason, "skipping task record");
        self.skipped.push(SkippedRecord {
            index,
            reason,
            raw: serde_json::to_value(record).ok(),
        });
    }
}
