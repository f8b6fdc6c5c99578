//! Task records for taskman.
//!
//! A [`Task`] is the unit of data: a name, a free-form description, a
//! [`Priority`] and a [`DueDate`]. On disk every task is a [`TaskRecord`],
//! a flat object of four strings.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const TASK_PRIORITIES: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Severity rank used for sorting: High sorts first.
    pub fn rank(&self) -> usize {
        TASK_PRIORITIES
            .iter()
            .position(|entry| entry == self)
            .unwrap_or(TASK_PRIORITIES.len())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("priority cannot be empty".to_string()));
        }
        TASK_PRIORITIES
            .iter()
            .find(|entry| entry.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| {
                Error::Validation(format!(
                    "unknown priority '{trimmed}' (expected High, Medium or Low)"
                ))
            })
    }
}

/// Calendar due date, always rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DUE_DATE_FORMAT))
    }
}

impl FromStr for DueDate {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("due date cannot be empty".to_string()));
        }
        let date = NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT).map_err(|err| {
            Error::Validation(format!(
                "invalid due date '{trimmed}' (expected YYYY-MM-DD): {err}"
            ))
        })?;
        // chrono accepts unpadded fields; only the canonical spelling round-trips.
        let due = DueDate(date);
        if due.to_string() != trimmed {
            return Err(Error::Validation(format!(
                "invalid due date '{trimmed}' (expected YYYY-MM-DD)"
            )));
        }
        Ok(due)
    }
}

/// One to-do item.
///
/// Serializes through [`TaskRecord`], so the JSON form of a task is always
/// the flat four-string object used in the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TaskRecord", try_from = "TaskRecord")]
pub struct Task {
    name: String,
    description: String,
    priority: Priority,
    due_date: DueDate,
}

impl Task {
    /// Build a task from raw field values, validating each one.
    pub fn new(name: &str, description: &str, priority: &str, due_date: &str) -> Result<Self> {
        let name = validate_name(name)?;
        let priority = priority.parse()?;
        let due_date = due_date.parse()?;
        Ok(Self {
            name,
            description: description.to_string(),
            priority,
            due_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> DueDate {
        self.due_date
    }

    /// Plain structured form used for persistence.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            priority: self.priority.to_string(),
            due_date: self.due_date.to_string(),
        }
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub(crate) fn set_due_date(&mut self, due_date: DueDate) {
        self.due_date = due_date;
    }

    /// Case-insensitive key used for the uniqueness invariant.
    pub(crate) fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} (Priority: {}, Due: {})",
            self.name, self.description, self.priority, self.due_date
        )
    }
}

/// A task as it appears in the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub description: String,
    pub priority: String,
    pub due_date: String,
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        TaskRecord {
            name: task.name,
            description: task.description,
            priority: task.priority.to_string(),
            due_date: task.due_date.to_string(),
        }
    }
}

/// Stored records are taken as written: a name with surrounding whitespace
/// is rejected instead of being trimmed, so a loaded task saves back unchanged.
impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        if record.name.trim() != record.name {
            return Err(Error::Validation(format!(
                "task name '{}' has leading or trailing whitespace",
                record.name
            )));
        }
        Task::new(
            &record.name,
            &record.description,
            &record.priority,
            &record.due_date,
        )
    }
}

pub(crate) fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("task name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
