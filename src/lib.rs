//! taskman - personal task tracker library
//!
//! This library provides the core functionality for the taskman CLI:
//! a validated in-memory task collection persisted to a JSON file.
//!
//! # Core Concepts
//!
//! - **Tasks**: a unique name, a description, a priority and a due date
//! - **Store**: create, find, update, delete, filter and sort over the collection
//! - **Task file**: a JSON array of records, saved atomically under a file lock
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskman.toml`
//! - `error`: Error types and result aliases
//! - `legacy`: Reader for the older comma-separated task list
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output for commands
//! - `storage`: Reading and writing the task file
//! - `store`: The task collection and its operations
//! - `task`: Task, priority and due date types

pub mod cli;
pub mod config;
pub mod error;
pub mod legacy;
pub mod lock;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use store::{SortKey, TaskFilter, TaskStore, TaskUpdate};
pub use task::{DueDate, Priority, Task, TASK_PRIORITIES};
