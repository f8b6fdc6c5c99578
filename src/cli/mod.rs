//! Command-line interface for taskman
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in submodules.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::TaskFile;
use crate::store::TaskStore;

mod import;
mod init;
mod task;

/// taskman - personal task tracker
///
/// Create, view, update, delete, filter and sort tasks kept in a local
/// JSON file.
#[derive(Parser, Debug)]
#[command(name = "taskman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task file (overrides store.path from the config)
    #[arg(long, global = true, env = "TASKMAN_FILE")]
    pub file: Option<PathBuf>,

    /// Path to a taskman.toml config file
    #[arg(long, global = true, env = "TASKMAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty task file and a default taskman.toml
    Init,

    /// Add a task
    Add {
        /// Task name (unique, case-insensitive)
        name: String,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: High, Medium or Low
        #[arg(short, long)]
        priority: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
    },

    /// List tasks, optionally filtered and sorted
    #[command(alias = "ls")]
    List {
        /// Only tasks whose name contains this text (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Only tasks with exactly this priority (High, Medium or Low)
        #[arg(short, long)]
        priority: Option<String>,

        /// Only tasks due on exactly this date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Order of the listing: name, priority or due_date
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one task by exact name
    Show {
        /// Task name
        name: String,
    },

    /// Change a task's description, priority or due date
    Update {
        /// Task name (exact)
        name: String,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority: High, Medium or Low
        #[arg(short, long)]
        priority: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task name (exact)
        name: String,
    },

    /// Reorder the stored tasks: name, priority or due_date
    Sort {
        /// Sort key
        key: String,
    },

    /// Import tasks from a line-based `name,description,priority,due_date` file
    Import {
        /// File to import (e.g. tasks.txt)
        path: PathBuf,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            file: self.file,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Init => init::run(global),
            Commands::Add {
                name,
                description,
                priority,
                due,
            } => task::run_add(task::AddOptions {
                name,
                description,
                priority,
                due,
                global,
            }),
            Commands::List {
                name,
                priority,
                due,
                sort,
            } => task::run_list(task::ListOptions {
                name,
                priority,
                due,
                sort,
                global,
            }),
            Commands::Show { name } => task::run_show(task::ShowOptions { name, global }),
            Commands::Update {
                name,
                description,
                priority,
                due,
            } => task::run_update(task::UpdateOptions {
                name,
                description,
                priority,
                due,
                global,
            }),
            Commands::Delete { name } => task::run_delete(task::DeleteOptions { name, global }),
            Commands::Sort { key } => task::run_sort(task::SortOptions { key, global }),
            Commands::Import { path } => import::run(import::ImportOptions { path, global }),
        }
    }
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub(crate) struct GlobalOptions {
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> crate::output::OutputOptions {
        crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

/// How a command reacts to a corrupt task file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadMode {
    /// Report the corruption as a warning and continue with no tasks
    ReadOnly,
    /// Fail, so the damaged file is not overwritten
    Mutating,
}

/// Everything a command needs: config, the loaded store, and load warnings
pub(crate) struct Context {
    pub config: Config,
    pub store: TaskStore,
    pub warnings: Vec<String>,
}

pub(crate) fn resolve_config(global: &GlobalOptions) -> Result<(Config, Option<PathBuf>, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let (config, config_path) = Config::discover(global.config.as_deref(), &cwd)?;
    let base = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.clone());
    let tasks_path = match &global.file {
        Some(file) => file.clone(),
        None => config.tasks_path(&base),
    };
    Ok((config, config_path, tasks_path))
}

pub(crate) fn load_context(global: &GlobalOptions, mode: LoadMode) -> Result<Context> {
    let (config, _, tasks_path) = resolve_config(global)?;
    let file = TaskFile::new(tasks_path).with_lock_timeout(config.store.lock_timeout_ms);
    let mut store = TaskStore::with_file(file);

    let warnings = match store.load() {
        Ok(report) => report.warnings(),
        Err(err @ Error::CorruptStore { .. }) if mode == LoadMode::ReadOnly => {
            vec![format!("{err}; showing no tasks")]
        }
        Err(err) => return Err(err),
    };

    Ok(Context {
        config,
        store,
        warnings,
    })
}
