//! taskman init command implementation
//!
//! Creates an empty task file and a default `taskman.toml` when missing.

use std::path::{Path, PathBuf};

use crate::cli::{resolve_config, GlobalOptions};
use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::storage::TaskFile;
use crate::store::TaskStore;

#[derive(serde::Serialize)]
struct InitReport {
    tasks_file: PathBuf,
    config_file: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    tasks_file: bool,
    config: bool,
}

pub(crate) fn run(global: GlobalOptions) -> Result<()> {
    let (config, config_path, tasks_path) = resolve_config(&global)?;

    let (config_path, created_config) = match config_path {
        Some(path) => (path, false),
        None => {
            let path = std::env::current_dir()?.join(CONFIG_FILE);
            ensure_config(&path, &config)?;
            (path, true)
        }
    };

    let file = TaskFile::new(&tasks_path).with_lock_timeout(config.store.lock_timeout_ms);
    let created_tasks = ensure_tasks_file(file)?;

    let report = InitReport {
        tasks_file: tasks_path.clone(),
        config_file: config_path.clone(),
        created: InitCreated {
            tasks_file: created_tasks,
            config: created_config,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push(config_path.display().to_string());
    }
    if created_tasks {
        created_items.push(tasks_path.display().to_string());
    }

    let header = if created_items.is_empty() {
        "taskman init: nothing to do".to_string()
    } else {
        "taskman init: ready".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("tasks", tasks_path.display().to_string());
    human.push_summary("config", config_path.display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("taskman add <name> --priority High --due YYYY-MM-DD");

    emit_success(global.output(), "init", &report, Some(&human))
}

fn ensure_config(path: &Path, config: &Config) -> Result<()> {
    if path.exists() && !path.is_file() {
        return Err(Error::InvalidArgument(format!(
            "{CONFIG_FILE} exists but is not a file: {}",
            path.display()
        )));
    }
    config.save(path)
}

fn ensure_tasks_file(file: TaskFile) -> Result<bool> {
    let path = file.path().to_path_buf();
    if path.exists() {
        if !path.is_file() {
            return Err(Error::InvalidArgument(format!(
                "task file exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    TaskStore::with_file(file).save()?;
    Ok(true)
}
