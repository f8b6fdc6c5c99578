#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch working directory for one test
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("taskman.toml", contents)
    }

    pub fn read_tasks(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.tasks_path())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// taskman run from this directory, isolated from the caller's environment
    pub fn cmd(&self) -> Command {
        let mut cmd = taskman_cmd();
        cmd.current_dir(self.path())
            .env_remove("TASKMAN_FILE")
            .env_remove("TASKMAN_CONFIG")
            .env_remove("RUST_LOG")
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"));
        cmd
    }
}

pub fn taskman_cmd() -> Command {
    Command::cargo_bin("taskman").expect("binary")
}
