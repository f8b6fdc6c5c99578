//! Configuration loading and management
//!
//! Handles parsing of `taskman.toml` configuration files.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::storage::DEFAULT_TASKS_FILE;
use crate::store::SortKey;

/// File name looked up in the working directory and the user config dir
pub const CONFIG_FILE: &str = "taskman.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Task file configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Defaults for `taskman list`
    #[serde(default)]
    pub list: ListConfig,
}

/// Task file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the task file; relative paths resolve against the config file's directory
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// How long `save` waits for the file lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_TASKS_FILE)
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Listing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    /// Sort applied by `taskman list` when `--sort` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
}

impl Config {
    /// Load configuration from a `taskman.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find and load the configuration for a run.
    ///
    /// Order: `explicit`, then `<dir>/taskman.toml`, then the user config
    /// directory. Returns the defaults when none exist, along with the path
    /// that was loaded, if any.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidates = std::iter::once(dir.join(CONFIG_FILE)).chain(user_config_path());
        for candidate in candidates {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading config");
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Task file path, resolving a relative `store.path` against `base`
    pub fn tasks_path(&self, base: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            base.join(&self.store.path)
        }
    }

    /// Parsed `list.default_sort`
    pub fn default_sort(&self) -> Result<Option<SortKey>> {
        self.list
            .default_sort
            .as_deref()
            .map(str::parse::<SortKey>)
            .transpose()
    }

    fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "store.path cannot be empty".to_string(),
            ));
        }
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        self.default_sort()
            .map_err(|err| Error::InvalidConfig(format!("list.default_sort: {err}")))?;
        Ok(())
    }
}

/// `taskman.toml` inside the platform config directory, if one can be determined
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taskman").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.store.path, PathBuf::from("tasks.json"));
        assert_eq!(cfg.store.lock_timeout_ms, 5000);
        assert!(cfg.list.default_sort.is_none());
        assert_eq!(cfg.default_sort().unwrap(), None);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[store]
path = "data/todo.json"
lock_timeout_ms = 250

[list]
default_sort = "due_date"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.store.path, PathBuf::from("data/todo.json"));
        assert_eq!(cfg.store.lock_timeout_ms, 250);
        assert_eq!(cfg.default_sort().unwrap(), Some(SortKey::DueDate));
        assert_eq!(
            cfg.tasks_path(dir.path()),
            dir.path().join("data").join("todo.json")
        );
    }

    #[test]
    fn invalid_sort_key_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[list]\ndefault_sort = \"colour\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(message) => assert!(message.contains("list.default_sort")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_lock_timeout_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[store]\nlock_timeout_ms = 0").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "[store]\npath = \"local.json\"")
            .expect("write local");
        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "[store]\npath = \"explicit.json\"").expect("write explicit");

        let (cfg, found) = Config::discover(Some(&explicit), dir.path()).expect("discover");
        assert_eq!(cfg.store.path, PathBuf::from("explicit.json"));
        assert_eq!(found, Some(explicit));

        let (cfg, found) = Config::discover(None, dir.path()).expect("discover");
        assert_eq!(cfg.store.path, PathBuf::from("local.json"));
        assert_eq!(found, Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    fn absolute_store_path_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cfg = Config::default();
        cfg.store.path = dir.path().join("abs.json");
        assert_eq!(cfg.tasks_path(Path::new("/elsewhere")), dir.path().join("abs.json"));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("path = \"tasks.json\""));
        assert!(written.contains("lock_timeout_ms = 5000"));
    }
}
