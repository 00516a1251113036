//! Configuration and directory layout.
//!
//! | Purpose | Linux default | Override |
//! |---------|---------------|----------|
//! | Data (task file, view state) | `~/.local/share/taskmaster/` | `TASKMASTER_DATA_DIR` |
//! | Config (`config.yaml`) | `~/.config/taskmaster/` | `TASKMASTER_CONFIG_DIR` |
//!
//! A missing config file means defaults; every field is optional.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_NAME: &str = "taskmaster";

/// Directory holding the task file and view state
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TASKMASTER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TASKMASTER_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task document location; defaults to `<data_dir>/tasks.json`
    pub tasks_file: Option<PathBuf>,
    /// Move a malformed task file aside and start empty instead of failing
    pub recover_malformed: bool,
    /// Colored list output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: None,
            recover_malformed: false,
            color: true,
        }
    }
}

impl Config {
    /// Load from a YAML file; a missing or empty file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(file = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Resolved task document path
    pub fn tasks_file(&self) -> PathBuf {
        self.tasks_file
            .clone()
            .unwrap_or_else(|| data_dir().join("tasks.json"))
    }
}
