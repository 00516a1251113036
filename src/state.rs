// Persisted view state: default filter mode and last applied sort

use crate::filter::FilterMode;
use crate::sort::SortState;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filter: FilterMode,
    pub sort: Option<SortState>,
}

impl ViewState {
    /// State file kept next to the task document
    pub fn path_for(tasks_file: &Path) -> PathBuf {
        tasks_file.with_file_name("state.yaml")
    }

    /// Load view state; missing or unreadable state falls back to defaults
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let parsed: Result<Self> = fs::read_to_string(path)
            .map_err(eyre::Report::from)
            .and_then(|content| serde_yaml::from_str(&content).map_err(eyre::Report::from));

        match parsed {
            Ok(state) => state,
            Err(e) => {
                warn!(file = ?path, error = %e, "Failed to read view state, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).context("Failed to write view state")?;
        Ok(())
    }
}
