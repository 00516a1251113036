// View filtering for tasks

use crate::error::TaskError;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Which tasks a view shows, by completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,    // not completed
    Completed, // completed only
}

impl FilterMode {
    pub fn accepts(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::Active => write!(f, "active"),
            FilterMode::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            _ => Err(TaskError::InvalidFilter(s.to_string())),
        }
    }
}

/// Completion filter plus case-insensitive substring search on task text
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub mode: FilterMode,
    /// Lowercased, trimmed search text; empty matches everything
    search: String,
}

impl Query {
    pub fn new(mode: FilterMode, search: &str) -> Self {
        Self {
            mode,
            search: search.trim().to_lowercase(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !self.mode.accepts(task) {
            return false;
        }
        self.search.is_empty() || task.text.to_lowercase().contains(&self.search)
    }
}
