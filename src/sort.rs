// Column sort keys and ordering

use crate::error::TaskError;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column a store can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Text,
    Due,
    Completed,
    Priority,
}

impl SortKey {
    /// Ascending comparison for this key
    ///
    /// `Due` compares the raw strings, so `01-05-2024` sorts before `02-01-2023`.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Text => a.text.cmp(&b.text),
            SortKey::Due => a.due.as_str().cmp(b.due.as_str()),
            SortKey::Completed => a.completed.cmp(&b.completed),
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Text => write!(f, "text"),
            SortKey::Due => write!(f, "due"),
            SortKey::Completed => write!(f, "completed"),
            SortKey::Priority => write!(f, "priority"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "task" => Ok(SortKey::Text),
            "due" => Ok(SortKey::Due),
            "completed" | "done" => Ok(SortKey::Completed),
            "priority" => Ok(SortKey::Priority),
            _ => Err(TaskError::InvalidSortKey(s.to_string())),
        }
    }
}

/// Last applied sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub descending: bool,
}

impl SortState {
    /// State after a header click on `key`: same key flips direction, new key starts ascending
    pub fn next(previous: Option<SortState>, key: SortKey) -> SortState {
        let descending = match previous {
            Some(prev) if prev.key == key => !prev.descending,
            _ => false,
        };
        SortState { key, descending }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ord = self.key.compare(a, b);
        if self.descending { ord.reverse() } else { ord }
    }
}
