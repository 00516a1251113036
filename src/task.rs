// Task record and its field types

use crate::error::{Result, TaskError};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display and storage format for due dates
pub const DUE_FORMAT: &str = "%m-%d-%Y";

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Opaque identifier assigned to a task when it enters a store
///
/// Ids live for the lifetime of the store; the persisted document does not carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One to-do item
///
/// Field order matches the persisted document: `text, due, priority, completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub due: Due,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an active task with no due date and no priority
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            due: Due::none(),
            priority: Priority::None,
            completed: false,
        }
    }

    pub fn with_due(mut self, due: Due) -> Self {
        self.due = due;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Check the entry-time invariant: text must not be blank
    pub fn validate_text(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }
        Ok(())
    }
}

/// Task priority
///
/// `Other` keeps unrecognised strings from older files intact so they survive a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    #[default]
    None,
    Low,
    Normal,
    High,
    Other(String),
}

impl Priority {
    /// Sort ordinal: Low=1, Normal=2, High=3, empty or unknown=0
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Normal => 2,
            Priority::High => 3,
            Priority::None | Priority::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::None => "",
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Other(s) => s,
        }
    }

    /// Parse user input, case-insensitively; unknown names are rejected
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            _ => Err(TaskError::InvalidPriority(input.to_string())),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => Priority::None,
            "Low" => Priority::Low,
            "Normal" => Priority::Normal,
            "High" => Priority::High,
            _ => Priority::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Due date, kept as the raw `MM-DD-YYYY` string
///
/// Values built through [`Due::parse`] or [`Due::from_parts`] are calendar-checked.
/// Values read from disk are kept verbatim, even when they are not valid dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Due(String);

impl Due {
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(DUE_FORMAT).to_string())
    }

    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Parse user input relative to the local date
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_relative(input, Local::now().date_naive())
    }

    /// Parse user input: `MM-DD-YYYY`, `YYYY-MM-DD`, `today`, `tomorrow` or empty
    pub fn parse_relative(input: &str, today: NaiveDate) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::none());
        }

        match trimmed.to_lowercase().as_str() {
            "today" => return Ok(Self::from_date(today)),
            "tomorrow" => return Ok(Self::from_date(today + Duration::days(1))),
            _ => {}
        }

        NaiveDate::parse_from_str(trimmed, DUE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_FORMAT))
            .map(Self::from_date)
            .map_err(|_| TaskError::InvalidDue(input.to_string()))
    }

    /// Build from picker-style parts, clamping the day to the month's length
    pub fn from_parts(month: u32, day: u32, year: i32) -> Result<Self> {
        let invalid = || TaskError::InvalidDue(format!("{:02}-{:02}-{}", month, day, year));

        if day == 0 {
            return Err(invalid());
        }
        let max_day = days_in_month(year, month).ok_or_else(invalid)?;
        let date = NaiveDate::from_ymd_opt(year, month, day.min(max_day)).ok_or_else(invalid)?;
        Ok(Self::from_date(date))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Calendar date, if the stored string is a valid `MM-DD-YYYY` date
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DUE_FORMAT).ok()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.date().is_some_and(|d| d < today)
    }
}

impl From<&str> for Due {
    /// Wrap a raw string without validation (legacy values)
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for Due {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of days in the given month, leap-year aware
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}
