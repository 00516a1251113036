// Error types for task store operations

/// Errors raised by the task store and its data types
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Task text was empty or whitespace-only
    #[error("Task cannot be empty")]
    EmptyText,

    /// Due date did not parse as a calendar date
    #[error("Invalid due date: {0} (expected MM-DD-YYYY, YYYY-MM-DD, today or tomorrow)")]
    InvalidDue(String),

    /// Priority name was not one of Low, Normal, High
    #[error("Invalid priority: {0} (expected low, normal or high)")]
    InvalidPriority(String),

    #[error("Invalid sort key: {0} (expected text, due, completed or priority)")]
    InvalidSortKey(String),

    #[error("Invalid filter mode: {0} (expected all, active or completed)")]
    InvalidFilter(String),

    /// Persisted document is not an array of task objects
    #[error("Malformed task document: {0}")]
    Format(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type
pub type Result<T> = std::result::Result<T, TaskError>;
