// TaskMaster - task list management with whole-file JSON persistence

pub mod actions;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod persist;
pub mod sort;
pub mod state;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use error::TaskError;
pub use filter::{FilterMode, Query};
pub use sort::{SortKey, SortState};
pub use state::ViewState;
pub use store::{Entry, TaskStore};
pub use task::{Due, Priority, Task, TaskId};
