use crate::models::Category;

/// Rejected user input at task creation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The task name was empty or only whitespace.
    #[error("Name cannot be empty")]
    EmptyName,

    /// A deadline string did not parse as `YYYY-MM-DD`.
    #[error("Invalid date '{input}'. Use YYYY-MM-DD.")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
    },
}

/// Errors surfaced by the planner and its storage backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No task with this id exists.
    #[error("Task {id} not found.")]
    NotFound { id: u64 },

    /// The action only applies to another category of task.
    #[error("Task {id} is not a {expected} task.")]
    WrongCategory { id: u64, expected: Category },

    /// A stored record breaks a task invariant.
    #[error("invalid stored task {id}: {reason}")]
    InvalidRecord { id: u64, reason: &'static str },

    /// Every task id has been handed out.
    #[error("no task ids left")]
    IdsExhausted,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
