use thiserror::Error;

/// Errors that can occur within the task list.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A deadline string matched none of the accepted datetime shapes.
    #[error("invalid deadline for task {task_id}: {value:?}")]
    InvalidDeadline { task_id: String, value: String },

    /// The user's deadline format uses a token we cannot render.
    #[error("invalid date pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A required task field was empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Reading or writing the persisted settings failed.
    #[error("store error: {0}")]
    Store(#[from] scombz_store::StoreError),
}

pub type Result<T> = std::result::Result<T, TaskError>;
