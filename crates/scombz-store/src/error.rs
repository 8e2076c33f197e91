use thiserror::Error;

/// Errors that can occur while reading or writing the persisted store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value did not match the shape of its field.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An imported blob was not a `{settings, scombzData}` object.
    #[error("invalid storage blob: {0}")]
    InvalidBlob(String),

    /// The file was written by a newer schema than this build understands.
    #[error("unsupported store schema version {found} (max {supported})")]
    UnsupportedVersion { found: i64, supported: i64 },

    /// Another thread panicked while holding the connection.
    #[error("store connection lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
