//! Error types for the scombz-login crate.

use thiserror::Error;

/// Shown to the user when the entered credentials are rejected.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "学籍番号またはパスワードが正しくありません。";

#[derive(Debug, Error)]
pub enum LoginError {
    /// Username did not match the student id format, or password was empty.
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("store error: {0}")]
    Store(#[from] scombz_store::StoreError),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, LoginError>;
