//! Domain-level error types.

use thiserror::Error;

/// Errors surfaced by the post store.
///
/// Every variant maps to a distinct outward signal; the HTTP layer owns the
/// translation to status codes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("post not found: {0}")]
    NotFound(i64),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        StoreError::Forbidden(msg.into())
    }
}
