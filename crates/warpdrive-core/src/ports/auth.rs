//! Authentication port.
//!
//! Authentication is fully delegated to an external validator service; the
//! core only consumes the username it resolves.

use async_trait::async_trait;

/// Resolves an opaque validator token to a username.
#[async_trait]
pub trait IdentityValidator: Send + Sync {
    /// Validate the token and return the username it belongs to.
    async fn validate(&self, token: &str) -> Result<String, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing validator token")]
    MissingToken,

    #[error("invalid validator token")]
    InvalidToken,

    #[error("user {0} is not allowed")]
    NotAllowed(String),

    #[error("validator unreachable: {0}")]
    Unavailable(String),
}
