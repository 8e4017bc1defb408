//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod store;

pub use auth::{AuthError, IdentityValidator};
pub use store::PostStore;
