//! # Warpdrive Infrastructure
//!
//! Concrete implementations of the ports defined in `warpdrive-core`:
//! the filesystem-backed post store, the thumbnail store, and the Rotur
//! validator client.

pub mod auth;
pub mod store;
pub mod thumbs;

pub use auth::RoturValidator;
pub use store::FsPostStore;
pub use thumbs::ThumbnailStore;
