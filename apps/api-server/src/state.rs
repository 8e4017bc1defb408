//! Application state - shared across all handlers.

use std::fs;
use std::io;
use std::sync::Arc;

use warpdrive_core::ports::{IdentityValidator, PostStore};
use warpdrive_infra::{FsPostStore, RoturValidator, ThumbnailStore};

use crate::config::{AllowedUsers, AppConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub thumbs: Arc<ThumbnailStore>,
    pub validator: Arc<dyn IdentityValidator>,
    pub allowed_users: AllowedUsers,
}

impl AppState {
    /// Build the application state, loading the post index from disk.
    pub fn new(config: &AppConfig) -> io::Result<Self> {
        let posts = FsPostStore::open(&config.posts_file, &config.posts_dir)
            .map_err(io::Error::other)?;

        // The stores create files lazily; the directories must exist so
        // listing works before the first write.
        fs::create_dir_all(&config.posts_dir)?;
        fs::create_dir_all(&config.thumbs_dir)?;

        let validator =
            RoturValidator::new(config.validator_url.clone(), config.validator_key.clone());

        tracing::info!("Application state initialized");

        Ok(Self {
            posts: Arc::new(posts),
            thumbs: Arc::new(ThumbnailStore::new(&config.thumbs_dir)),
            validator: Arc::new(validator),
            allowed_users: config.allowed_users.clone(),
        })
    }
}
