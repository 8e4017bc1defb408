use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::StoreError;

/// The post store: a durable, concurrency-safe index of posts.
///
/// Every mutation is all-or-nothing: implementations must roll back any
/// partially applied state before surfacing an error, so callers see either
/// the full effect of a mutation or none of it.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Create a post and return its metadata record (content excluded).
    async fn create(&self, draft: NewPost) -> Result<Post, StoreError>;

    /// Apply a partial update. Changing `author` is only permitted when the
    /// new value equals `caller`, the authenticated username.
    async fn update(&self, id: i64, patch: PostPatch, caller: &str) -> Result<Post, StoreError>;

    /// Remove a post and its content.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Fetch a post's metadata together with its content.
    async fn get(&self, id: i64) -> Result<(Post, String), StoreError>;

    /// All post metadata, content excluded. Order is unspecified.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;
}
