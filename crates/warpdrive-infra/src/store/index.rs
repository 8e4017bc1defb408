use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use warpdrive_core::domain::{NewPost, Post, PostPatch};
use warpdrive_core::error::StoreError;
use warpdrive_core::ports::PostStore;

use super::blob::ContentBlobStore;
use super::snapshot::SnapshotStore;

/// In-memory index state: id -> metadata plus the allocation counter.
///
/// Invariant: every key equals its post's id, and `next_id` is strictly
/// greater than every id in the map.
#[derive(Debug, Default)]
struct IndexState {
    posts: HashMap<i64, Post>,
    next_id: i64,
}

/// The filesystem-backed post store.
///
/// All mutations run under the exclusive side of the lock for their entire
/// multi-step sequence, including file I/O, and undo completed steps in
/// reverse order when a later step fails. Reads hold the shared side only
/// long enough to copy metadata out; content reads happen unlocked, which is
/// safe because content files are only ever rewritten under the exclusive
/// lock, one identifier at a time.
///
/// Durability is a two-step commit (content file, then snapshot file) with
/// no cross-file transaction. A crash between the two writes can leave an
/// orphaned content file, which is inert: content without an index entry is
/// never served. The rollback ordering guarantees the converse never
/// happens - an index entry always has its content write completed first.
pub struct FsPostStore {
    state: RwLock<IndexState>,
    blobs: ContentBlobStore,
    snapshot: SnapshotStore,
}

impl FsPostStore {
    /// Open the store, loading the snapshot if one exists.
    pub fn open(
        snapshot_path: impl AsRef<Path>,
        content_dir: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let snapshot = SnapshotStore::new(snapshot_path.as_ref());
        let (posts, next_id) = snapshot.load()?;

        tracing::info!(posts = posts.len(), next_id, "post index loaded");

        Ok(Self {
            state: RwLock::new(IndexState { posts, next_id }),
            blobs: ContentBlobStore::new(content_dir.as_ref()),
            snapshot,
        })
    }
}

#[async_trait]
impl PostStore for FsPostStore {
    async fn create(&self, draft: NewPost) -> Result<Post, StoreError> {
        if draft.author.is_empty() || draft.title.is_empty() {
            return Err(StoreError::validation("author and title are required"));
        }

        let mut state = self.state.write().await;

        let id = state.next_id;
        let post = Post {
            id,
            author: draft.author,
            title: draft.title,
            description: draft.description,
            timestamp: Utc::now().timestamp_millis(),
            thumbnail: draft.thumbnail,
        };
        state.posts.insert(id, post.clone());
        state.next_id = id + 1;

        if let Err(e) = self.blobs.write(id, &draft.content) {
            state.posts.remove(&id);
            state.next_id = id;
            return Err(e.into());
        }

        if let Err(e) = self.snapshot.save(&state.posts, state.next_id) {
            state.posts.remove(&id);
            state.next_id = id;
            if let Err(undo) = self.blobs.delete(id) {
                tracing::warn!(id, error = %undo, "rollback: failed to remove content file");
            }
            return Err(e.into());
        }

        tracing::debug!(id, author = %post.author, "post created");
        Ok(post)
    }

    async fn update(&self, id: i64, patch: PostPatch, caller: &str) -> Result<Post, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::validation("empty patch"));
        }

        let mut state = self.state.write().await;

        let original = state
            .posts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))?;

        // Author may only be set to the authenticated caller's own name.
        if let Some(author) = &patch.author {
            if author != caller {
                return Err(StoreError::forbidden("cannot change author"));
            }
        }

        let mut updated = original.clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(author) = patch.author {
            updated.author = author;
        }
        if let Some(thumbnail) = patch.thumbnail {
            updated.thumbnail = thumbnail;
        }

        // Capture the prior content before replacing it, best effort: if the
        // capture read fails, rollback simply cannot restore the bytes.
        let prev_content = match &patch.content {
            Some(_) => self.blobs.read(id).ok(),
            None => None,
        };
        if let Some(content) = &patch.content {
            self.blobs.write(id, content)?;
        }

        state.posts.insert(id, updated.clone());

        if let Err(e) = self.snapshot.save(&state.posts, state.next_id) {
            state.posts.insert(id, original);
            if let Some(prev) = prev_content {
                if let Err(undo) = self.blobs.write(id, &prev) {
                    tracing::warn!(id, error = %undo, "rollback: failed to restore content");
                }
            }
            return Err(e.into());
        }

        tracing::debug!(id, "post updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        let backup = state.posts.remove(&id).ok_or(StoreError::NotFound(id))?;
        let prev_content = self.blobs.read(id).unwrap_or_default();

        if let Err(e) = self.blobs.delete(id) {
            state.posts.insert(id, backup);
            return Err(e.into());
        }

        if let Err(e) = self.snapshot.save(&state.posts, state.next_id) {
            state.posts.insert(id, backup);
            if let Err(undo) = self.blobs.write(id, &prev_content) {
                tracing::warn!(id, error = %undo, "rollback: failed to restore content");
            }
            return Err(e.into());
        }

        tracing::debug!(id, "post deleted");
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<(Post, String), StoreError> {
        let post = {
            let state = self.state.read().await;
            state
                .posts
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound(id))?
        };
        // Unlocked on purpose: content files only change under the exclusive
        // lock, so the worst case is observing a concurrent update's content
        // a moment early or late.
        let content = self.blobs.read(id)?;
        Ok((post, content))
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state.posts.values().cloned().collect();
        posts.sort_by_key(|p| p.id);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn snapshot_path(&self) -> std::path::PathBuf {
            self.dir.path().join("posts.json")
        }

        fn content_dir(&self) -> std::path::PathBuf {
            self.dir.path().join("posts")
        }

        fn content_file(&self, id: i64) -> std::path::PathBuf {
            self.content_dir().join(format!("{id}.md"))
        }

        fn open(&self) -> FsPostStore {
            FsPostStore::open(self.snapshot_path(), self.content_dir()).unwrap()
        }

        /// Make the next snapshot save fail by planting a directory where
        /// the snapshot file should land.
        fn break_snapshot(&self) {
            let _ = fs::remove_file(self.snapshot_path());
            fs::create_dir(self.snapshot_path()).unwrap();
        }

        fn fix_snapshot(&self) {
            let _ = fs::remove_dir(self.snapshot_path());
            let _ = fs::remove_file(self.dir.path().join("posts.json.tmp"));
        }
    }

    fn draft(author: &str, title: &str, content: &str) -> NewPost {
        NewPost {
            author: author.to_string(),
            title: title.to_string(),
            description: String::new(),
            content: content.to_string(),
            thumbnail: String::new(),
        }
    }

    fn title_patch(title: &str) -> PostPatch {
        PostPatch {
            title: Some(title.to_string()),
            ..PostPatch::default()
        }
    }

    #[tokio::test]
    async fn create_update_get_delete_scenario() {
        let fx = Fixture::new();
        let store = fx.open();

        let post = store.create(draft("jax", "Hello", "body")).await.unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.author, "jax");

        store.update(1, title_patch("Hi"), "jax").await.unwrap();
        let (post, content) = store.get(1).await.unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.author, "jax");
        assert_eq!(content, "body");

        store.delete(1).await.unwrap();
        assert!(matches!(store.get(1).await, Err(StoreError::NotFound(1))));
        assert!(!fx.content_file(1).exists());
    }

    #[tokio::test]
    async fn list_returns_all_posts_without_content() {
        let fx = Fixture::new();
        let store = fx.open();

        store.create(draft("mist", "one", "b1")).await.unwrap();
        store.create(draft("mist", "two", "b2")).await.unwrap();

        let posts = store.list().await.unwrap();
        assert_eq!(posts.len(), 2);
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn create_rejects_missing_author_or_title() {
        let fx = Fixture::new();
        let store = fx.open();

        let err = store.create(draft("", "title", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = store.create(draft("mist", "", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // Nothing was allocated or persisted.
        assert!(store.list().await.unwrap().is_empty());
        let post = store.create(draft("mist", "ok", "")).await.unwrap();
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn failed_create_leaves_no_trace() {
        let fx = Fixture::new();
        let store = fx.open();
        fx.break_snapshot();

        let err = store.create(draft("mist", "doomed", "body")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        assert!(store.list().await.unwrap().is_empty());
        assert!(!fx.content_file(1).exists());

        // Counter was rolled back: the next create still gets id 1.
        fx.fix_snapshot();
        let post = store.create(draft("mist", "ok", "body")).await.unwrap();
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn failed_create_on_blob_write_does_not_advance_counter() {
        let fx = Fixture::new();
        let store = fx.open();
        // Plant a file where the content directory should be.
        fs::write(fx.content_dir(), b"not a directory").unwrap();

        let err = store.create(draft("mist", "doomed", "body")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(store.list().await.unwrap().is_empty());

        fs::remove_file(fx.content_dir()).unwrap();
        let post = store.create(draft("mist", "ok", "body")).await.unwrap();
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn failed_update_restores_record_and_content() {
        let fx = Fixture::new();
        let store = fx.open();
        store.create(draft("mist", "before", "old body")).await.unwrap();

        fx.break_snapshot();
        let patch = PostPatch {
            title: Some("after".to_string()),
            content: Some("new body".to_string()),
            ..PostPatch::default()
        };
        let err = store.update(1, patch, "mist").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        fx.fix_snapshot();

        let (post, content) = store.get(1).await.unwrap();
        assert_eq!(post.title, "before");
        assert_eq!(content, "old body");
    }

    #[tokio::test]
    async fn failed_delete_restores_record_and_content() {
        let fx = Fixture::new();
        let store = fx.open();
        store.create(draft("mist", "keeper", "body")).await.unwrap();

        fx.break_snapshot();
        let err = store.delete(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        fx.fix_snapshot();

        let (post, content) = store.get(1).await.unwrap();
        assert_eq!(post.title, "keeper");
        assert_eq!(content, "body");
        assert!(fx.content_file(1).exists());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let fx = Fixture::new();
        let store = fx.open();
        let err = store.update(9, title_patch("x"), "mist").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(9)));
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let fx = Fixture::new();
        let store = fx.open();
        store.create(draft("mist", "t", "")).await.unwrap();

        let err = store.update(1, PostPatch::default(), "mist").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn changing_author_to_someone_else_is_forbidden() {
        let fx = Fixture::new();
        let store = fx.open();
        store.create(draft("jax", "t", "")).await.unwrap();

        let patch = PostPatch {
            author: Some("mist".to_string()),
            title: Some("hijacked".to_string()),
            ..PostPatch::default()
        };
        let err = store.update(1, patch, "jax").await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        // Record untouched, including fields the patch also carried.
        let (post, _) = store.get(1).await.unwrap();
        assert_eq!(post.author, "jax");
        assert_eq!(post.title, "t");
    }

    #[tokio::test]
    async fn author_may_be_set_to_the_caller() {
        let fx = Fixture::new();
        let store = fx.open();
        store.create(draft("jax", "t", "")).await.unwrap();

        let patch = PostPatch {
            author: Some("mist".to_string()),
            ..PostPatch::default()
        };
        let post = store.update(1, patch, "mist").await.unwrap();
        assert_eq!(post.author, "mist");
    }

    #[tokio::test]
    async fn provided_empty_string_clears_a_field() {
        let fx = Fixture::new();
        let store = fx.open();
        let mut draft = draft("mist", "t", "");
        draft.description = "something".to_string();
        store.create(draft).await.unwrap();

        let patch = PostPatch {
            description: Some(String::new()),
            ..PostPatch::default()
        };
        let post = store.update(1, patch, "mist").await.unwrap();
        assert_eq!(post.description, "");
        assert_eq!(post.title, "t");
    }

    #[tokio::test]
    async fn store_reloads_from_snapshot() {
        let fx = Fixture::new();
        {
            let store = fx.open();
            store.create(draft("mist", "one", "b1")).await.unwrap();
            store.create(draft("jax", "two", "b2")).await.unwrap();
        }

        let store = fx.open();
        let posts = store.list().await.unwrap();
        assert_eq!(posts.len(), 2);
        let (post, content) = store.get(2).await.unwrap();
        assert_eq!(post.author, "jax");
        assert_eq!(content, "b2");

        let post = store.create(draft("mist", "three", "")).await.unwrap();
        assert_eq!(post.id, 3);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete_and_restart() {
        let fx = Fixture::new();
        {
            let store = fx.open();
            store.create(draft("mist", "one", "")).await.unwrap();
            store.create(draft("mist", "two", "")).await.unwrap();
            store.delete(2).await.unwrap();
        }

        let store = fx.open();
        let post = store.create(draft("mist", "three", "")).await.unwrap();
        assert_eq!(post.id, 3);
    }

    #[tokio::test]
    async fn timestamps_are_set_at_creation() {
        let fx = Fixture::new();
        let store = fx.open();
        let before = Utc::now().timestamp_millis();
        let post = store.create(draft("mist", "t", "")).await.unwrap();
        let after = Utc::now().timestamp_millis();
        assert!(post.timestamp >= before && post.timestamp <= after);
    }
}
