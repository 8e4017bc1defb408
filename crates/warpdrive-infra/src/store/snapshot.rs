use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use warpdrive_core::domain::Post;

use super::fs::atomic_write;

/// On-disk shape of the snapshot file.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    next_id: i64,
    posts: Vec<Post>,
}

/// The single JSON file mirroring the whole post index, written atomically.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize all posts (sorted by id for determinism) plus the counter
    /// and atomically replace the snapshot file.
    pub fn save(&self, posts: &HashMap<i64, Post>, next_id: i64) -> io::Result<()> {
        let mut sorted: Vec<Post> = posts.values().cloned().collect();
        sorted.sort_by_key(|p| p.id);

        let snapshot = SnapshotFile {
            next_id,
            posts: sorted,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot).map_err(io::Error::other)?;
        atomic_write(&self.path, &bytes)
    }

    /// Load the snapshot. A missing file is first boot: empty index,
    /// counter 1. A file that exists but fails to deserialize is a fatal
    /// load error.
    ///
    /// Identifiers are never reused: the loaded counter is the maximum of
    /// the persisted counter and `max(id) + 1`.
    pub fn load(&self) -> io::Result<(HashMap<i64, Post>, i64)> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((HashMap::new(), 1)),
            Err(e) => return Err(e),
        };

        let snapshot: SnapshotFile = serde_json::from_slice(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut next_id = snapshot.next_id.max(1);
        let mut posts = HashMap::with_capacity(snapshot.posts.len());
        for post in snapshot.posts {
            next_id = next_id.max(post.id + 1);
            posts.insert(post.id, post);
        }
        Ok((posts, next_id))
    }
}
