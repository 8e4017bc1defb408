use std::fs;
use std::io;
use std::path::PathBuf;

use super::fs::atomic_write;

/// One file per post holding its raw markdown body, named `<id>.md`.
///
/// No internal locking: the post index serializes all mutations per
/// identifier. Operations on different identifiers are independent.
pub struct ContentBlobStore {
    dir: PathBuf,
}

impl ContentBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, id: i64) -> PathBuf {
        self.dir.join(format!("{id}.md"))
    }

    /// Atomically replace the content for `id`.
    pub fn write(&self, id: i64, content: &str) -> io::Result<()> {
        atomic_write(&self.path(id), content.as_bytes())
    }

    /// Read the content for `id`. A missing file is a valid state (a post
    /// with no body yet) and reads back as the empty string.
    pub fn read(&self, id: i64) -> io::Result<String> {
        match fs::read_to_string(self.path(id)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Remove the content file for `id`. Absence is success.
    pub fn delete(&self, id: i64) -> io::Result<()> {
        match fs::remove_file(self.path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
