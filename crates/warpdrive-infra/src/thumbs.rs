//! Thumbnail storage: a flat directory of image files served under
//! `/thumbnails/<name>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("unsupported file type")]
    UnsupportedType,

    #[error("failed to allocate a free filename")]
    NoFreeName,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct ThumbnailStore {
    dir: PathBuf,
}

impl ThumbnailStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Public paths of all stored thumbnails, non-recursive, filtered to the
    /// image extension allowlist.
    pub fn list(&self) -> io::Result<Vec<String>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if extension_allowed(name) {
                out.push(format!("/thumbnails/{name}"));
            }
        }
        out.sort();
        Ok(out)
    }

    /// Store an uploaded file and return its public path.
    ///
    /// The filename is reduced to its base name, the extension must be on
    /// the allowlist, and name collisions get a `-1`, `-2`, ... suffix.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, ThumbnailError> {
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if name.is_empty() || !extension_allowed(name) {
            return Err(ThumbnailError::UnsupportedType);
        }

        let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));
        fs::create_dir_all(&self.dir)?;

        let mut candidate = name.to_string();
        let mut dst = self.dir.join(&candidate);
        let mut i = 1;
        while dst.exists() {
            if i > 1000 {
                return Err(ThumbnailError::NoFreeName);
            }
            candidate = format!("{stem}-{i}.{ext}");
            dst = self.dir.join(&candidate);
            i += 1;
        }

        fs::write(&dst, bytes)?;
        tracing::debug!(name = %candidate, size = bytes.len(), "thumbnail stored");
        Ok(format!("/thumbnails/{candidate}"))
    }
}

fn extension_allowed(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let thumbs = ThumbnailStore::new(dir.path());

        let path = thumbs.save("cover.png", b"png bytes").unwrap();
        assert_eq!(path, "/thumbnails/cover.png");
        assert_eq!(thumbs.list().unwrap(), vec!["/thumbnails/cover.png"]);
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let thumbs = ThumbnailStore::new(dir.path());

        assert_eq!(thumbs.save("a.png", b"1").unwrap(), "/thumbnails/a.png");
        assert_eq!(thumbs.save("a.png", b"2").unwrap(), "/thumbnails/a-1.png");
        assert_eq!(thumbs.save("a.png", b"3").unwrap(), "/thumbnails/a-2.png");
    }

    #[test]
    fn rejects_unsupported_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let thumbs = ThumbnailStore::new(dir.path());
        assert!(matches!(
            thumbs.save("payload.exe", b"x"),
            Err(ThumbnailError::UnsupportedType)
        ));
        assert!(matches!(
            thumbs.save("noext", b"x"),
            Err(ThumbnailError::UnsupportedType)
        ));
    }

    #[test]
    fn filename_is_reduced_to_its_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let thumbs = ThumbnailStore::new(dir.path());
        let path = thumbs.save("../../etc/passwd.png", b"x").unwrap();
        assert_eq!(path, "/thumbnails/passwd.png");
        assert!(dir.path().join("passwd.png").exists());
    }

    #[test]
    fn list_skips_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let thumbs = ThumbnailStore::new(dir.path());
        thumbs.save("ok.jpg", b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        assert_eq!(thumbs.list().unwrap(), vec!["/thumbnails/ok.jpg"]);
    }
}
