//! Atomic file write helper shared by the blob and snapshot stores.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `contents` to `path` via a `.tmp` sibling and an atomic rename.
///
/// The target file is either fully updated or unchanged; a reader never
/// observes a truncated intermediate state. Parent directories are created
/// as needed.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = File::create(&tmp)?;
    file.write_all(contents)?;
    // Flush to disk before the rename makes the new contents visible.
    file.sync_all()?;

    fs::rename(&tmp, path)
}
