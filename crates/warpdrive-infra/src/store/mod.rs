//! Filesystem-backed post storage.
//!
//! Three layers compose the store:
//! - [`blob`] - one content file per post, written atomically;
//! - [`snapshot`] - the single JSON file mirroring the whole index;
//! - [`index`] - the locked in-memory index that drives both and rolls
//!   back partial mutations.

mod blob;
mod fs;
mod index;
mod snapshot;

pub use blob::ContentBlobStore;
pub use index::FsPostStore;
pub use snapshot::SnapshotStore;
