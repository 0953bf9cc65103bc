mod real;

#[cfg(test)]
mod mock;

pub use real::RealFileSystem;

#[cfg(test)]
pub use mock::MockFileSystem;

use async_trait::async_trait;
use std::io;
use std::path::Path;

use crate::models::{DirId, FsEntry};

/// Read-only view of the filesystem used by the walker.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Look up a single path without following a final symlink.
    async fn entry(&self, path: &Path) -> io::Result<FsEntry>;

    /// List the direct children of `dir`.
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<FsEntry>>;

    /// Whether `dir` has no children. Stops at the first child found.
    async fn is_dir_empty(&self, dir: &Path) -> io::Result<bool>;

    /// Identity of the directory `path` resolves to, following symlinks.
    /// `None` when the target is not a directory.
    async fn dir_identity(&self, path: &Path) -> io::Result<Option<DirId>>;
}

/// Base name of `path`, or the path itself when it has none (`.`, `/`).
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.as_os_str().to_string_lossy().into_owned())
}
