use async_trait::async_trait;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::models::{DirId, EntryKind, FsEntry};

use super::{FileSystem, base_name};

pub struct RealFileSystem;

fn kind_of(file_type: fs::FileType) -> EntryKind {
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn fs_entry(path: PathBuf, name: String, metadata: &Metadata) -> FsEntry {
    let kind = kind_of(metadata.file_type());
    FsEntry {
        path,
        name,
        kind,
        size: if kind == EntryKind::File {
            metadata.len()
        } else {
            0
        },
    }
}

#[cfg(unix)]
fn dir_id(_path: &Path, metadata: &Metadata) -> io::Result<DirId> {
    use std::os::unix::fs::MetadataExt;
    Ok(DirId::Inode {
        dev: metadata.dev(),
        ino: metadata.ino(),
    })
}

#[cfg(not(unix))]
fn dir_id(path: &Path, _metadata: &Metadata) -> io::Result<DirId> {
    Ok(DirId::Path(fs::canonicalize(path)?))
}

async fn blocking<T, F>(f: F) -> io::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    task::spawn_blocking(f).await.map_err(io::Error::other)?
}

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn entry(&self, path: &Path) -> io::Result<FsEntry> {
        let metadata = tokio::fs::symlink_metadata(path).await?;
        Ok(fs_entry(path.to_path_buf(), base_name(path), &metadata))
    }

    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<FsEntry>> {
        let dir = dir.to_path_buf();
        blocking(move || {
            let mut entries = Vec::new();
            // A failure part way through fails the whole listing.
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let kind = kind_of(entry.file_type()?);
                // Only regular files carry a size; skip the extra stat otherwise.
                let size = if kind == EntryKind::File {
                    entry.metadata()?.len()
                } else {
                    0
                };

                entries.push(FsEntry {
                    path: entry.path(),
                    name: entry.file_name().to_string_lossy().into_owned(),
                    kind,
                    size,
                });
            }
            Ok(entries)
        })
        .await
    }

    async fn is_dir_empty(&self, dir: &Path) -> io::Result<bool> {
        let dir = dir.to_path_buf();
        blocking(move || Ok(fs::read_dir(&dir)?.next().is_none())).await
    }

    async fn dir_identity(&self, path: &Path) -> io::Result<Option<DirId>> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_dir() {
            return Ok(None);
        }
        dir_id(path, &metadata).map(Some)
    }
}
