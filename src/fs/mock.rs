use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::models::{DirId, EntryKind, FsEntry};

use super::{FileSystem, base_name};

#[derive(Clone, Debug)]
enum Response {
    Ok(Vec<FsEntry>),
    Err(io::ErrorKind, String),
}

/// Scripted filesystem for walker tests. Directories get a fresh identity
/// when their listing is registered; symlinks borrow their target's.
#[derive(Clone, Default)]
pub struct MockFileSystem {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<PathBuf, Response>,
    entries: HashMap<PathBuf, FsEntry>,
    identities: HashMap<PathBuf, DirId>,
    calls: Vec<PathBuf>,
}

impl Inner {
    fn identity_for(&mut self, path: &Path) -> DirId {
        let next = self.identities.len() as u64 + 1;
        self.identities
            .entry(path.to_path_buf())
            .or_insert(DirId::Inode { dev: 1, ino: next })
            .clone()
    }
}

impl MockFileSystem {
    pub fn set_dir_entries(&self, dir: impl Into<PathBuf>, entries: Vec<FsEntry>) {
        let dir = dir.into();
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.identity_for(&dir);
        for entry in &entries {
            inner.entries.insert(entry.path.clone(), entry.clone());
        }
        inner.responses.insert(dir, Response::Ok(entries));
    }

    pub fn set_error(&self, dir: impl Into<PathBuf>, kind: io::ErrorKind, message: impl Into<String>) {
        let dir = dir.into();
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.identity_for(&dir);
        inner.responses.insert(dir, Response::Err(kind, message.into()));
    }

    /// Make `link` resolve to the directory `target`.
    pub fn set_link_target(&self, link: impl Into<PathBuf>, target: impl AsRef<Path>) {
        let mut inner = self.inner.lock().expect("mock fs lock");
        let id = inner.identity_for(target.as_ref());
        inner.identities.insert(link.into(), id);
    }

    /// Register a standalone path, typically a walk root.
    pub fn add_entry(&self, path: impl Into<PathBuf>, kind: EntryKind, size: u64) {
        let path = path.into();
        let entry = FsEntry {
            name: base_name(&path),
            path: path.clone(),
            kind,
            size,
        };
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.entries.insert(path, entry);
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.calls.clone()
    }
}

fn missing(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no mock response for {}", path.display()),
    )
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn entry(&self, path: &Path) -> io::Result<FsEntry> {
        let inner = self.inner.lock().expect("mock fs lock");
        inner.entries.get(path).cloned().ok_or_else(|| missing(path))
    }

    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<FsEntry>> {
        let mut inner = self.inner.lock().expect("mock fs lock");
        inner.calls.push(dir.to_path_buf());

        match inner.responses.get(dir) {
            Some(Response::Ok(entries)) => Ok(entries.clone()),
            Some(Response::Err(kind, message)) => Err(io::Error::new(*kind, message.clone())),
            None => Err(missing(dir)),
        }
    }

    async fn is_dir_empty(&self, dir: &Path) -> io::Result<bool> {
        let inner = self.inner.lock().expect("mock fs lock");
        match inner.responses.get(dir) {
            Some(Response::Ok(entries)) => Ok(entries.is_empty()),
            Some(Response::Err(kind, message)) => Err(io::Error::new(*kind, message.clone())),
            None => Err(missing(dir)),
        }
    }

    async fn dir_identity(&self, path: &Path) -> io::Result<Option<DirId>> {
        let inner = self.inner.lock().expect("mock fs lock");
        if let Some(id) = inner.identities.get(path) {
            return Ok(Some(id.clone()));
        }
        match inner.entries.get(path) {
            Some(_) => Ok(None),
            None => Err(missing(path)),
        }
    }
}
