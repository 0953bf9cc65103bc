use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

/// A directory child as reported by the filesystem, classified without
/// following symlinks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes for regular files, 0 for everything else.
    pub size: u64,
}

/// Filesystem-unique key for a directory, used to break symlink cycles.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DirId {
    Inode { dev: u64, ino: u64 },
    Path(PathBuf),
}

/// A node visited during traversal, together with its traversal context.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    /// Distance from the root this entry was reached from.
    pub depth: usize,
    /// Set for symlinks whose directory target is descended into.
    pub followed: bool,
    pub is_root: bool,
    /// Whether a directory has no children. Only probed when an emptiness
    /// filter is active.
    pub is_empty_dir: Option<bool>,
}

impl Entry {
    pub fn new(fs_entry: FsEntry, depth: usize) -> Self {
        Self {
            path: fs_entry.path,
            name: fs_entry.name,
            kind: fs_entry.kind,
            size: fs_entry.size,
            depth,
            followed: false,
            is_root: depth == 0,
            is_empty_dir: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.') && self.name != "." && self.name != ".."
    }
}
