use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::filter::{self, FilterSpec};
use crate::error::WalkError;
use crate::fs::FileSystem;
use crate::models::{DirId, Entry, EntryKind, FsEntry};

/// Children of one directory still waiting to be visited.
struct Frame {
    children: std::vec::IntoIter<FsEntry>,
    depth: usize,
    /// Identity of the listed directory. Only resolved while following symlinks.
    id: Option<DirId>,
}

/// Directory whose children are read on the next step, after the directory
/// itself has been handed out.
struct Pending {
    dir: PathBuf,
    depth: usize,
    id: Option<DirId>,
}

/// Depth-first, pre-order cursor over the matching entries below a list of
/// roots. Roots are walked one after another in the order given.
///
/// Each call to [`Walker::next`] resumes the walk just far enough to produce
/// the next match or diagnostic. A walker cannot be restarted; build a new
/// one for a fresh walk.
pub struct Walker<'a, F: FileSystem> {
    fs: &'a F,
    spec: &'a FilterSpec,
    roots: VecDeque<PathBuf>,
    stack: Vec<Frame>,
    pending: Option<Pending>,
    /// Targets of symlinks followed under the current root.
    visited: HashSet<DirId>,
    /// Directory roots already walked, so an aliased root is not walked twice.
    walked_roots: HashSet<DirId>,
}

/// Start a walk over `roots`. An empty root list walks `.`.
pub fn walk<'a, F: FileSystem>(
    fs: &'a F,
    roots: impl IntoIterator<Item = PathBuf>,
    spec: &'a FilterSpec,
) -> Walker<'a, F> {
    Walker::new(fs, roots, spec)
}

impl<'a, F: FileSystem> Walker<'a, F> {
    pub fn new(fs: &'a F, roots: impl IntoIterator<Item = PathBuf>, spec: &'a FilterSpec) -> Self {
        let mut unique: VecDeque<PathBuf> = VecDeque::new();
        for root in roots {
            if !unique.contains(&root) {
                unique.push_back(root);
            }
        }
        if unique.is_empty() {
            unique.push_back(PathBuf::from("."));
        }

        Self {
            fs,
            spec,
            roots: unique,
            stack: Vec::new(),
            pending: None,
            visited: HashSet::new(),
            walked_roots: HashSet::new(),
        }
    }

    /// Advance to the next matching entry or non-fatal error.
    /// Returns `None` once every root has been walked.
    pub async fn next(&mut self) -> Option<Result<Entry, WalkError>> {
        loop {
            if let Some(pending) = self.pending.take() {
                match self.fs.read_dir(&pending.dir).await {
                    Ok(mut children) => {
                        children.sort_by(|a, b| a.name.cmp(&b.name));
                        self.stack.push(Frame {
                            children: children.into_iter(),
                            depth: pending.depth,
                            id: pending.id,
                        });
                    }
                    Err(err) => return Some(Err(WalkError::from_read(pending.dir, err))),
                }
            }

            if let Some(frame) = self.stack.last_mut() {
                let depth = frame.depth + 1;
                match frame.children.next() {
                    Some(child) => {
                        if let Some(entry) = self.visit(Entry::new(child, depth)).await {
                            return Some(Ok(entry));
                        }
                    }
                    None => {
                        self.stack.pop();
                    }
                }
                continue;
            }

            let root = self.roots.pop_front()?;
            self.visited.clear();
            let fs_entry = match self.fs.entry(&root).await {
                Ok(fs_entry) => fs_entry,
                Err(source) => {
                    return Some(Err(WalkError::RootNotFound { path: root, source }));
                }
            };
            if fs_entry.kind == EntryKind::Directory && !self.first_walk_of(&fs_entry.path).await {
                debug!(path = %fs_entry.path.display(), "root already walked");
                continue;
            }
            if let Some(entry) = self.visit(Entry::new(fs_entry, 0)).await {
                return Some(Ok(entry));
            }
        }
    }

    /// Drain the walker, keeping matched paths and errors apart.
    pub async fn collect(mut self) -> (Vec<PathBuf>, Vec<WalkError>) {
        let mut paths = Vec::new();
        let mut errors = Vec::new();
        while let Some(item) = self.next().await {
            match item {
                Ok(entry) => paths.push(entry.path),
                Err(err) => errors.push(err),
            }
        }
        (paths, errors)
    }

    async fn first_walk_of(&mut self, root: &Path) -> bool {
        match self.fs.dir_identity(root).await {
            Ok(Some(id)) => self.walked_roots.insert(id),
            _ => true,
        }
    }

    /// Schedule descent if allowed and return the entry when it matches.
    async fn visit(&mut self, mut entry: Entry) -> Option<Entry> {
        self.pending = self.plan_descent(&mut entry).await;

        if self.spec.empty && entry.kind == EntryKind::Directory {
            entry.is_empty_dir = self.fs.is_dir_empty(&entry.path).await.ok();
        }

        filter::matches(&entry, self.spec).then_some(entry)
    }

    async fn plan_descent(&mut self, entry: &mut Entry) -> Option<Pending> {
        let eligible = match entry.kind {
            EntryKind::Directory => true,
            EntryKind::Symlink => self.spec.follow_symlinks,
            EntryKind::File | EntryKind::Other => false,
        };
        if !eligible {
            return None;
        }

        if filter::should_prune(entry, self.spec) {
            debug!(path = %entry.path.display(), "pruned");
            return None;
        }

        let mut pending = Pending {
            dir: entry.path.clone(),
            depth: entry.depth,
            id: None,
        };
        if !self.spec.follow_symlinks {
            return Some(pending);
        }

        let is_dir = entry.kind == EntryKind::Directory;
        let id = match self.fs.dir_identity(&entry.path).await {
            Ok(Some(id)) => id,
            Ok(None) => return is_dir.then_some(pending),
            Err(err) => {
                debug!(path = %entry.path.display(), %err, "cannot resolve link target");
                return is_dir.then_some(pending);
            }
        };

        if !is_dir {
            // A target on the current descent path, or one already reached
            // through another link, is a cycle.
            let on_path = self.stack.iter().any(|frame| frame.id.as_ref() == Some(&id));
            if on_path || !self.visited.insert(id.clone()) {
                debug!(path = %entry.path.display(), "symlink cycle, not descending");
                return None;
            }
            entry.followed = true;
        }
        pending.id = Some(id);
        Some(pending)
    }
}
