mod entry;
mod size;
mod types;

pub use entry::{DirId, Entry, EntryKind, FsEntry};
pub use size::{SizeFilter, SizeOp};
pub use types::TypeSet;
