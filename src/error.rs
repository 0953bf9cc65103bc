use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Non-fatal problems met while walking. The walk continues past each one.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot access '{}': {source}", .path.display())]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read directory '{}': Permission denied", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("cannot read directory '{}': {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Classify a failed directory listing.
    pub fn from_read(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::ReadFailure { path, source }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::RootNotFound { path, .. }
            | Self::PermissionDenied { path }
            | Self::ReadFailure { path, .. } => path,
        }
    }
}

/// Rejections raised while building a filter, before any I/O happens.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum FilterSpecError {
    #[error("-name and -iname cannot be combined")]
    ConflictingNamePatterns,

    #[error("invalid -type '{0}': expected f, d or l")]
    UnknownType(String),

    #[error("invalid -type '{0}': type listed more than once")]
    DuplicateType(String),

    #[error("invalid -size '{expr}': {reason}")]
    InvalidSize { expr: String, reason: &'static str },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
