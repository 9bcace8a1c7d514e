use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot list {}: {source}", .path.display())]
    Enumeration { path: PathBuf, source: io::Error },

    #[error("permission denied reading {}: {source}", .path.display())]
    PermissionDenied { path: PathBuf, source: io::Error },

    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("destination already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("unsafe entry name: {name:?}")]
    UnsafeName { name: String },

    #[error("no sticker source configured")]
    NoSource,

    #[error("an import is already running")]
    Busy,

    #[error("failed to start import worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("config error: {0}")]
    Config(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ImportError>;

impl ImportError {
    /// A directory listing failed.
    pub fn enumeration(path: &Path, source: io::Error) -> Self {
        ImportError::Enumeration {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Reading a source entry failed; a refused read is a permission problem.
    pub fn read(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => ImportError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => ImportError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Writing into the destination failed.
    pub fn write(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AlreadyExists => ImportError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => ImportError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ImportError::Enumeration { .. } => FailureKind::Enumeration,
            ImportError::PermissionDenied { .. } => FailureKind::PermissionDenied,
            ImportError::Io { .. } | ImportError::Spawn(_) => FailureKind::Io,
            ImportError::AlreadyExists { .. } => FailureKind::AlreadyExists,
            ImportError::UnsafeName { .. } => FailureKind::UnsafeName,
            ImportError::NoSource => FailureKind::NoSource,
            ImportError::Busy => FailureKind::Busy,
            ImportError::Config(_) => FailureKind::Config,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ImportError::Enumeration { path, .. }
            | ImportError::PermissionDenied { path, .. }
            | ImportError::Io { path, .. }
            | ImportError::AlreadyExists { path } => Some(path),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Enumeration,
    PermissionDenied,
    Io,
    AlreadyExists,
    UnsafeName,
    NoSource,
    Busy,
    Config,
}

/// Owned snapshot of an [`ImportError`], kept inside results after the
/// underlying `io::Error` is gone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub kind: FailureKind,
    pub path: Option<String>,
    pub message: String,
}

impl From<&ImportError> for ImportFailure {
    fn from(err: &ImportError) -> Self {
        ImportFailure {
            kind: err.kind(),
            path: err.path().map(|p| p.to_string_lossy().into_owned()),
            message: err.to_string(),
        }
    }
}

impl From<ImportError> for ImportFailure {
    fn from(err: ImportError) -> Self {
        ImportFailure::from(&err)
    }
}
