// sticker_core/src/source.rs
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Read-only view of one node in the user-selected tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
    /// Opaque handle from the backend; only the backend interprets it.
    pub location: PathBuf,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            location: location.into(),
        }
    }

    pub fn dir(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            location: location.into(),
        }
    }

    /// Text after the last `.` of the name. Dot-files like `.hidden` have none.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }
}

/// Platform access to a permission-granted directory tree.
///
/// Backends return raw `io::Error`s; the scanner and copier attach the
/// path and classify them.
pub trait SourceRepo: Send + Sync {
    fn root(&self) -> SourceEntry;

    /// Immediate children of `dir`, never recursing.
    fn list_children(&self, dir: &SourceEntry) -> io::Result<Vec<SourceEntry>>;

    fn open_reader(&self, entry: &SourceEntry) -> io::Result<Box<dyn Read + Send + '_>>;
}
