use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::source::{SourceEntry, SourceRepo};

/// Source tree backed by a local directory.
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        let md = fs::metadata(&root)?;
        if !md.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a directory: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl SourceRepo for FsSource {
    fn root(&self) -> SourceEntry {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.to_string_lossy().into_owned());
        SourceEntry::dir(name, self.root.clone())
    }

    fn list_children(&self, dir: &SourceEntry) -> io::Result<Vec<SourceEntry>> {
        // walkdir skips unreadable roots silently at min_depth 1; probe first
        fs::read_dir(&dir.location)?;

        let mut out = Vec::new();
        for entry in WalkDir::new(&dir.location)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            out.push(SourceEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().is_dir(),
                location: entry.into_path(),
            });
        }
        Ok(out)
    }

    fn open_reader(&self, entry: &SourceEntry) -> io::Result<Box<dyn Read + Send + '_>> {
        let f = File::open(&entry.location)?;
        Ok(Box::new(f))
    }
}
