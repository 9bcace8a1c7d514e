//! Two-level enumeration of a sticker source.
//!
//! Top-level files are standalone stickers; top-level directories are packs
//! whose immediate children are yielded with a `"<pack>/"` prefix. Nothing
//! below a pack is ever listed.

use tracing::debug;

use crate::error::{ImportError, Result};
use crate::source::{SourceEntry, SourceRepo};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedEntry {
    pub entry: SourceEntry,
    /// `""` for top-level stickers, `"<pack>/"` inside a pack.
    pub pack_prefix: String,
}

impl ScannedEntry {
    /// Path relative to the destination root, `/`-separated.
    pub fn relative_path(&self) -> String {
        format!("{}{}", self.pack_prefix, self.entry.name)
    }
}

/// Lazy scan over a source tree. Directories are listed as the scan reaches
/// them; call [`scan`] again to restart.
pub struct Scan<'a> {
    repo: &'a dyn SourceRepo,
    root: SourceEntry,
    top: Option<std::vec::IntoIter<SourceEntry>>,
    pack: Option<(String, std::vec::IntoIter<SourceEntry>)>,
    done: bool,
}

pub fn scan<'a>(repo: &'a dyn SourceRepo, root: &SourceEntry) -> Scan<'a> {
    Scan {
        repo,
        root: root.clone(),
        top: None,
        pack: None,
        done: false,
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<ScannedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some((prefix, children)) = &mut self.pack {
                if let Some(entry) = children.next() {
                    return Some(Ok(ScannedEntry {
                        entry,
                        pack_prefix: prefix.clone(),
                    }));
                }
                self.pack = None;
            }

            if self.top.is_none() {
                match self.repo.list_children(&self.root) {
                    Ok(children) => {
                        debug!(root = %self.root.location.display(), entries = children.len(), "listed source root");
                        self.top = Some(children.into_iter());
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(ImportError::enumeration(&self.root.location, e)));
                    }
                }
            }

            let Some(child) = self.top.as_mut().and_then(|top| top.next()) else {
                self.done = true;
                return None;
            };

            if !child.is_dir {
                return Some(Ok(ScannedEntry {
                    entry: child,
                    pack_prefix: String::new(),
                }));
            }

            match self.repo.list_children(&child) {
                Ok(children) => {
                    debug!(pack = %child.name, entries = children.len(), "listed pack");
                    self.pack = Some((format!("{}/", child.name), children.into_iter()));
                }
                // The failing pack is reported; the scan moves on to the next top-level child.
                Err(e) => return Some(Err(ImportError::enumeration(&child.location, e))),
            }
        }
    }
}
