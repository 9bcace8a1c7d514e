use std::path::Path;

use crate::error::{ImportError, Result};
use crate::source::SourceRepo;
use crate::source_fs::FsSource;

pub enum Backend {
    Fs,
}

pub fn open_source(backend: Backend, path: &Path) -> Result<Box<dyn SourceRepo>> {
    match backend {
        Backend::Fs => {
            let src = FsSource::new(path).map_err(|e| ImportError::enumeration(path, e))?;
            Ok(Box::new(src))
        }
    }
}
