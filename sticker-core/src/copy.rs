use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{ImportError, Result};
use crate::source::{SourceEntry, SourceRepo};

const COPY_BUF: usize = 64 * 1024;

/// `destination_root / pack_prefix / name`, refusing names that would escape the root.
pub fn destination_for(destination_root: &Path, pack_prefix: &str, name: &str) -> Result<PathBuf> {
    let mut out = destination_root.to_path_buf();
    let pack = pack_prefix.trim_end_matches('/');
    if !pack.is_empty() {
        out.push(safe_component(pack)?);
    }
    out.push(safe_component(name)?);
    Ok(out)
}

fn safe_component(name: &str) -> Result<&str> {
    let unsafe_name = || ImportError::UnsafeName {
        name: name.to_string(),
    };
    if name.contains('/') || name.contains('\\') {
        return Err(unsafe_name());
    }
    let mut comps = Path::new(name).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(unsafe_name()),
    }
}

/// Copy one sticker into the destination tree and return the bytes written.
///
/// Bytes land in a temporary sibling first and are moved into place without
/// clobbering, so a failed copy never leaves a file at the destination path.
pub fn copy_sticker(
    repo: &dyn SourceRepo,
    entry: &SourceEntry,
    pack_prefix: &str,
    destination_root: &Path,
) -> Result<u64> {
    let dest = destination_for(destination_root, pack_prefix, &entry.name)?;
    if dest.symlink_metadata().is_ok() {
        return Err(ImportError::AlreadyExists { path: dest });
    }
    let parent = dest.parent().unwrap_or(destination_root);
    fs::create_dir_all(parent).map_err(|e| ImportError::write(parent, e))?;

    let mut reader = repo
        .open_reader(entry)
        .map_err(|e| ImportError::read(&entry.location, e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".sticker-")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| ImportError::write(parent, e))?;

    let written = stream(&mut reader, tmp.as_file_mut(), &entry.location, &dest)?;
    tmp.as_file_mut()
        .flush()
        .map_err(|e| ImportError::write(&dest, e))?;

    // Dropping `tmp` on any error above removes the partial file.
    tmp.persist_noclobber(&dest)
        .map_err(|e| ImportError::write(&dest, e.error))?;

    debug!(dest = %dest.display(), bytes = written, "copied sticker");
    Ok(written)
}

fn stream<R: Read + ?Sized, W: Write>(
    reader: &mut R,
    out: &mut W,
    src: &Path,
    dest: &Path,
) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUF];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ImportError::read(src, e)),
        };
        out.write_all(&buf[..n])
            .map_err(|e| ImportError::write(dest, e))?;
        total += n as u64;
    }
    Ok(total)
}
