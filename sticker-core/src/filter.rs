use crate::mime::mime_for_extension;
use crate::source::SourceEntry;

/// MIME type the entry would be imported as, if any.
pub fn sticker_mime(entry: &SourceEntry) -> Option<&'static str> {
    if entry.is_dir {
        return None;
    }
    entry.extension().and_then(mime_for_extension)
}

/// Directories are containers, never stickers.
pub fn is_importable(entry: &SourceEntry) -> bool {
    sticker_mime(entry).is_some()
}
