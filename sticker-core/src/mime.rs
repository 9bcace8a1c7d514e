//! Extension → MIME type table for files the keyboard can render.

const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("apng", "image/apng"),
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("heif", "image/heif"),
    ("heic", "image/heic"),
    ("svg", "image/svg+xml"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("3gp", "video/3gpp"),
    ("mkv", "video/x-matroska"),
];

/// Look up the MIME type for an extension (without the dot). ASCII case is ignored.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    MIME_TABLE
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    MIME_TABLE.iter().map(|(e, _)| *e)
}
