use crate::error::{FailureKind, ImportError, ImportFailure};
use crate::import::{ImportResult, Outcome};

/// Surfaces user-facing text.
pub trait Reporter {
    fn report(&mut self, message: &str);
}

pub const START_NOTICE: &str =
    "Starting import. The source cannot be changed until it finishes; this might take a bit!";

pub fn describe_kind(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Enumeration => "could not list the sticker directory",
        FailureKind::PermissionDenied => "permission to read the sticker directory was lost",
        FailureKind::Io => "an I/O problem interrupted the import",
        FailureKind::AlreadyExists => "two stickers share the same name",
        FailureKind::UnsafeName => "a sticker name is not allowed",
        FailureKind::NoSource => "no sticker directory selected; choose one first",
        FailureKind::Busy => "an import is already running",
        FailureKind::Config => "settings could not be read or saved",
    }
}

fn describe_failure(failure: &ImportFailure) -> String {
    match &failure.path {
        Some(path) => format!("{} ({path})", describe_kind(failure.kind)),
        None => describe_kind(failure.kind).to_string(),
    }
}

/// Message for an error raised before or outside a run.
pub fn error_message(err: &ImportError) -> String {
    format!("{}: {err}", describe_kind(err.kind()))
}

pub fn summary(result: &ImportResult) -> String {
    let mut msg = match result.outcome {
        Outcome::Completed => format!("Imported {} stickers", result.imported_count),
        Outcome::Cancelled => format!(
            "Import cancelled after {} stickers",
            result.imported_count
        ),
        Outcome::Failed => {
            let why = result
                .failure
                .as_ref()
                .map(describe_failure)
                .unwrap_or_else(|| "unknown error".to_string());
            format!(
                "Import failed after {} stickers: {why}",
                result.imported_count
            )
        }
    };

    let skipped = &result.skipped;
    if skipped.unsupported > 0 {
        msg.push_str(&format!("; {} unsupported files skipped", skipped.unsupported));
    }
    if skipped.pack_full > 0 {
        msg.push_str(&format!("; {} skipped (pack too large)", skipped.pack_full));
    }
    if skipped.limit_reached > 0 {
        msg.push_str(&format!("; {} skipped (too many stickers)", skipped.limit_reached));
    }
    if !result.errors.is_empty() {
        msg.push_str(&format!("; {} files could not be imported", result.errors.len()));
    }
    msg
}

pub fn report_result(reporter: &mut dyn Reporter, result: &ImportResult) {
    reporter.report(&summary(result));
    for failure in &result.errors {
        reporter.report(&describe_failure(failure));
    }
}
