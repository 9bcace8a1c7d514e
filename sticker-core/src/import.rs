//! Import run: wipe the destination, then scan, filter and copy every entry.
//!
//! A run walks `Idle → Clearing → Scanning → Copying(n) → Completed | Failed
//! | Cancelled`. The destination is cleared before anything is written, so it
//! never holds stickers from two different runs.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::copy::copy_sticker;
use crate::error::{ImportError, ImportFailure, Result};
use crate::filter::is_importable;
use crate::policy::{FailurePolicy, ImportPolicy};
use crate::scan::{ScannedEntry, scan};
use crate::source::{SourceEntry, SourceRepo};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Clearing,
    Scanning,
    /// Copying the n-th accepted entry (0-based).
    Copying(usize),
    Completed,
    Failed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unsupported,
    PackFull,
    LimitReached,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub unsupported: usize,
    pub pack_full: usize,
    pub limit_reached: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.unsupported + self.pack_full + self.limit_reached
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportEvent {
    State(ImportState),
    Copied { path: String, imported: usize },
    Skipped { path: String, reason: SkipReason },
    Error(ImportFailure),
}

/// Terminal report of one run. Immutable once built.
#[derive(Clone, Debug)]
pub struct ImportResult {
    pub imported_count: usize,
    pub outcome: Outcome,
    /// The error that aborted the run.
    pub failure: Option<ImportFailure>,
    /// Errors stepped over under [`FailurePolicy::Continue`].
    pub errors: Vec<ImportFailure>,
    pub skipped: SkipCounts,
    pub source_path: String,
    pub timestamp: OffsetDateTime,
}

impl ImportResult {
    pub fn is_completed(&self) -> bool {
        self.outcome == Outcome::Completed
    }
}

/// Shared flag checked between entries.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn run(
    repo: &dyn SourceRepo,
    root: &SourceEntry,
    destination_root: &Path,
    policy: &ImportPolicy,
    cancel: &CancelToken,
    on_event: &mut dyn FnMut(ImportEvent),
) -> ImportResult {
    let source_path = root.location.to_string_lossy().into_owned();
    info!(source = %source_path, dest = %destination_root.display(), "import started");

    let mut job = Run {
        policy,
        destination_root,
        on_event,
        imported: 0,
        attempted: 0,
        per_pack: HashMap::new(),
        skipped: SkipCounts::default(),
        errors: Vec::new(),
    };

    job.enter(ImportState::Clearing);
    if let Err(err) = clear_destination(destination_root) {
        return job.finish(Outcome::Failed, Some(err), source_path);
    }

    job.enter(ImportState::Scanning);
    let mut outcome = Outcome::Completed;
    let mut failure = None;
    for item in scan(repo, root) {
        if cancel.is_cancelled() {
            outcome = Outcome::Cancelled;
            break;
        }
        let step = item.and_then(|scanned| job.import_one(repo, &scanned));
        if let Err(err) = step {
            match policy.on_error {
                FailurePolicy::FailFast => {
                    outcome = Outcome::Failed;
                    failure = Some(err);
                    break;
                }
                FailurePolicy::Continue => job.record_error(err),
            }
        }
    }

    job.finish(outcome, failure, source_path)
}

struct Run<'a> {
    policy: &'a ImportPolicy,
    destination_root: &'a Path,
    on_event: &'a mut dyn FnMut(ImportEvent),
    imported: usize,
    attempted: usize,
    per_pack: HashMap<String, usize>,
    skipped: SkipCounts,
    errors: Vec<ImportFailure>,
}

impl Run<'_> {
    fn enter(&mut self, state: ImportState) {
        match state {
            ImportState::Copying(n) => debug!(n, "state: copying"),
            other => debug!(state = ?other, "state"),
        }
        (self.on_event)(ImportEvent::State(state));
    }

    fn import_one(&mut self, repo: &dyn SourceRepo, scanned: &ScannedEntry) -> Result<()> {
        let path = scanned.relative_path();

        if !is_importable(&scanned.entry) {
            self.skip(path, SkipReason::Unsupported);
            return Ok(());
        }
        if self
            .policy
            .max_stickers
            .is_some_and(|max| self.imported >= max)
        {
            self.skip(path, SkipReason::LimitReached);
            return Ok(());
        }
        let in_pack = self
            .per_pack
            .get(&scanned.pack_prefix)
            .copied()
            .unwrap_or(0);
        if self.policy.max_pack_size.is_some_and(|max| in_pack >= max) {
            self.skip(path, SkipReason::PackFull);
            return Ok(());
        }

        self.enter(ImportState::Copying(self.attempted));
        self.attempted += 1;
        copy_sticker(
            repo,
            &scanned.entry,
            &scanned.pack_prefix,
            self.destination_root,
        )?;

        self.imported += 1;
        *self
            .per_pack
            .entry(scanned.pack_prefix.clone())
            .or_default() += 1;
        (self.on_event)(ImportEvent::Copied {
            path,
            imported: self.imported,
        });
        Ok(())
    }

    fn skip(&mut self, path: String, reason: SkipReason) {
        match reason {
            SkipReason::Unsupported => self.skipped.unsupported += 1,
            SkipReason::PackFull => self.skipped.pack_full += 1,
            SkipReason::LimitReached => self.skipped.limit_reached += 1,
        }
        debug!(path = %path, reason = ?reason, "skipped");
        (self.on_event)(ImportEvent::Skipped { path, reason });
    }

    fn record_error(&mut self, err: ImportError) {
        warn!(error = %err, "entry failed; continuing");
        let failure = ImportFailure::from(err);
        (self.on_event)(ImportEvent::Error(failure.clone()));
        self.errors.push(failure);
    }

    fn finish(
        mut self,
        outcome: Outcome,
        failure: Option<ImportError>,
        source_path: String,
    ) -> ImportResult {
        let failure = failure.map(|err| {
            warn!(error = %err, imported = self.imported, "import aborted");
            ImportFailure::from(err)
        });
        self.enter(match outcome {
            Outcome::Completed => ImportState::Completed,
            Outcome::Failed => ImportState::Failed,
            Outcome::Cancelled => ImportState::Cancelled,
        });
        info!(
            imported = self.imported,
            skipped = self.skipped.total(),
            errors = self.errors.len(),
            outcome = ?outcome,
            "import finished"
        );
        ImportResult {
            imported_count: self.imported,
            outcome,
            failure,
            errors: self.errors,
            skipped: self.skipped,
            source_path,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

fn clear_destination(root: &Path) -> Result<()> {
    match fs::remove_dir_all(root) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(ImportError::write(root, e)),
    }
    fs::create_dir_all(root).map_err(|e| ImportError::write(root, e))
}
