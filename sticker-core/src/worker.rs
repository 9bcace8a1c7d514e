//! Single background worker: at most one import in flight.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::error::{ImportError, Result};
use crate::import::{CancelToken, ImportEvent, ImportResult, run};
use crate::policy::ImportPolicy;
use crate::source::SourceRepo;

#[derive(Clone, Default)]
pub struct ImportWorker {
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag however the worker thread exits.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ImportWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start importing `repo` into `destination_root` on a dedicated thread.
    ///
    /// Fails with [`ImportError::Busy`] while a previous run is in flight.
    pub fn start(
        &self,
        repo: Arc<dyn SourceRepo>,
        destination_root: PathBuf,
        policy: ImportPolicy,
    ) -> Result<ImportTask> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ImportError::Busy);
        }
        let guard = BusyGuard(self.busy.clone());

        let (tx, events) = mpsc::channel();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name("sticker-import".into())
            .spawn(move || {
                let _guard = guard;
                let root = repo.root();
                let mut emit = |ev: ImportEvent| {
                    // receiver may be gone if the caller only waits
                    let _ = tx.send(ev);
                };
                let result = run(
                    repo.as_ref(),
                    &root,
                    &destination_root,
                    &policy,
                    &token,
                    &mut emit,
                );
                info!(imported = result.imported_count, "worker done");
                result
            })
            .map_err(ImportError::Spawn)?;

        Ok(ImportTask {
            events,
            cancel,
            handle,
        })
    }
}

/// Handle to a running import.
pub struct ImportTask {
    events: Receiver<ImportEvent>,
    cancel: CancelToken,
    handle: JoinHandle<ImportResult>,
}

impl ImportTask {
    /// Progress events; the channel closes when the run ends.
    pub fn events(&self) -> &Receiver<ImportEvent> {
        &self.events
    }

    /// Request a stop; honoured before the next entry.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the run ends and take its result.
    pub fn wait(self) -> ImportResult {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
