use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use sticker_core::config::{self, ConfigStore, JsonConfigStore};
use sticker_core::error::{ImportError, Result};
use sticker_core::filter::sticker_mime;
use sticker_core::report::{self, Reporter};
use sticker_core::scan::scan;
use sticker_core::source_factory::{Backend, open_source};
use sticker_core::{FailurePolicy, ImportEvent, ImportPolicy, ImportWorker, Outcome};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::presentation::cli::ImportArgs;
use crate::presentation::console::ConsoleReporter;

const CONFIG_FILE: &str = "config.json";
const STICKER_DIR: &str = "stickers";

fn open_store(data_dir: &Path) -> Result<JsonConfigStore> {
    JsonConfigStore::open(data_dir.join(CONFIG_FILE))
}

fn policy_from_args(args: &ImportArgs) -> ImportPolicy {
    ImportPolicy {
        on_error: if args.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::FailFast
        },
        max_pack_size: args.max_pack_size,
        max_stickers: args.max_stickers,
    }
}

pub fn handle_choose(data_dir: &Path, dir: PathBuf, args: ImportArgs) -> Result<ExitCode> {
    let source = dir
        .canonicalize()
        .map_err(|e| ImportError::enumeration(&dir, e))?;
    let source_path = source.to_string_lossy().into_owned();

    let mut store = open_store(data_dir)?;
    config::select_source(&mut store, &source_path, OffsetDateTime::now_utc())?;
    info!(source = %source_path, "source selected");
    import_from(data_dir, &mut store, &source_path, &args)
}

pub fn handle_reload(data_dir: &Path, args: ImportArgs) -> Result<ExitCode> {
    let mut store = open_store(data_dir)?;
    // checked before any worker starts
    let source_path = config::configured_source(&store)?;
    import_from(data_dir, &mut store, &source_path, &args)
}

fn import_from(
    data_dir: &Path,
    store: &mut dyn ConfigStore,
    source_path: &str,
    args: &ImportArgs,
) -> Result<ExitCode> {
    let mut reporter = ConsoleReporter;
    let repo = open_source(Backend::Fs, Path::new(source_path))?;

    let worker = ImportWorker::new();
    reporter.report(report::START_NOTICE);
    let task = worker.start(
        Arc::from(repo),
        data_dir.join(STICKER_DIR),
        policy_from_args(args),
    )?;

    for event in task.events() {
        match event {
            ImportEvent::Copied { path, imported } => info!(imported, path = %path, "imported"),
            ImportEvent::Skipped { path, reason } => debug!(path = %path, reason = ?reason, "skipped"),
            ImportEvent::Error(f) => warn!(kind = ?f.kind, "{}", f.message),
            ImportEvent::State(_) => {}
        }
    }
    let result = task.wait();

    config::record_result(store, &result)?;
    report::report_result(&mut reporter, &result);

    Ok(match result.outcome {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Failed | Outcome::Cancelled => ExitCode::FAILURE,
    })
}

pub fn handle_status(data_dir: &Path) -> Result<ExitCode> {
    let store = open_store(data_dir)?;
    let st = config::status(&store);
    println!(
        "source:       {}",
        st.source_path.as_deref().unwrap_or("(none selected)")
    );
    println!(
        "last update:  {}",
        st.last_update.as_deref().unwrap_or("(never)")
    );
    println!("stickers:     {}", st.imported_count);
    Ok(ExitCode::SUCCESS)
}

pub fn handle_scan(dir: PathBuf) -> Result<ExitCode> {
    let repo = open_source(Backend::Fs, &dir)?;
    let root = repo.root();
    let (mut accepted, mut skipped, mut failed) = (0usize, 0usize, 0usize);

    for item in scan(repo.as_ref(), &root) {
        match item {
            Ok(scanned) => {
                let rel = scanned.relative_path();
                match sticker_mime(&scanned.entry) {
                    Some(mime) => {
                        accepted += 1;
                        println!("import  {rel:<48} {mime}");
                    }
                    None => {
                        skipped += 1;
                        println!("skip    {rel}");
                    }
                }
            }
            Err(e) => {
                failed += 1;
                warn!(error = %e, "scan error");
                println!("error   {e}");
            }
        }
    }

    eprintln!("scan: {accepted} importable, {skipped} skipped, {failed} errors");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
