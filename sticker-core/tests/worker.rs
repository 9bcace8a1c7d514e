mod support;

use std::io;
use std::sync::Arc;
use std::sync::mpsc;

use sticker_core::source_fs::FsSource;
use sticker_core::{FailureKind, ImportEvent, ImportPolicy, ImportState, ImportWorker, Outcome};
use support::{MemSource, files_under, write_tree};

#[test]
fn runs_on_background_thread_and_streams_events() -> io::Result<()> {
    let tmp = tempfile::tempdir()?;
    let src_dir = write_tree(&tmp.path().join("src"), &["a.png", "Pack/b.gif", "c.txt"])?;
    let dest = tmp.path().join("stickers");

    let worker = ImportWorker::new();
    let task = worker
        .start(Arc::new(FsSource::new(&src_dir)?), dest.clone(), ImportPolicy::default())
        .expect("start");

    let events: Vec<ImportEvent> = task.events().iter().collect();
    let result = task.wait();

    assert_eq!(result.outcome, Outcome::Completed);
    assert_eq!(result.imported_count, 2);
    assert_eq!(files_under(&dest), vec!["Pack/b.gif", "a.png"]);
    assert_eq!(events.first(), Some(&ImportEvent::State(ImportState::Clearing)));
    assert_eq!(events.last(), Some(&ImportEvent::State(ImportState::Completed)));
    let copied = events
        .iter()
        .filter(|e| matches!(e, ImportEvent::Copied { .. }))
        .count();
    assert_eq!(copied, 2);
    assert!(!worker.is_busy());
    Ok(())
}

#[test]
fn second_start_is_rejected_while_running() -> io::Result<()> {
    let tmp = tempfile::tempdir()?;
    let (release, gate) = mpsc::channel();
    let src = Arc::new(MemSource::new().file("a.png", b"a").gated(gate));
    let dest = tmp.path().join("stickers");

    let worker = ImportWorker::new();
    let task = worker
        .start(src.clone(), dest.clone(), ImportPolicy::default())
        .expect("first start");
    assert!(worker.is_busy());

    let err = worker
        .start(src, dest.clone(), ImportPolicy::default())
        .err()
        .map(|e| e.kind());
    assert_eq!(err, Some(FailureKind::Busy));

    drop(release);
    let result = task.wait();
    assert_eq!(result.imported_count, 1);
    assert!(!worker.is_busy());

    let again = worker
        .start(
            Arc::new(MemSource::new().file("b.png", b"b")),
            dest.clone(),
            ImportPolicy::default(),
        )
        .expect("start after finish");
    assert!(again.wait().is_completed());
    assert_eq!(files_under(&dest), vec!["b.png"]);
    Ok(())
}

#[test]
fn cancel_keeps_only_finished_copies() -> io::Result<()> {
    let tmp = tempfile::tempdir()?;
    let (release, gate) = mpsc::sync_channel(0);
    let src = MemSource::new()
        .file("a.png", b"a")
        .file("b.png", b"b")
        .file("c.png", b"c")
        .gated(gate);
    let dest = tmp.path().join("stickers");

    let worker = ImportWorker::new();
    let task = worker
        .start(Arc::new(src), dest.clone(), ImportPolicy::default())
        .expect("start");

    // Rendezvous inside the first copy, cancel, then let that copy finish.
    release.send(()).expect("worker reached first copy");
    task.cancel();
    release.send(()).expect("worker resumes");
    drop(release);

    let result = task.wait();
    assert_eq!(result.outcome, Outcome::Cancelled);
    assert_eq!(result.imported_count, 1);
    assert_eq!(files_under(&dest), vec!["a.png"]);
    Ok(())
}
