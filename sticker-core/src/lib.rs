#![forbid(unsafe_code)]

pub mod config;
pub mod copy;
pub mod error;
pub mod filter;
pub mod import;
pub mod mime;
pub mod policy;
pub mod report;
pub mod scan;
pub mod source;
pub mod source_factory;
pub mod source_fs;
pub mod worker;

// Re-exports: stable API surface
pub use error::{FailureKind, ImportError, ImportFailure, Result};
pub use import::{CancelToken, ImportEvent, ImportResult, ImportState, Outcome, run};
pub use policy::{FailurePolicy, ImportPolicy};
pub use source::{SourceEntry, SourceRepo};
pub use worker::{ImportTask, ImportWorker};
