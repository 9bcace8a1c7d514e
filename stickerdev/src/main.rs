use std::process::ExitCode;

use sticker_core::report::error_message;
use tracing_subscriber::EnvFilter;

mod application;

mod presentation {
    pub mod cli;
    pub mod console;
}

fn main() -> ExitCode {
    // RUST_LOG overrides; default keeps per-file chatter at debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match application::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", error_message(&e));
            ExitCode::FAILURE
        }
    }
}
