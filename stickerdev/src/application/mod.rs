pub mod handlers;

use std::process::ExitCode;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use sticker_core::error::Result;

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Choose { dir, import } => handlers::handle_choose(&cli.data_dir, dir, import),
        Commands::Reload { import } => handlers::handle_reload(&cli.data_dir, import),
        Commands::Status => handlers::handle_status(&cli.data_dir),
        Commands::Scan { dir } => handlers::handle_scan(dir),
    }
}
