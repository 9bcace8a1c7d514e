use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "stickerdev CLI: import sticker directories", long_about = None)]
pub struct Cli {
    /// App data directory; holds config.json and the imported stickers/
    #[arg(long, global = true, default_value = ".sticker-data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ImportArgs {
    /// Skip entries that fail instead of aborting the whole import
    #[arg(long)]
    pub keep_going: bool,

    /// Import at most this many stickers per pack
    #[arg(long)]
    pub max_pack_size: Option<usize>,

    /// Import at most this many stickers overall
    #[arg(long)]
    pub max_stickers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a new sticker directory and import it
    Choose {
        dir: PathBuf,
        #[command(flatten)]
        import: ImportArgs,
    },

    /// Re-import from the stored sticker directory
    Reload {
        #[command(flatten)]
        import: ImportArgs,
    },

    /// Show the stored source, last update and sticker count
    Status,

    /// List what an import of `dir` would copy, without touching storage
    Scan { dir: PathBuf },
}
