//! Archive command
//!
//! Usage: tokensync archive <FILE>

use crate::config::Config;
use clap::Args;
use std::path::PathBuf;
use tokensync_store::baseline::{archive_snapshot, load_snapshot};
use tokensync_store::cas::FsStore;

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    /// Snapshot file to archive
    pub file: PathBuf,

    /// Archive root (default: `archive_dir` from config)
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,
}

/// Execute archive command
///
/// Prints the snapshot digest on stdout.
pub fn execute(args: ArchiveArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_snapshot(&args.file)?;
    let root = args
        .archive_dir
        .unwrap_or_else(|| config.archive_dir.clone());

    let digest = archive_snapshot(&FsStore::new(root), &loaded.snapshot)?;
    println!("{}", digest);
    Ok(())
}
