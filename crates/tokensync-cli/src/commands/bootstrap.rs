//! Bootstrap command
//!
//! Usage: tokensync bootstrap <DIR> --output <FILE> [--source <LABEL>]

use clap::Args;
use std::path::PathBuf;
use tokensync_store::baseline::save_snapshot;
use tokensync_store::bootstrap::export_directory;

#[derive(Debug, Args)]
pub struct BootstrapArgs {
    /// Directory containing token source files (*.json, *.yaml, *.yml)
    pub dir: PathBuf,

    /// Snapshot file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Source label recorded in the snapshot metadata
    #[arg(long, default_value = "local")]
    pub source: String,
}

/// Execute bootstrap command
pub fn execute(args: BootstrapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = export_directory(&args.dir, &args.source)?;
    save_snapshot(&args.output, &snapshot)?;

    println!(
        "✓ Exported {} entries to {}",
        snapshot.len(),
        args.output.display()
    );
    Ok(())
}
