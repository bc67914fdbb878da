//! Compare command
//!
//! Usage: tokensync compare --current <FILE> [--previous <FILE>] [--format summary|markdown|json]
//!        [--output <FILE>] [--allow-breaking] [--update-baseline]

use crate::config::Config;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokensync_core::diff::{
    compare, get_change_counts, has_breaking_changes, render_console_summary,
    render_markdown_report, ChangeCounts, Comparison, ComparisonRegime, ComparisonResult,
};
use tokensync_store::baseline::{archive_snapshot, load_snapshot, save_snapshot};
use tokensync_store::cas::FsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Summary,
    Markdown,
    Json,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Baseline snapshot (default: `baseline` from config)
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Snapshot to compare against the baseline
    #[arg(long)]
    pub current: PathBuf,

    /// Report format (default: `format` from config)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not fail on breaking changes
    #[arg(long)]
    pub allow_breaking: bool,

    /// Archive the baseline and replace it with the current snapshot when the
    /// gate passes
    #[arg(long)]
    pub update_baseline: bool,
}

/// The publish gate refused: breaking changes without an override
#[derive(Debug)]
pub struct BreakingChangesBlocked {
    pub breaking: usize,
}

impl std::fmt::Display for BreakingChangesBlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} breaking change(s) detected; rerun with --allow-breaking to accept them",
            self.breaking
        )
    }
}

impl std::error::Error for BreakingChangesBlocked {}

/// Machine-readable report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    regime: ComparisonRegime,
    counts: ChangeCounts,
    breaking: bool,
    result: &'a ComparisonResult,
    issues: Vec<String>,
}

/// Render a comparison in the requested format
pub fn render(comparison: &Comparison, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Summary => Ok(render_console_summary(&comparison.result)),
        OutputFormat::Markdown => Ok(render_markdown_report(&comparison.result)),
        OutputFormat::Json => {
            let report = JsonReport {
                regime: comparison.regime,
                counts: get_change_counts(&comparison.result),
                breaking: has_breaking_changes(&comparison.result),
                result: &comparison.result,
                issues: comparison.issues.iter().map(|i| i.to_string()).collect(),
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Execute compare command
pub fn execute(args: CompareArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let previous_path = args.previous.unwrap_or_else(|| config.baseline.clone());
    let format = args.format.unwrap_or(config.format);
    let allow_breaking = args.allow_breaking || config.allow_breaking;

    // Load both sides
    let previous = load_snapshot(&previous_path)?;
    let current = load_snapshot(&args.current)?;
    for reject in previous.rejected.iter().chain(&current.rejected) {
        eprintln!("warning: {}", reject);
    }

    // Compare
    let comparison = compare(&previous.snapshot, &current.snapshot)?;
    for issue in &comparison.issues {
        eprintln!("warning: {}", issue);
    }

    // Output
    let report = render(&comparison, format)?;
    if let Some(output_path) = &args.output {
        std::fs::write(output_path, report)?;
        println!("✓ Report written to {}", output_path.display());
    } else {
        print!("{}", report);
    }

    // Gate
    let counts = get_change_counts(&comparison.result);
    if counts.breaking > 0 && !allow_breaking {
        return Err(Box::new(BreakingChangesBlocked {
            breaking: counts.breaking,
        }));
    }

    if args.update_baseline {
        update_baseline(&previous_path, &previous.snapshot, &current.snapshot, config)?;
    }

    Ok(())
}

fn update_baseline(
    baseline_path: &Path,
    previous: &tokensync_core::Snapshot,
    current: &tokensync_core::Snapshot,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::new(&config.archive_dir);
    let digest = archive_snapshot(&store, previous)?;
    save_snapshot(baseline_path, current)?;
    eprintln!(
        "✓ Baseline updated: {} (previous archived as {})",
        baseline_path.display(),
        digest
    );
    Ok(())
}
