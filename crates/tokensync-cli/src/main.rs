//! tokensync CLI
//!
//! Command-line interface for design-token baseline comparison

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokensync_core::logging_facility::{init, Profile};
use tokensync_core_types::RunContext;

mod commands;
mod config;

/// Exit code when the publish gate blocks on breaking changes
const EXIT_BREAKING: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "tokensync")]
#[command(about = "tokensync - Design token baseline comparison", long_about = None)]
struct Cli {
    /// Log output format (written to stderr)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Configuration file (default: ./tokensync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a current snapshot against the baseline
    Compare(commands::compare::CompareArgs),
    /// Export an id-less snapshot from token source files
    Bootstrap(commands::bootstrap::BootstrapArgs),
    /// Store a snapshot in the baseline archive
    Archive(commands::archive::ArchiveArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Compare(_) => "compare",
            Commands::Bootstrap(_) => "bootstrap",
            Commands::Archive(_) => "archive",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let run = RunContext::new().with_command(cli.command.name());
    let span = tracing::info_span!("run", run_id = %run.run_id, command = cli.command.name());
    let _guard = span.enter();

    let result = config::Config::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Compare(args) => commands::compare::execute(args, &config),
        Commands::Bootstrap(args) => commands::bootstrap::execute(args),
        Commands::Archive(args) => commands::archive::execute(args, &config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.is::<commands::compare::BreakingChangesBlocked>() {
            std::process::exit(EXIT_BREAKING);
        }
        std::process::exit(1);
    }
}
