//! # ledger CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; handlers return exit codes so they stay
//! testable without a spawned process.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ledger_cli::config::CliConfig;
use ledger_cli::export::{run_export, ExportArgs};
use ledger_cli::messages::{run_messages, MessagesArgs};
use ledger_cli::sessions::run_sessions;
use ledger_cli::verify::{run_verify, VerifyArgs};

/// Inspect, verify and export tamper-evident AI conversation logs.
#[derive(Parser, Debug)]
#[command(name = "ledger", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the SQLite database (overrides LEDGER_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all recorded sessions with message counts and last activity.
    Sessions,

    /// Show the most recent messages in a given session.
    Messages(MessagesArgs),

    /// Verify the integrity of a session (hash chain + signatures).
    Verify(VerifyArgs),

    /// Export a session as JSONL (one signed message per line).
    Export(ExportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = CliConfig::resolve(cli.db.clone());
    tracing::debug!(db_path = %config.db_path.display(), "resolved database path");

    let result = match cli.command {
        Commands::Sessions => run_sessions(&config),
        Commands::Messages(args) => run_messages(&args, &config),
        Commands::Verify(args) => run_verify(&args, &config),
        Commands::Export(args) => run_export(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
