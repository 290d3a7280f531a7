//! # `ledger export` — Session to JSONL
//!
//! Writes a session as one canonical JSON line per signed entry, proof
//! included. The lines use the same RFC 8785 serialization as digest
//! computation, so a foreign consumer can re-hash and re-verify the
//! export without consulting the database.

use std::path::PathBuf;

use clap::Args;

use ledger_chain::Storage;
use ledger_storage::SqliteStorage;

use crate::config::CliConfig;

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Session ID to export.
    pub session_id: String,

    /// Output file (default: <session_id>.jsonl).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Export a session as JSONL (one signed message per line).
pub fn run_export(args: &ExportArgs, config: &CliConfig) -> anyhow::Result<u8> {
    if !config.db_path.exists() {
        println!("Database file not found: {}", config.db_path.display());
        return Ok(1);
    }

    let storage = SqliteStorage::open(&config.db_path)?;
    let entries = match storage.load_messages(&args.session_id) {
        Ok(entries) => entries,
        Err(e) => {
            println!("Failed to load session '{}': {e}", args.session_id);
            return Ok(1);
        }
    };

    if entries.is_empty() {
        println!("No messages found for session '{}'", args.session_id);
        return Ok(0);
    }

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.jsonl", args.session_id)));

    let mut lines = String::new();
    for entry in &entries {
        let canonical = entry.canonical_bytes()?;
        lines.push_str(&String::from_utf8_lossy(canonical.as_bytes()));
        lines.push('\n');
    }
    std::fs::write(&out_path, lines)?;

    println!(
        "Exported {} messages to {}",
        entries.len(),
        out_path.display()
    );
    println!("Format: JSONL - one signed message per line");
    Ok(0)
}
