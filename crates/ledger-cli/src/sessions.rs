//! # `ledger sessions` — List Recorded Sessions
//!
//! Prints every session in the database with its message count and last
//! activity, most recently active first.

use ledger_chain::Storage;
use ledger_storage::SqliteStorage;

use crate::config::CliConfig;

/// List all recorded sessions with message counts and last activity.
pub fn run_sessions(config: &CliConfig) -> anyhow::Result<u8> {
    if !config.db_path.exists() {
        println!("Database file not found: {}", config.db_path.display());
        println!("To get started:");
        println!("  - run an agent session or demo first (creates and populates the DB)");
        println!("  - set LEDGER_DB_PATH=/path/to/your.db");
        println!("  - or pass --db /custom/path.db");
        return Ok(1);
    }

    let storage = SqliteStorage::open(&config.db_path)?;
    let session_ids = storage.list_sessions()?;

    if session_ids.is_empty() {
        println!("No sessions found in database.");
        println!("  (DB exists but no logged messages yet)");
        return Ok(0);
    }

    println!("{:<40} {:>8}  {}", "SESSION ID", "MESSAGES", "LAST ACTIVITY");
    for session_id in &session_ids {
        let count = storage.message_count(session_id)?;
        let last = storage
            .latest_timestamp(session_id)?
            .unwrap_or_else(|| "-".to_string());
        println!("{session_id:<40} {count:>8}  {last}");
    }

    Ok(0)
}
