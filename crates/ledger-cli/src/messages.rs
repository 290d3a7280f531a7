//! # `ledger messages` — Show Recent Entries
//!
//! Renders the newest entries of a session in chronological order, one
//! header line plus truncated content per entry.

use clap::Args;

use ledger_chain::Storage;
use ledger_storage::SqliteStorage;

use crate::config::CliConfig;

const CONTENT_PREVIEW_CHARS: usize = 160;

/// Arguments for the `messages` subcommand.
#[derive(Args, Debug)]
pub struct MessagesArgs {
    /// Session ID to display.
    pub session_id: String,

    /// Number of recent messages to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: u64,
}

/// Show the most recent messages in a given session.
pub fn run_messages(args: &MessagesArgs, config: &CliConfig) -> anyhow::Result<u8> {
    if !config.db_path.exists() {
        println!("Database file not found: {}", config.db_path.display());
        return Ok(1);
    }

    let storage = SqliteStorage::open(&config.db_path)?;
    let entries = storage.recent(&args.session_id, args.limit)?;

    if entries.is_empty() {
        println!("No messages found for session '{}'", args.session_id);
        return Ok(0);
    }

    for entry in &entries {
        println!(
            "{:>4} | {} | {:<10} | {}",
            entry.sequence,
            entry.timestamp,
            entry.agent_role.to_string().to_uppercase(),
            entry.agent_id
        );
        println!("  {}", preview(&entry.content));
        println!("  {}", "-".repeat(90));
    }

    Ok(0)
}

fn preview(content: &str) -> String {
    let truncated: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    if content.chars().count() > CONTENT_PREVIEW_CHARS {
        format!("{truncated}...")
    } else {
        truncated
    }
}
