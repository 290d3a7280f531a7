//! # `ledger verify` — Validate a Session
//!
//! Loads a session's chain from the database and runs the offline
//! verifier. A trust map file is required: verifying signatures against
//! nothing would report "valid" for logs nobody vouches for. The
//! `--insecure-skip-signatures` flag makes that trade explicit — it runs
//! the structural and linkage phases only and says so in the output.

use std::path::PathBuf;

use clap::Args;

use ledger_chain::Storage;
use ledger_storage::SqliteStorage;
use ledger_verify::{verify_chain_links, VerificationResult, Verifier};

use crate::config::CliConfig;
use crate::trust::load_trust_map;

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Session ID to verify.
    pub session_id: String,

    /// Path to a JSON trust map file ({"agent_id": "base64url public key"}).
    #[arg(long)]
    pub trust_keys: Option<PathBuf>,

    /// Skip signature verification; check structure and hash chain only.
    #[arg(long)]
    pub insecure_skip_signatures: bool,
}

/// Verify the integrity of a session (hash chain + signatures).
pub fn run_verify(args: &VerifyArgs, config: &CliConfig) -> anyhow::Result<u8> {
    if !config.db_path.exists() {
        println!("Database file not found: {}", config.db_path.display());
        return Ok(1);
    }

    let storage = SqliteStorage::open(&config.db_path)?;

    let result = if args.insecure_skip_signatures {
        tracing::warn!(session_id = %args.session_id, "signature verification skipped");
        println!("Warning: --insecure-skip-signatures set; signatures were NOT checked.");
        match storage.load_messages(&args.session_id) {
            Ok(chain) => verify_chain_links(&chain),
            Err(e) => {
                println!(
                    "Failed to load session '{}' from storage: {e}",
                    args.session_id
                );
                return Ok(1);
            }
        }
    } else {
        let Some(trust_path) = args.trust_keys.as_deref() else {
            println!("A trust map is required for verification.");
            println!("Pass --trust-keys <file>, or --insecure-skip-signatures to check");
            println!("structure and hash chain only.");
            return Ok(1);
        };
        let trusted = load_trust_map(trust_path)?;
        let verifier = Verifier::new(trusted)?;
        verifier.verify_from_storage(&args.session_id, &storage)
    };

    Ok(report(&args.session_id, &result))
}

fn report(session_id: &str, result: &VerificationResult) -> u8 {
    if result.is_valid {
        println!("Session '{session_id}' is valid");
        println!("  {}", result.summary);
        0
    } else {
        println!("Verification failed for session '{session_id}'");
        for failure in &result.failures {
            println!("  [{}] {}: {}", failure.index, failure.category, failure.message);
        }
        1
    }
}
