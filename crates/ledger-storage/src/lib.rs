//! # ledger-storage — Persistence Backends
//!
//! Concrete implementations of the `Storage` trait from `ledger-chain`,
//! plus the URI-routing factory that callers use to pick one:
//!
//! - `sqlite://<path>` — the embedded SQL backend (`SqliteStorage`).
//! - `jsonl:<path>` — reserved for a future line-oriented backend.
//! - A bare file path — interpreted as the SQL backend.
//!
//! ## Crate Policy
//!
//! - The session layer and verifier never name a backend type; they hold
//!   `Box<dyn Storage>` produced here.
//! - Backends own their connection handles; nothing is process-global.

pub mod sqlite;

pub use sqlite::SqliteStorage;

use ledger_chain::{Storage, StorageError};

/// Open a storage backend for the given URI.
///
/// `sqlite://<path>` and bare file paths select the embedded SQL backend;
/// `jsonl:` parses but is reserved.
///
/// # Errors
///
/// `StorageError::ReservedScheme` for `jsonl:`,
/// `StorageError::UnsupportedUri` for empty input, and any backend open
/// failure.
pub fn open_storage(uri: &str) -> Result<Box<dyn Storage>, StorageError> {
    let trimmed = uri.trim();
    if let Some(path) = trimmed.strip_prefix("sqlite://") {
        Ok(Box::new(SqliteStorage::open(path)?))
    } else if trimmed.starts_with("jsonl:") {
        Err(StorageError::ReservedScheme)
    } else if trimmed.is_empty() {
        Err(StorageError::UnsupportedUri(uri.to_string()))
    } else {
        // Plain file paths route to the SQL backend.
        Ok(Box::new(SqliteStorage::open(trimmed)?))
    }
}
