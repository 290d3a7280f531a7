//! # Storage — The Persistence Seam
//!
//! `Storage` is the trait every persistence backend implements. The
//! session layer and the offline verifier program against it; concrete
//! engines live in their own crates (`ledger-storage` provides the
//! embedded SQL backend and the URI-routing factory).
//!
//! ## Contract
//!
//! - `append` rejects unsigned entries with `StorageError::UnsignedEntry`.
//! - `load_messages` returns entries in ascending `sequence` and, as a
//!   defense-in-depth check, re-verifies each `prev_hash` against the
//!   reconstructed predecessor (`StorageError::ChainBroken` on mismatch).
//! - Re-appending an already-stored `(session_id, sequence)` is a silent
//!   no-op, so retries after a crash are idempotent.
//! - `close` is idempotent; after it, every operation fails with
//!   `StorageError::Closed`.
//!
//! Cross-process appenders sharing one database file are not coordinated
//! here; callers must keep the session-owning process unique.

use crate::entry::Entry;
use crate::error::StorageError;

/// A persistent backend for attested logs.
pub trait Storage: std::fmt::Debug {
    /// Persist one signed entry. Idempotent per `(session_id, sequence)`.
    fn append(&mut self, entry: &Entry) -> Result<(), StorageError>;

    /// Load all entries of a session in ascending `sequence`, re-checking
    /// chain linkage along the way.
    fn load_messages(&self, session_id: &str) -> Result<Vec<Entry>, StorageError>;

    /// All known session ids, ordered by most recent activity.
    fn list_sessions(&self) -> Result<Vec<String>, StorageError>;

    /// Number of stored entries for a session.
    fn message_count(&self, session_id: &str) -> Result<u64, StorageError>;

    /// Latest stored timestamp for a session, if any.
    fn latest_timestamp(&self, session_id: &str) -> Result<Option<String>, StorageError>;

    /// The newest `limit` entries of a session, in ascending `sequence`.
    ///
    /// Unlike `load_messages` this is a window, so no linkage check runs:
    /// the window's first entry has no predecessor to check against.
    fn recent(&self, session_id: &str, limit: u64) -> Result<Vec<Entry>, StorageError>;

    /// Release underlying resources. Idempotent.
    fn close(&mut self) -> Result<(), StorageError>;
}
