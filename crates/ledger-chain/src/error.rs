//! # Chain and Storage Error Types
//!
//! All errors use `thiserror`. `StorageError` is the error type of the
//! `Storage` trait, so backend crates share one vocabulary: the session
//! layer and the verifier can react to `Closed`, `UnsignedEntry`, or
//! `ChainBroken` without knowing which engine produced them.

use ledger_core::CanonicalizationError;
use thiserror::Error;

/// Errors from building or rehydrating a chain.
#[derive(Error, Debug)]
pub enum ChainError {
    /// Attempted to sign an entry that already carries a proof.
    #[error("cannot sign already-signed entry at sequence {sequence}")]
    AlreadySigned {
        /// Sequence number of the offending entry.
        sequence: u64,
    },

    /// Canonical serialization failed while hashing or signing.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// A storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from persistent storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// An unsigned entry was handed to `Storage::append`.
    #[error("cannot persist unsigned message")]
    UnsignedEntry,

    /// The storage handle was closed; all further operations fail.
    #[error("storage is closed")]
    Closed,

    /// Reload found an entry whose `prev_hash` does not match the
    /// reconstructed predecessor.
    #[error("chain broken at sequence {sequence}")]
    ChainBroken {
        /// Sequence of the entry whose back-link failed.
        sequence: u64,
    },

    /// A stored row could not be reconstructed into an entry.
    #[error("malformed stored row: {0}")]
    Corrupt(String),

    /// The storage URI scheme is not recognized.
    #[error("unsupported storage uri: {0}")]
    UnsupportedUri(String),

    /// The `jsonl:` scheme is reserved for a future backend.
    #[error("jsonl storage scheme is reserved and not yet implemented")]
    ReservedScheme,

    /// The underlying database engine reported an error.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Filesystem-level failure (directory creation, file access).
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Canonical serialization failed while preparing a row.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_entry_message_is_stable() {
        // Callers match on this message; it is part of the storage contract.
        assert_eq!(
            format!("{}", StorageError::UnsignedEntry),
            "cannot persist unsigned message"
        );
    }

    #[test]
    fn chain_broken_names_sequence() {
        let err = StorageError::ChainBroken { sequence: 3 };
        assert_eq!(format!("{err}"), "chain broken at sequence 3");
    }

    #[test]
    fn storage_error_converts_into_chain_error() {
        let err = ChainError::from(StorageError::Closed);
        assert!(matches!(err, ChainError::Storage(StorageError::Closed)));
    }
}
