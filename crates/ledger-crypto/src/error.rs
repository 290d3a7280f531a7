//! # Cryptographic Error Types
//!
//! Structured errors for key handling in `ledger-crypto`. Verification
//! itself is infallible by design (bad input verifies as `false`); only
//! key import can fail.

use ledger_core::EncodingError;
use thiserror::Error;

/// Errors from cryptographic key operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Public key bytes were not a valid Ed25519 point or had the wrong length.
    #[error("invalid Ed25519 public key: {0}")]
    InvalidPublicKey(String),

    /// base64url decoding of key material failed.
    #[error("key encoding error: {0}")]
    Encoding(#[from] EncodingError),
}
