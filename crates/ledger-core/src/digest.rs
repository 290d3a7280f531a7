//! # SHA-256 Digest Computation
//!
//! Computes SHA-256 digests exclusively from `CanonicalBytes`, ensuring
//! that every digest path flows through the canonicalization pipeline.
//!
//! ## Security Invariant
//!
//! The signature `sha256_hex(data: &CanonicalBytes) -> String` makes it a
//! compile error to hash raw bytes. Chain linkage (`prev_hash`) and stored
//! entry digests are lowercase hex of this function's output.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Compute the lowercase-hex SHA-256 digest of canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    let hash = Sha256::digest(data.as_bytes());
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
