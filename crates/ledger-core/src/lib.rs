//! # ledger-core — Foundational Types for the Attested-Log Stack
//!
//! This crate is the bedrock of the ledger workspace. It defines the
//! primitives every other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL digest and signing input flows
//!    through `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for
//!    digests. Ever. Two processes that canonicalize the same logical
//!    entry must produce byte-identical output, or chain linkage and
//!    signature verification silently diverge across implementations.
//!
//! 2. **`sha256_hex()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every digest path flows through canonicalization.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with a
//!    trailing `Z` and millisecond precision — the wire format of every
//!    timestamp the library produces.
//!
//! 4. **base64url for binary material.** Signatures and public keys travel
//!    as URL-safe base64 with padding stripped; `encoding` is the single
//!    encode/decode path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ledger-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::sha256_hex;
pub use encoding::{b64url_decode, b64url_encode};
pub use error::{CanonicalizationError, EncodingError};
pub use temporal::Timestamp;
