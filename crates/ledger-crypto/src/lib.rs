//! # ledger-crypto — Ed25519 Signing and Verification
//!
//! Provides the key material for attested logs:
//!
//! - **`AgentKeyPair`** — generate or derive an Ed25519 keypair, sign
//!   canonical bytes, export the public key as base64url.
//! - **`AgentVerifyKey`** — verify-only key imported from a base64url
//!   public key (the form trust maps carry).
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes` — you cannot sign raw bytes.
//!   This enforces that all signed data has been canonicalized through
//!   the RFC 8785 pipeline.
//! - Private keys are never serialized or logged. `AgentKeyPair` does not
//!   implement `Serialize` and its `Debug` output redacts the key.
//! - Verification never errors on malformed input; it returns `false`.
//!
//! ## Crate Policy
//!
//! - Depends only on `ledger-core` internally.
//! - No mocking of cryptographic operations in tests — all tests use real
//!   `CanonicalBytes`, real Ed25519.

pub mod ed25519;
pub mod error;

pub use ed25519::{AgentKeyPair, AgentVerifyKey, Signature};
pub use error::CryptoError;
