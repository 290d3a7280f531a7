//! # ledger-verify — Offline Chain Verification
//!
//! Independently validates a chain of signed entries with nothing but the
//! stored entries and a trust map (`agent_id` → base64url Ed25519 public
//! key). The verifier holds no keys of its own and never contacts the
//! writer; a hostile storage file cannot talk its way past it.
//!
//! Verification runs in three ordered phases:
//!
//! 1. **Structural** — session consistency, dense sequence numbers,
//!    proof presence.
//! 2. **Linkage** — every `prev_hash` equals the predecessor's digest.
//! 3. **Signatures** — every `proof_value` verifies over the entry's
//!    signing payload under the trust map key for its `agent_id`.
//!
//! Phase 1 failures prevent phases 2 and 3 (linkage and signature checks
//! over a structurally broken chain would only produce noise). Within a
//! phase, ALL failures are reported, not just the first.

pub mod verifier;

pub use verifier::{
    verify_chain_links, FailureCategory, TrustMap, VerificationFailure, VerificationResult,
    Verifier, VerifyError,
};
