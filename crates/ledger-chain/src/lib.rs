//! # ledger-chain — The Append-Only Attested Log
//!
//! This crate holds the data model and lifecycle of a tamper-evident
//! conversation log:
//!
//! - **`Entry`** (`entry.rs`): one signed, sequenced unit of the log, with
//!   its W3C Data Integrity style `Proof` block, canonical digest, and
//!   signing payload.
//! - **`Session`** (`session.rs`): an ordered, hash-linked, per-entry
//!   signed sequence scoped by a session id. Appends compute the
//!   predecessor digest, seal the new entry, and persist it when a
//!   storage backend is attached.
//! - **`Storage`** (`storage.rs`): the persistence seam. Backends live in
//!   their own crates (`ledger-storage` provides the embedded SQL one)
//!   and implement this trait.
//!
//! ## Chain Invariants
//!
//! 1. Entries are immutable once signed.
//! 2. `sequence` values are exactly `0, 1, 2, …` in storage order.
//! 3. Every entry past index 0 carries `prev_hash` equal to the SHA-256
//!    of the predecessor's canonical serialization, proof included.
//! 4. Every signed entry's `proof_value` covers the canonical bytes of
//!    the entry with the proof field replaced by `{}`.
//! 5. `session_id` is identical across all entries of a session.
//!
//! The library enforces 1–3 and 5 at append time by construction; the
//! offline verifier in `ledger-verify` re-checks all five against a trust
//! map.

pub mod entry;
pub mod error;
pub mod session;
pub mod storage;

pub use entry::{AgentRole, Entry, Proof, ProofPurpose, ProofType};
pub use error::{ChainError, StorageError};
pub use session::Session;
pub use storage::Storage;
