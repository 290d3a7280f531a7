//! # Verifier — Structural, Linkage, and Signature Validation
//!
//! `Verifier::verify` re-derives everything the writer claimed: the
//! session scoping, the dense sequence, each predecessor digest, and each
//! Ed25519 signature over the entry's signing payload. Failures carry the
//! entry index, a category, and a human-readable message; callers get all
//! of them, not just the first.
//!
//! `verify_chain_links` runs the structural and linkage phases without a
//! trust map, for audits where no keys are available. It cannot detect
//! content tampering on its own (a forger who re-hashes the chain will
//! pass it), which is why the CLI makes skipping signatures an explicit,
//! loudly-named choice.

use std::collections::BTreeMap;

use thiserror::Error;

use ledger_chain::{Entry, Storage};
use ledger_core::b64url_decode;
use ledger_crypto::AgentVerifyKey;

/// Construction errors for [`Verifier`].
#[derive(Error, Debug)]
pub enum VerifyError {
    /// A verifier without trust anchors can prove nothing.
    #[error("trusted keys map is required")]
    EmptyTrustMap,
}

/// Trust anchors: `agent_id` → base64url Ed25519 public key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustMap(BTreeMap<String, String>);

impl TrustMap {
    /// An empty trust map. `Verifier::new` rejects it; populate first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trusted public key for an agent id.
    pub fn insert(&mut self, agent_id: impl Into<String>, public_key_b64url: impl Into<String>) {
        self.0.insert(agent_id.into(), public_key_b64url.into());
    }

    /// Look up the trusted key for an agent id.
    pub fn get(&self, agent_id: &str) -> Option<&str> {
        self.0.get(agent_id).map(String::as_str)
    }

    /// Number of trust anchors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no anchors are registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(agent_id, public_key_b64url)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TrustMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What kind of invariant a failure violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// `session_id` differs from the first entry's.
    Session,
    /// `sequence` does not match the entry's position.
    Sequence,
    /// Missing proof, untrusted key, or signature mismatch.
    Signature,
    /// `prev_hash` does not match the predecessor's digest.
    HashChain,
    /// The chain could not be loaded from storage at all.
    Storage,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCategory::Session => write!(f, "session"),
            FailureCategory::Sequence => write!(f, "sequence"),
            FailureCategory::Signature => write!(f, "signature"),
            FailureCategory::HashChain => write!(f, "hash_chain"),
            FailureCategory::Storage => write!(f, "storage"),
        }
    }
}

/// One detected violation.
#[derive(Debug, Clone)]
pub struct VerificationFailure {
    /// Position of the offending entry; `-1` for load-level failures.
    pub index: i64,
    /// The violated invariant class.
    pub category: FailureCategory,
    /// Human-readable detail.
    pub message: String,
}

impl VerificationFailure {
    fn at(index: usize, category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            index: index as i64,
            category,
            message: message.into(),
        }
    }
}

/// The outcome of a verification run.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// True when no failures were detected.
    pub is_valid: bool,
    /// One-line human-readable summary.
    pub summary: String,
    /// Every detected failure, in chain order by phase.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationResult {
    fn valid(summary: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            summary: summary.into(),
            failures: Vec::new(),
        }
    }

    fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        if failures.is_empty() {
            Self::valid("Valid chain")
        } else {
            Self {
                is_valid: false,
                summary: format!("Failed with {} issues", failures.len()),
                failures,
            }
        }
    }

    /// The first failure, if any.
    pub fn first_failure(&self) -> Option<&VerificationFailure> {
        self.failures.first()
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid {
            return write!(f, "Chain is valid");
        }
        writeln!(f, "Verification FAILED ({} issues):", self.failures.len())?;
        for failure in &self.failures {
            writeln!(
                f,
                "  [{}] {}: {}",
                failure.index, failure.category, failure.message
            )?;
        }
        Ok(())
    }
}

// ─── Phase implementations ──────────────────────────────────────────

fn structural_failures(chain: &[Entry]) -> Vec<VerificationFailure> {
    let mut failures = Vec::new();
    let session_id = &chain[0].session_id;
    for (i, entry) in chain.iter().enumerate() {
        if &entry.session_id != session_id {
            failures.push(VerificationFailure::at(
                i,
                FailureCategory::Session,
                format!("session mismatch: {}", entry.session_id),
            ));
        }
        if entry.sequence != i as u64 {
            failures.push(VerificationFailure::at(
                i,
                FailureCategory::Sequence,
                format!("sequence mismatch: expected {i}, got {}", entry.sequence),
            ));
        }
        if entry.proof.is_none() {
            failures.push(VerificationFailure::at(
                i,
                FailureCategory::Signature,
                "missing proof/signature",
            ));
        }
    }
    failures
}

fn linkage_failures(chain: &[Entry]) -> Vec<VerificationFailure> {
    let mut failures = Vec::new();
    for i in 1..chain.len() {
        match chain[i - 1].digest() {
            Ok(expected_prev) => {
                if chain[i].prev_hash != expected_prev {
                    failures.push(VerificationFailure::at(
                        i,
                        FailureCategory::HashChain,
                        "prev_hash does not match previous entry digest",
                    ));
                }
            }
            Err(e) => failures.push(VerificationFailure::at(
                i,
                FailureCategory::HashChain,
                format!("predecessor digest failed: {e}"),
            )),
        }
    }
    failures
}

/// Run the structural and linkage phases only (no trust map needed).
///
/// Cannot detect content tampering by a forger who re-links the chain;
/// use [`Verifier::verify`] for full validation.
pub fn verify_chain_links(chain: &[Entry]) -> VerificationResult {
    if chain.is_empty() {
        return VerificationResult::valid("Empty chain is valid");
    }
    let failures = structural_failures(chain);
    if !failures.is_empty() {
        return VerificationResult::from_failures(failures);
    }
    VerificationResult::from_failures(linkage_failures(chain))
}

/// Offline verifier for attested conversation logs.
///
/// Verifies a raw chain or loads one directly from storage.
#[derive(Debug, Clone)]
pub struct Verifier {
    trusted_keys: TrustMap,
}

impl Verifier {
    /// Construct a verifier over a non-empty trust map.
    ///
    /// # Errors
    ///
    /// `VerifyError::EmptyTrustMap` when no anchors are provided —
    /// signature verification against nothing would vacuously pass, so
    /// construction refuses it outright.
    pub fn new(trusted_keys: TrustMap) -> Result<Self, VerifyError> {
        if trusted_keys.is_empty() {
            return Err(VerifyError::EmptyTrustMap);
        }
        Ok(Self { trusted_keys })
    }

    /// The trust anchors this verifier checks against.
    pub fn trusted_keys(&self) -> &TrustMap {
        &self.trusted_keys
    }

    /// Verify a chain through all three phases.
    ///
    /// Empty chains are valid by convention. Phase 1 (structural)
    /// failures suppress phases 2 and 3; otherwise every failure from
    /// every phase is reported.
    pub fn verify(&self, chain: &[Entry]) -> VerificationResult {
        if chain.is_empty() {
            return VerificationResult::valid("Empty chain is valid");
        }

        let structural = structural_failures(chain);
        if !structural.is_empty() {
            return VerificationResult::from_failures(structural);
        }

        let mut failures = linkage_failures(chain);
        failures.extend(self.signature_failures(chain));
        VerificationResult::from_failures(failures)
    }

    fn signature_failures(&self, chain: &[Entry]) -> Vec<VerificationFailure> {
        let mut failures = Vec::new();
        for (i, entry) in chain.iter().enumerate() {
            // Phase 1 guarantees a proof is present.
            let Some(proof) = entry.proof.as_ref() else {
                continue;
            };

            let payload = match entry.signing_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    failures.push(VerificationFailure::at(
                        i,
                        FailureCategory::Signature,
                        format!("canonicalization failed: {e}"),
                    ));
                    continue;
                }
            };

            let signature = match b64url_decode(&proof.proof_value) {
                Ok(bytes) => bytes,
                Err(e) => {
                    failures.push(VerificationFailure::at(
                        i,
                        FailureCategory::Signature,
                        format!("malformed proof_value: {e}"),
                    ));
                    continue;
                }
            };

            let Some(public_key) = self.trusted_keys.get(&entry.agent_id) else {
                failures.push(VerificationFailure::at(
                    i,
                    FailureCategory::Signature,
                    format!("no trusted key for agent '{}'", entry.agent_id),
                ));
                continue;
            };

            match AgentVerifyKey::from_public_b64url(public_key) {
                Ok(key) => {
                    if !key.verify_bytes(&signature, &payload) {
                        failures.push(VerificationFailure::at(
                            i,
                            FailureCategory::Signature,
                            "invalid signature",
                        ));
                    }
                }
                Err(e) => failures.push(VerificationFailure::at(
                    i,
                    FailureCategory::Signature,
                    format!("key loading failed: {e}"),
                )),
            }
        }
        failures
    }

    /// Load a session from storage and verify it.
    ///
    /// A load failure (including a reload-time `ChainBroken`) produces a
    /// single `storage`-category failure at index `-1`.
    pub fn verify_from_storage(
        &self,
        session_id: &str,
        storage: &dyn Storage,
    ) -> VerificationResult {
        match storage.load_messages(session_id) {
            Ok(chain) => self.verify(&chain),
            Err(e) => VerificationResult {
                is_valid: false,
                summary: format!("Failed to load session '{session_id}' from storage: {e}"),
                failures: vec![VerificationFailure {
                    index: -1,
                    category: FailureCategory::Storage,
                    message: e.to_string(),
                }],
            },
        }
    }
}
