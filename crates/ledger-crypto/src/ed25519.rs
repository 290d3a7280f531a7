//! # Ed25519 Keys — Signing and Verification
//!
//! Agent identity in an attested log is an Ed25519 keypair. The signing
//! half seals entries; the verifying half is exported as base64url and
//! distributed through trust maps to offline verifiers.
//!
//! ## Security Invariant
//!
//! - `AgentKeyPair::sign` accepts `&CanonicalBytes` only, so a signature
//!   always covers RFC 8785 canonical output and verifies identically in
//!   any conforming implementation.
//! - `AgentVerifyKey::verify_bytes` never panics and never errors: a
//!   wrong-length or corrupt signature simply fails verification.

use ed25519_dalek::{Signer, Verifier};
use ledger_core::{b64url_decode, b64url_encode, CanonicalBytes};

use crate::error::CryptoError;

/// An Ed25519 signature (64 bytes) over canonical bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as unpadded base64url, the proof wire form.
    pub fn to_b64url(&self) -> String {
        b64url_encode(&self.0)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", &self.to_b64url()[..8])
    }
}

/// An Ed25519 keypair for signing log entries.
///
/// Does not implement `Serialize` — private keys must not be accidentally
/// written into logs, exports, or storage.
pub struct AgentKeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl AgentKeyPair {
    /// Generate a new random Ed25519 keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Derive a keypair from a raw 32-byte seed.
    ///
    /// Deterministic: the same seed always produces the same keypair.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Sign canonical bytes, producing a 64-byte Ed25519 signature.
    pub fn sign(&self, data: &CanonicalBytes) -> Signature {
        let sig = self.signing_key.sign(data.as_bytes());
        Signature(sig.to_bytes())
    }

    /// Export the public key as unpadded base64url.
    ///
    /// This is the form trust maps and proof `verification_method` fields
    /// carry.
    pub fn public_key_b64url(&self) -> String {
        b64url_encode(self.signing_key.verifying_key().as_bytes())
    }

    /// The verify-only half of this keypair.
    pub fn verify_key(&self) -> AgentVerifyKey {
        AgentVerifyKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }
}

impl std::fmt::Debug for AgentKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AgentKeyPair(<private>)")
    }
}

/// A verify-only Ed25519 key, typically imported from a trust map.
#[derive(Clone)]
pub struct AgentVerifyKey {
    verifying_key: ed25519_dalek::VerifyingKey,
}

impl AgentVerifyKey {
    /// Import a public key from its unpadded base64url form.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encoding` for invalid base64url and
    /// `CryptoError::InvalidPublicKey` for byte sequences that are not a
    /// valid 32-byte Ed25519 point.
    pub fn from_public_b64url(s: &str) -> Result<Self, CryptoError> {
        let bytes = b64url_decode(s)?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidPublicKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { verifying_key })
    }

    /// Export back to unpadded base64url.
    pub fn to_b64url(&self) -> String {
        b64url_encode(self.verifying_key.as_bytes())
    }

    /// Verify a signature over canonical bytes.
    ///
    /// Returns `false` for wrong-length signatures, corrupt signatures,
    /// and genuine mismatches alike; this function never errors.
    pub fn verify_bytes(&self, signature: &[u8], message: &CanonicalBytes) -> bool {
        let Ok(sig_arr) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&sig_arr);
        self.verifying_key.verify(message.as_bytes(), &sig).is_ok()
    }
}

impl std::fmt::Debug for AgentVerifyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AgentVerifyKey({}...)", &self.to_b64url()[..8])
    }
}
