//! # Entry — One Signed Unit of the Log
//!
//! Defines `Entry`, its `Proof` block, and the two canonical byte views
//! every implementation must agree on:
//!
//! - **Signing payload**: the entry with `proof` replaced by `{}`. This is
//!   what `proof_value` covers, so a signature verifies without the
//!   signature itself.
//! - **Digest**: SHA-256 over the entry with the proof block included.
//!   The successor's `prev_hash` carries this value, binding each
//!   signature into the chain.
//!
//! An unsigned entry canonicalizes with `"proof":{}`, which makes its
//! digest equal to its signing payload digest — the two views only
//! diverge once the entry is sealed.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ledger_core::{sha256_hex, CanonicalBytes, CanonicalizationError, Timestamp};
use ledger_crypto::AgentKeyPair;

use crate::error::ChainError;

/// The role an agent plays in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// A human participant.
    User,
    /// A model responding in the conversation.
    Assistant,
    /// System-level instructions or notices.
    System,
    /// Output of a tool invocation.
    Tool,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::User => write!(f, "user"),
            AgentRole::Assistant => write!(f, "assistant"),
            AgentRole::System => write!(f, "system"),
            AgentRole::Tool => write!(f, "tool"),
        }
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AgentRole::User),
            "assistant" => Ok(AgentRole::Assistant),
            "system" => Ok(AgentRole::System),
            "tool" => Ok(AgentRole::Tool),
            other => Err(format!("unknown agent role: {other:?}")),
        }
    }
}

/// The signature scheme of a proof block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 digital signature per W3C VC Data Integrity.
    Ed25519Signature2020,
}

/// The purpose of a cryptographic proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The author asserts the entry content is theirs.
    AssertionMethod,
}

/// W3C Data Integrity style signature proof.
///
/// Field names are the snake_case wire format of the log (the canonical
/// serialization hashes and signs these exact keys); only `type` is
/// renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    /// Signature scheme identifier.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// ISO-8601 timestamp of signing.
    pub created: String,

    /// base64url of the signer's Ed25519 public key.
    pub verification_method: String,

    /// Proof purpose per the Data Integrity vocabulary.
    pub proof_purpose: ProofPurpose,

    /// Unpadded base64url of the 64-byte Ed25519 signature.
    pub proof_value: String,
}

/// Single signed entry in the tamper-evident conversation chain.
///
/// All fields contribute to the entry's identity: the canonical
/// serialization covers every one of them, so any post-signing mutation
/// is detectable. `proof` is `None` until the entry is sealed; in
/// canonical form an absent proof serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Human-readable identifier derived from sequence and agent id.
    /// Identity is `(session_id, sequence)`; this is for display.
    pub id: String,

    /// ISO-8601 UTC timestamp, opaque to the verifier beyond format.
    pub timestamp: String,

    /// The session scoping this chain.
    pub session_id: String,

    /// Position in the chain; strictly `0, 1, 2, …`.
    pub sequence: u64,

    /// Key into the trust map, e.g. `agent:alice`.
    pub agent_id: String,

    /// Role of the author.
    pub agent_role: AgentRole,

    /// Payload text.
    pub content: String,

    /// MIME-style content label.
    pub content_type: String,

    /// Digest of the predecessor, or `""` for the first entry.
    pub prev_hash: String,

    /// Signature block; absent until signed.
    #[serde(
        default,
        serialize_with = "serialize_proof",
        deserialize_with = "deserialize_proof"
    )]
    pub proof: Option<Proof>,
}

impl Entry {
    /// Derive the readable entry id: `msg-{sequence:04}-{agent id suffix}`.
    ///
    /// The suffix is the last six characters of the agent id, matching the
    /// log's established id shape. Uniqueness is not load-bearing.
    pub fn derive_id(sequence: u64, agent_id: &str) -> String {
        let chars: Vec<char> = agent_id.chars().collect();
        let start = chars.len().saturating_sub(6);
        let suffix: String = chars[start..].iter().collect();
        format!("msg-{sequence:04}-{suffix}")
    }

    /// Returns true once the entry carries a proof block.
    pub fn is_signed(&self) -> bool {
        self.proof.is_some()
    }

    /// Canonical bytes of the entry as-is (proof included, `{}` if unsigned).
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// The entry digest: lowercase hex SHA-256 of the canonical bytes with
    /// the proof block included. The successor's `prev_hash` carries this.
    pub fn digest(&self) -> Result<String, CanonicalizationError> {
        Ok(sha256_hex(&self.canonical_bytes()?))
    }

    /// Canonical bytes of the entry with `proof` forced to `{}` — the
    /// message an Ed25519 signature covers.
    pub fn signing_payload(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "proof".to_string(),
                serde_json::Value::Object(serde_json::Map::new()),
            );
        }
        CanonicalBytes::new(&value)
    }

    /// Seal this entry with the signer's key.
    ///
    /// Builds a proof with `created = now`, the signer's public key as
    /// `verification_method`, and the signature over the signing payload.
    ///
    /// # Errors
    ///
    /// `ChainError::AlreadySigned` if the entry already carries a proof;
    /// entries are immutable once sealed.
    pub fn sign(self, signer: &AgentKeyPair) -> Result<Entry, ChainError> {
        if self.proof.is_some() {
            return Err(ChainError::AlreadySigned {
                sequence: self.sequence,
            });
        }
        let payload = self.signing_payload()?;
        let signature = signer.sign(&payload);
        let proof = Proof {
            proof_type: ProofType::Ed25519Signature2020,
            created: Timestamp::now().to_iso8601(),
            verification_method: signer.public_key_b64url(),
            proof_purpose: ProofPurpose::AssertionMethod,
            proof_value: signature.to_b64url(),
        };
        Ok(Entry {
            proof: Some(proof),
            ..self
        })
    }
}

fn serialize_proof<S: Serializer>(proof: &Option<Proof>, serializer: S) -> Result<S::Ok, S::Error> {
    match proof {
        Some(p) => p.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

fn deserialize_proof<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Proof>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) if map.is_empty() => Ok(None),
        _ => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any entry content signs and carries a payload that verifies
        /// under the signer's exported public key.
        #[test]
        fn sealed_entries_verify_under_exported_key(
            content in "\\PC{0,120}",
            agent_id in "[a-z:._-]{1,24}",
            seed in any::<[u8; 32]>(),
        ) {
            let keys = AgentKeyPair::from_seed(&seed);
            let entry = Entry {
                id: Entry::derive_id(0, &agent_id),
                timestamp: "2026-01-31T14:00:00.000Z".to_string(),
                session_id: "prop-sess".to_string(),
                sequence: 0,
                agent_id,
                agent_role: AgentRole::User,
                content,
                content_type: "text/plain".to_string(),
                prev_hash: String::new(),
                proof: None,
            };
            let signed = entry.sign(&keys).unwrap();
            let payload = signed.signing_payload().unwrap();
            let sig = ledger_core::b64url_decode(
                &signed.proof.as_ref().unwrap().proof_value
            ).unwrap();
            let verify_key = ledger_crypto::AgentVerifyKey::from_public_b64url(
                &keys.public_key_b64url()
            ).unwrap();
            prop_assert!(verify_key.verify_bytes(&sig, &payload));
        }

        /// JSON round-trips preserve the entry byte-for-byte in canonical form.
        #[test]
        fn canonical_form_survives_json_roundtrip(
            content in "\\PC{0,120}",
            seed in any::<[u8; 32]>(),
        ) {
            let keys = AgentKeyPair::from_seed(&seed);
            let entry = Entry {
                id: Entry::derive_id(3, "agent:prop"),
                timestamp: "2026-01-31T14:00:03.000Z".to_string(),
                session_id: "prop-sess".to_string(),
                sequence: 3,
                agent_id: "agent:prop".to_string(),
                agent_role: AgentRole::Assistant,
                content,
                content_type: "text/plain".to_string(),
                prev_hash: "ab".repeat(32),
                proof: None,
            }
            .sign(&keys)
            .unwrap();

            let json = serde_json::to_string(&entry).unwrap();
            let back: Entry = serde_json::from_str(&json).unwrap();
            let back_bytes = back.canonical_bytes().unwrap();
            let entry_bytes = entry.canonical_bytes().unwrap();
            prop_assert_eq!(
                back_bytes.as_bytes(),
                entry_bytes.as_bytes()
            );
        }
    }
}
