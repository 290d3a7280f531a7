//! # Session — An Ordered, Linked, Signed Sequence
//!
//! A `Session` owns the in-memory chain for one conversation and drives
//! the append lifecycle: compute the predecessor digest, build the
//! unsigned entry, seal it with the author's key, retain it, persist it.
//!
//! The design assumes a single writer per session. Appends within one
//! session object are totally ordered; each entry observes the digest of
//! every prior one. Cross-process appenders sharing a storage file
//! require external coordination.
//!
//! A persistence failure during `append` does not roll back the
//! in-memory append: the chain in memory remains valid and the failure
//! is reported through `tracing::warn!`. The next reload may miss the
//! tail; the idempotent storage insert makes a retry safe.

use ledger_crypto::AgentKeyPair;

use crate::entry::{AgentRole, Entry};
use crate::error::ChainError;
use crate::storage::Storage;

/// Manages a single conversation's append-only chain, with optional
/// persistent storage.
#[derive(Debug)]
pub struct Session {
    session_id: String,
    entries: Vec<Entry>,
    storage: Option<Box<dyn Storage>>,
}

impl Session {
    /// Construct an empty in-memory session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            entries: Vec::new(),
            storage: None,
        }
    }

    /// Construct a session backed by storage, rehydrating any entries
    /// already persisted under this session id.
    ///
    /// # Errors
    ///
    /// Propagates storage failures, including `ChainBroken` when the
    /// persisted entries no longer link.
    pub fn open(
        session_id: impl Into<String>,
        storage: Box<dyn Storage>,
    ) -> Result<Self, ChainError> {
        let session_id = session_id.into();
        let entries = storage.load_messages(&session_id)?;
        if !entries.is_empty() {
            tracing::info!(
                session_id = %session_id,
                count = entries.len(),
                "rehydrated session from storage"
            );
        }
        Ok(Self {
            session_id,
            entries,
            storage: Some(storage),
        })
    }

    /// The id scoping this chain.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Number of entries in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a `text/plain` entry. See [`Session::append_with_content_type`].
    pub fn append(
        &mut self,
        content: &str,
        role: AgentRole,
        signer: &AgentKeyPair,
        agent_id: &str,
        timestamp: &str,
    ) -> Result<Entry, ChainError> {
        self.append_with_content_type(content, role, signer, agent_id, timestamp, "text/plain")
    }

    /// Append a new entry: compute `prev_hash`, build, sign, retain,
    /// persist if storage is attached. Returns the sealed entry.
    ///
    /// A persistence failure is logged and swallowed; the in-memory
    /// chain keeps the entry and stays valid.
    pub fn append_with_content_type(
        &mut self,
        content: &str,
        role: AgentRole,
        signer: &AgentKeyPair,
        agent_id: &str,
        timestamp: &str,
        content_type: &str,
    ) -> Result<Entry, ChainError> {
        let prev_hash = match self.entries.last() {
            Some(tail) => tail.digest()?,
            None => String::new(),
        };
        let sequence = self.entries.len() as u64;

        let unsigned = Entry {
            id: Entry::derive_id(sequence, agent_id),
            timestamp: timestamp.to_string(),
            session_id: self.session_id.clone(),
            sequence,
            agent_id: agent_id.to_string(),
            agent_role: role,
            content: content.to_string(),
            content_type: content_type.to_string(),
            prev_hash,
            proof: None,
        };

        let signed = unsigned.sign(signer)?;
        self.entries.push(signed.clone());

        if let Some(storage) = self.storage.as_mut() {
            if let Err(error) = storage.append(&signed) {
                tracing::warn!(
                    session_id = %self.session_id,
                    sequence,
                    %error,
                    "failed to persist entry; in-memory chain remains valid"
                );
            }
        }

        Ok(signed)
    }

    /// An owned copy of the full signed chain.
    pub fn chain(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Borrowed view of the chain.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Digest of the tail entry, or `None` for an empty chain. The next
    /// append will carry this value as `prev_hash`.
    pub fn last_hash(&self) -> Result<Option<String>, ChainError> {
        match self.entries.last() {
            Some(tail) => Ok(Some(tail.digest()?)),
            None => Ok(None),
        }
    }

    /// Release storage resources. Further appends are in-memory only.
    pub fn close(&mut self) -> Result<(), ChainError> {
        if let Some(mut storage) = self.storage.take() {
            storage.close()?;
            tracing::debug!(session_id = %self.session_id, "storage closed");
        }
        Ok(())
    }
}
