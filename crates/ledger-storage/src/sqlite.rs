//! # SqliteStorage — Embedded SQL Persistence
//!
//! One table, `messages`, keyed by `(session_id, sequence)`. Each row
//! stores the entry's canonical JSON **excluding** the proof, the proof
//! block as its own JSON column, and the entry digest (proof included),
//! so a foreign consumer can reconstruct and re-verify entries with
//! nothing but this file.
//!
//! ## Persistence Policy
//!
//! - Write-ahead-log journaling; writes auto-commit.
//! - `INSERT OR IGNORE`: re-appending an already-stored
//!   `(session_id, sequence)` is a silent no-op, making crash retries
//!   idempotent.
//! - Unsigned entries are rejected before touching the database.
//!
//! ## Reload Policy
//!
//! `load_messages` returns ascending `sequence` and re-checks every
//! `prev_hash` against the reconstructed predecessor's digest. A mismatch
//! means the file was edited out from under us; loading fails with
//! `ChainBroken` rather than handing back a chain that cannot verify.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde::Deserialize;

use ledger_chain::{Entry, Proof, Storage, StorageError};
use ledger_core::{CanonicalBytes, CanonicalizationError};

/// SQLite-backed persistent storage for attested logs.
#[derive(Debug)]
pub struct SqliteStorage {
    db_path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteStorage {
    /// Open (creating if needed) a database at `db_path`.
    ///
    /// Missing parent directories are created. The schema is bootstrapped
    /// idempotently and WAL journaling is enabled.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path).map_err(backend)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(backend)?;
        create_schema(&conn)?;

        tracing::debug!(path = %db_path.display(), "opened sqlite storage");
        Ok(Self {
            db_path,
            conn: Some(conn),
        })
    }

    /// The resolved database file path.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<&Connection, StorageError> {
        self.conn.as_ref().ok_or(StorageError::Closed)
    }
}

fn create_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS messages (
            session_id      TEXT    NOT NULL,
            sequence        INTEGER NOT NULL,
            prev_hash       TEXT    NOT NULL,
            message_hash    TEXT    NOT NULL,
            timestamp       TEXT    NOT NULL,
            agent_id        TEXT    NOT NULL,
            agent_role      TEXT    NOT NULL,
            canonical_json  TEXT    NOT NULL,
            proof_json      TEXT    NOT NULL,
            PRIMARY KEY (session_id, sequence)
        );
        CREATE INDEX IF NOT EXISTS idx_timestamp ON messages(session_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_agent     ON messages(agent_id);",
    )
    .map_err(backend)
}

fn backend(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// The subset of the `canonical_json` column the columns don't also carry.
#[derive(Deserialize)]
struct RowPayload {
    id: String,
    content: String,
    #[serde(default = "default_content_type")]
    content_type: String,
}

fn default_content_type() -> String {
    "text/plain".to_string()
}

/// One raw row, before reconstruction into an `Entry`.
struct Row {
    sequence: i64,
    prev_hash: String,
    timestamp: String,
    agent_id: String,
    agent_role: String,
    canonical_json: String,
    proof_json: String,
}

fn row_to_entry(session_id: &str, row: Row) -> Result<Entry, StorageError> {
    let payload: RowPayload = serde_json::from_str(&row.canonical_json)
        .map_err(|e| StorageError::Corrupt(format!("canonical_json: {e}")))?;
    let proof: Proof = serde_json::from_str(&row.proof_json)
        .map_err(|e| StorageError::Corrupt(format!("proof_json: {e}")))?;
    let agent_role = row
        .agent_role
        .parse()
        .map_err(StorageError::Corrupt)?;
    let sequence = u64::try_from(row.sequence)
        .map_err(|_| StorageError::Corrupt(format!("negative sequence {}", row.sequence)))?;

    Ok(Entry {
        id: payload.id,
        timestamp: row.timestamp,
        session_id: session_id.to_string(),
        sequence,
        agent_id: row.agent_id,
        agent_role,
        content: payload.content,
        content_type: payload.content_type,
        prev_hash: row.prev_hash,
        proof: Some(proof),
    })
}

const ROW_COLUMNS: &str =
    "sequence, prev_hash, timestamp, agent_id, agent_role, canonical_json, proof_json";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    Ok(Row {
        sequence: row.get(0)?,
        prev_hash: row.get(1)?,
        timestamp: row.get(2)?,
        agent_id: row.get(3)?,
        agent_role: row.get(4)?,
        canonical_json: row.get(5)?,
        proof_json: row.get(6)?,
    })
}

impl Storage for SqliteStorage {
    fn append(&mut self, entry: &Entry) -> Result<(), StorageError> {
        let Some(proof) = entry.proof.as_ref() else {
            return Err(StorageError::UnsignedEntry);
        };

        // Canonical payload excluding the proof field; the proof travels
        // in its own column.
        let mut value = serde_json::to_value(entry).map_err(CanonicalizationError::from)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("proof");
        }
        let canonical = CanonicalBytes::new(&value)?;
        let canonical_str = String::from_utf8_lossy(canonical.as_bytes()).into_owned();

        let proof_canonical = CanonicalBytes::new(proof)?;
        let proof_str = String::from_utf8_lossy(proof_canonical.as_bytes()).into_owned();

        let message_hash = entry.digest()?;

        self.conn()?
            .execute(
                "INSERT OR IGNORE INTO messages
                 (session_id, sequence, prev_hash, message_hash, timestamp,
                  agent_id, agent_role, canonical_json, proof_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    entry.session_id,
                    entry.sequence as i64,
                    entry.prev_hash,
                    message_hash,
                    entry.timestamp,
                    entry.agent_id,
                    entry.agent_role.to_string(),
                    canonical_str,
                    proof_str,
                ],
            )
            .map_err(backend)?;
        Ok(())
    }

    fn load_messages(&self, session_id: &str) -> Result<Vec<Entry>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ROW_COLUMNS} FROM messages WHERE session_id = ?1 ORDER BY sequence ASC"
            ))
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![session_id], map_row)
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<Row>>>()
            .map_err(backend)?;

        let entries = rows
            .into_iter()
            .map(|row| row_to_entry(session_id, row))
            .collect::<Result<Vec<Entry>, StorageError>>()?;

        // Defense in depth: a reload must hand back a chain that links.
        for i in 1..entries.len() {
            if entries[i].prev_hash != entries[i - 1].digest()? {
                return Err(StorageError::ChainBroken {
                    sequence: entries[i].sequence,
                });
            }
        }

        Ok(entries)
    }

    fn list_sessions(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT session_id FROM messages
                 GROUP BY session_id
                 ORDER BY MAX(timestamp) DESC",
            )
            .map_err(backend)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(backend)?;
        Ok(ids)
    }

    fn message_count(&self, session_id: &str) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn()?
            .query_row(
                "SELECT COUNT(*) FROM messages WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .map_err(backend)?;
        Ok(count as u64)
    }

    fn latest_timestamp(&self, session_id: &str) -> Result<Option<String>, StorageError> {
        self.conn()?
            .query_row(
                "SELECT MAX(timestamp) FROM messages WHERE session_id = ?1",
                params![session_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .map_err(backend)
    }

    fn recent(&self, session_id: &str, limit: u64) -> Result<Vec<Entry>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {ROW_COLUMNS} FROM messages
                 WHERE session_id = ?1
                 ORDER BY sequence DESC
                 LIMIT ?2"
            ))
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![session_id, limit as i64], map_row)
            .map_err(backend)?
            .collect::<rusqlite::Result<Vec<Row>>>()
            .map_err(backend)?;

        let mut entries = rows
            .into_iter()
            .map(|row| row_to_entry(session_id, row))
            .collect::<Result<Vec<Entry>, StorageError>>()?;
        entries.reverse(); // latest last
        Ok(entries)
    }

    fn close(&mut self) -> Result<(), StorageError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| backend(e))?;
            tracing::debug!(path = %self.db_path.display(), "closed sqlite storage");
        }
        Ok(())
    }
}

impl Drop for SqliteStorage {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = conn.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_chain::AgentRole;
    use ledger_crypto::AgentKeyPair;

    fn signed_entry(session_id: &str, sequence: u64, prev_hash: &str, content: &str) -> Entry {
        let keys = AgentKeyPair::from_seed(&[11u8; 32]);
        let unsigned = Entry {
            id: Entry::derive_id(sequence, "agent:test"),
            timestamp: format!("2026-02-13T12:00:{:02}.000Z", sequence),
            session_id: session_id.to_string(),
            sequence,
            agent_id: "agent:test".to_string(),
            agent_role: AgentRole::User,
            content: content.to_string(),
            content_type: "text/plain".to_string(),
            prev_hash: prev_hash.to_string(),
            proof: None,
        };
        unsigned.sign(&keys).unwrap()
    }

    fn temp_storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(dir.path().join("test.db")).unwrap();
        (dir, storage)
    }

    #[test]
    fn schema_has_expected_columns() {
        let (_dir, storage) = temp_storage();
        let conn = storage.conn().unwrap();
        let mut stmt = conn.prepare("PRAGMA table_info(messages)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        for expected in [
            "session_id",
            "sequence",
            "prev_hash",
            "message_hash",
            "timestamp",
            "agent_id",
            "agent_role",
            "canonical_json",
            "proof_json",
        ] {
            assert!(columns.iter().any(|c| c == expected), "missing {expected}");
        }
    }

    #[test]
    fn append_and_load_basic() {
        let (_dir, mut storage) = temp_storage();
        let entry = signed_entry("test-sess", 0, "", "Test content");
        storage.append(&entry).unwrap();

        let loaded = storage.load_messages("test-sess").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], entry);
    }

    #[test]
    fn append_unsigned_is_rejected() {
        let (_dir, mut storage) = temp_storage();
        let mut entry = signed_entry("test", 0, "", "no sig");
        entry.proof = None;
        let err = storage.append(&entry).unwrap_err();
        assert!(matches!(err, StorageError::UnsignedEntry));
        assert_eq!(format!("{err}"), "cannot persist unsigned message");
    }

    #[test]
    fn load_empty_session_is_empty() {
        let (_dir, storage) = temp_storage();
        assert!(storage.load_messages("non-existent").unwrap().is_empty());
    }

    #[test]
    fn reappend_same_sequence_is_noop() {
        let (_dir, mut storage) = temp_storage();
        let entry = signed_entry("idem", 0, "", "once");
        storage.append(&entry).unwrap();
        storage.append(&entry).unwrap();

        // A conflicting row for the same key is also ignored.
        let conflicting = signed_entry("idem", 0, "", "different content");
        storage.append(&conflicting).unwrap();

        let loaded = storage.load_messages("idem").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].content, "once");
    }

    #[test]
    fn canonical_json_column_excludes_proof() {
        let (_dir, mut storage) = temp_storage();
        let entry = signed_entry("cols", 0, "", "payload");
        storage.append(&entry).unwrap();

        let (canonical_json, proof_json): (String, String) = storage
            .conn()
            .unwrap()
            .query_row(
                "SELECT canonical_json, proof_json FROM messages WHERE session_id = 'cols'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(!canonical_json.contains("proof"));
        assert!(proof_json.contains("proof_value"));
        assert!(proof_json.contains("Ed25519Signature2020"));
    }

    #[test]
    fn message_hash_column_matches_entry_digest() {
        let (_dir, mut storage) = temp_storage();
        let entry = signed_entry("digest", 0, "", "hash me");
        storage.append(&entry).unwrap();

        let stored: String = storage
            .conn()
            .unwrap()
            .query_row(
                "SELECT message_hash FROM messages WHERE session_id = 'digest'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, entry.digest().unwrap());
    }

    #[test]
    fn load_detects_broken_chain() {
        let (_dir, mut storage) = temp_storage();
        let first = signed_entry("broken", 0, "", "first");
        let second = signed_entry("broken", 1, &"deadbeef".repeat(8), "second");
        storage.append(&first).unwrap();
        storage.append(&second).unwrap();

        let err = storage.load_messages("broken").unwrap_err();
        assert!(matches!(err, StorageError::ChainBroken { sequence: 1 }));
    }

    #[test]
    fn linked_chain_loads_cleanly() {
        let (_dir, mut storage) = temp_storage();
        let first = signed_entry("linked", 0, "", "first");
        let second = signed_entry("linked", 1, &first.digest().unwrap(), "second");
        storage.append(&first).unwrap();
        storage.append(&second).unwrap();

        let loaded = storage.load_messages("linked").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].prev_hash, loaded[0].digest().unwrap());
    }

    #[test]
    fn closed_storage_rejects_operations() {
        let (_dir, mut storage) = temp_storage();
        storage.close().unwrap();
        storage.close().unwrap(); // idempotent

        assert!(matches!(
            storage.load_messages("x").unwrap_err(),
            StorageError::Closed
        ));
        let entry = signed_entry("x", 0, "", "late");
        assert!(matches!(
            storage.append(&entry).unwrap_err(),
            StorageError::Closed
        ));
        assert!(matches!(
            storage.list_sessions().unwrap_err(),
            StorageError::Closed
        ));
    }

    #[test]
    fn list_sessions_orders_by_latest_activity() {
        let (_dir, mut storage) = temp_storage();
        // "old" finishes at 12:00:00, "new" at 12:00:05.
        storage.append(&signed_entry("old", 0, "", "a")).unwrap();
        let first = signed_entry("new", 0, "", "b");
        storage.append(&first).unwrap();
        storage
            .append(&signed_entry("new", 5, &"00".repeat(32), "c"))
            .unwrap();

        let sessions = storage.list_sessions().unwrap();
        assert_eq!(sessions, vec!["new".to_string(), "old".to_string()]);
    }

    #[test]
    fn message_count_and_latest_timestamp() {
        let (_dir, mut storage) = temp_storage();
        assert_eq!(storage.message_count("counts").unwrap(), 0);
        assert!(storage.latest_timestamp("counts").unwrap().is_none());

        let first = signed_entry("counts", 0, "", "a");
        let second = signed_entry("counts", 1, &first.digest().unwrap(), "b");
        storage.append(&first).unwrap();
        storage.append(&second).unwrap();

        assert_eq!(storage.message_count("counts").unwrap(), 2);
        assert_eq!(
            storage.latest_timestamp("counts").unwrap().unwrap(),
            second.timestamp
        );
    }

    #[test]
    fn recent_returns_newest_window_ascending() {
        let (_dir, mut storage) = temp_storage();
        let mut prev = String::new();
        for i in 0..5u64 {
            let entry = signed_entry("windowed", i, &prev, &format!("Message #{i}"));
            prev = entry.digest().unwrap();
            storage.append(&entry).unwrap();
        }

        let recent = storage.recent("windowed", 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].sequence, 3);
        assert_eq!(recent[1].sequence, 4);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("logs.db");
        let storage = SqliteStorage::open(&nested).unwrap();
        assert!(nested.exists());
        drop(storage);
    }
}
