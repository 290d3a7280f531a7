//! # Trust Map Loading
//!
//! The `verify` subcommand takes its trust anchors from a JSON file:
//! one object mapping agent ids to base64url Ed25519 public keys.
//!
//! ```json
//! {
//!   "agent:alice": "3q2-7_...",
//!   "agent:bob": "9f8E2k..."
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use ledger_verify::TrustMap;

/// Load a trust map from a JSON file.
pub fn load_trust_map(path: &Path) -> anyhow::Result<TrustMap> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading trust map {}", path.display()))?;
    let entries: BTreeMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing trust map {}", path.display()))?;
    Ok(entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_agent_key_pairs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"agent:alice": "a2V5LWE", "agent:bob": "a2V5LWI"}}"#).unwrap();

        let trusted = load_trust_map(file.path()).unwrap();
        assert_eq!(trusted.len(), 2);
        assert_eq!(trusted.get("agent:alice"), Some("a2V5LWE"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_trust_map(Path::new("/no/such/trust.json")).unwrap_err();
        assert!(err.to_string().contains("reading trust map"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        assert!(load_trust_map(file.path()).is_err());
    }
}
