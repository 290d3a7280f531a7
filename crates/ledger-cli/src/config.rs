//! # CLI Configuration
//!
//! Database path resolution order: `--db` flag, then the
//! `LEDGER_DB_PATH` environment variable, then
//! `$HOME/.ledger/blackbox-logs.db`. The environment is consulted
//! exactly once, here, at startup.

use std::path::PathBuf;

/// Resolved configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// The database file every subcommand operates on.
    pub db_path: PathBuf,
}

impl CliConfig {
    /// Resolve configuration from an optional `--db` flag and the
    /// process environment.
    pub fn resolve(db_flag: Option<PathBuf>) -> Self {
        let db_path = db_flag
            .or_else(|| std::env::var_os("LEDGER_DB_PATH").map(PathBuf::from))
            .unwrap_or_else(default_db_path);
        Self { db_path }
    }

    /// Build a configuration for a known path, bypassing the environment.
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// The fallback database location: `$HOME/.ledger/blackbox-logs.db`.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ledger")
        .join("blackbox-logs.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins() {
        let config = CliConfig::resolve(Some(PathBuf::from("/custom/path.db")));
        assert_eq!(config.db_path, PathBuf::from("/custom/path.db"));
    }

    #[test]
    fn default_ends_with_known_name() {
        let path = default_db_path();
        assert!(path.ends_with(".ledger/blackbox-logs.db"));
    }

    #[test]
    fn with_db_path_bypasses_environment() {
        let config = CliConfig::with_db_path("/tmp/explicit.db");
        assert_eq!(config.db_path, PathBuf::from("/tmp/explicit.db"));
    }
}
