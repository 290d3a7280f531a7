//! # ledger-cli — Inspect, Verify, Export
//!
//! Subcommand handlers for the `ledger` binary. Each module owns one
//! subcommand and returns a process exit code, so handlers are testable
//! without spawning the binary:
//!
//! - `sessions` — list recorded sessions with counts and last activity.
//! - `messages` — show the most recent entries of a session.
//! - `verify` — validate a session's chain and signatures against a
//!   trust map file.
//! - `export` — write a session as JSONL, one canonical signed entry per
//!   line.
//!
//! Handlers consume only the public interfaces of the lower crates; all
//! database access goes through `ledger-storage`, all validation through
//! `ledger-verify`. Configuration is an explicit [`config::CliConfig`]
//! value — the environment is read once at startup, never from library
//! code.

pub mod config;
pub mod export;
pub mod messages;
pub mod sessions;
pub mod trust;
pub mod verify;
