//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to millisecond
//! precision. Every timestamp the library produces — entry timestamps and
//! proof `created` fields — renders through this type as ISO-8601 with a
//! trailing `Z` (e.g. `2026-01-31T14:00:00.000Z`).
//!
//! The verifier treats timestamps as opaque strings; this type exists so
//! that producers agree on one format. Local timezone offsets would
//! produce different canonical byte sequences for the same instant.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CanonicalizationError;

/// A UTC timestamp truncated to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-millisecond precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let nanos = dt.nanosecond();
        let truncated = dt
            .with_nanosecond(nanos - nanos % 1_000_000)
            .unwrap_or(dt);
        Self(truncated)
    }

    /// Parse an ISO-8601 / RFC 3339 string, normalizing to UTC milliseconds.
    pub fn parse(s: &str) -> Result<Self, CanonicalizationError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CanonicalizationError::InvalidTimestamp(e.to_string()))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO-8601 with millisecond precision and trailing `Z`
    /// (e.g. `2026-01-31T14:00:00.000Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
