//! # Commit Timestamps — UTC Only
//!
//! Defines `Timestamp`, the UTC wall-clock time a ledger assigns when it
//! commits a record. Seconds precision, always UTC, rendered as ISO8601
//! with the `Z` suffix.
//!
//! Clients never supply commit timestamps — the ledger is the clock.
//! The in-memory ledger additionally clamps successive commit times so
//! that timestamp order can never disagree with commit order, even if
//! the system clock steps backwards.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A UTC timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::from_epoch_secs()`] — from a Unix timestamp (the remote
///   ledger contract reports `uint256` epoch seconds).
/// - [`Timestamp::parse()`] — from an ISO8601 string with `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// From a Unix epoch timestamp in seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ParseError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ParseError::OutOfRange(format!("unix timestamp {secs}")))?;
        Ok(Self(dt))
    }

    /// Parse from an RFC 3339 string. Only the `Z` suffix is accepted;
    /// explicit offsets are rejected so that rendered timestamps
    /// round-trip byte-identically.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if !s.ends_with('Z') {
            return Err(ParseError::OutOfRange(format!(
                "timestamp must use Z suffix (UTC only), got {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ParseError::OutOfRange(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
