//! ISO-8601 UTC timestamp handling.
//!
//! Timestamps are persisted as strings with constant millisecond precision,
//! e.g. `2024-01-01T00:00:00.000Z`. Because precision is constant and the
//! zone is always UTC, lexicographic string comparison is equivalent to
//! temporal comparison; recent-window checks throughout the system use plain
//! string `>=` against a formatted cutoff.

use chrono::{DateTime, Utc};

/// Format string used for every persisted timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a UTC instant into the canonical persisted representation.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a persisted timestamp back into a UTC instant.
///
/// Accepts any RFC 3339 string, not just the canonical form, so records
/// written by other producers still parse.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
