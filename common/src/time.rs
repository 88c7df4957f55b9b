//! Time utilities for rate timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{ValidationError, ValidationResult};

/// A timestamp with timezone (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an effective timestamp.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with offset (`2023-10-01T12:00:00+02:00`), converted to UTC
/// - naive ISO 8601 date-time (`2023-10-01T12:00:00`, optional fraction), read as UTC
/// - ISO 8601 date (`2023-10-01`), read as midnight UTC
pub fn parse_timestamp(value: &str) -> ValidationResult<Timestamp> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::UnparsableTimestamp(value.to_string()))
}
