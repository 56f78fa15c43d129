//! # Temporal Types — Calendar-Day Arithmetic
//!
//! Activity recency is measured in whole calendar days. Both the reference
//! date and the operator's last activity are normalized to midnight before
//! subtracting, so activity earlier on the same calendar day counts as zero
//! days ago regardless of time-of-day.
//!
//! ## Accepted formats
//!
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`, optionally with
//!   fractional seconds (no offset)
//! - RFC 3339 with any offset (`2026-01-15T08:30:00Z`, `...+05:30`)
//!
//! For timestamps carrying an offset, the calendar date is taken as written
//! in that offset. Converting to UTC first would shift late-evening activity
//! in eastern offsets onto the previous day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::DataError;

/// Offset-free timestamp layouts. `%.f` also matches an absent fraction.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a last-activity value into its calendar date.
///
/// # Errors
///
/// Returns [`DataError::MissingField`] for a blank value and
/// [`DataError::InvalidDate`] when no accepted format matches. Both name
/// `record_id`.
pub fn parse_activity_date(record_id: &str, raw: &str) -> Result<NaiveDate, DataError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DataError::MissingField {
            record_id: record_id.to_string(),
            field: "last_active_at",
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|e| DataError::InvalidDate {
            record_id: record_id.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Whole calendar days from `then` to `as_of`.
///
/// Negative when `then` lies after `as_of`.
pub fn days_between(as_of: NaiveDate, then: NaiveDate) -> i64 {
    as_of.signed_duration_since(then).num_days()
}
