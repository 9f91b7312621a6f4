//! Common Schema Primitives
//!
//! Shared types used across all schemas

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// ISO 8601 timestamp string
pub type Timestamp = String;

/// Parses an RFC 3339 / ISO 8601 timestamp into UTC.
///
/// Returns `None` for anything chrono cannot read; callers treat that as the
/// oldest possible instant rather than an error.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Orders two timestamps newest-first.
///
/// Unparseable timestamps sort after every parseable one; two unparseable
/// values fall back to a lexical comparison so the order stays total.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}
