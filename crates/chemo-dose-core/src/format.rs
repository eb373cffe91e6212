//! Display formatting for numbers and timestamps.

use chrono::{DateTime, Utc};

/// Placeholder for a missing or unparseable timestamp.
pub const MISSING: &str = "-";

/// Format a number with a fixed number of decimals. NaN formats as "0".
pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "0".to_string();
    }
    format!("{:.*}", decimals, value)
}

/// Describe an RFC 3339 timestamp relative to `now`: "today", "yesterday",
/// "N days ago" within a week, otherwise a short month/day.
///
/// Timestamps in the future count as today.
pub fn relative_date(stamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(date) = stamp.and_then(parse) else {
        return MISSING.to_string();
    };

    match now.signed_duration_since(date).num_days() {
        i64::MIN..=0 => "today".to_string(),
        1 => "yesterday".to_string(),
        days @ 2..=6 => format!("{days} days ago"),
        _ => date.format("%b %-d").to_string(),
    }
}

/// Format an RFC 3339 timestamp as "YYYY-MM-DD HH:MM" in its own offset.
pub fn date_time(stamp: &str) -> String {
    DateTime::parse_from_rfc3339(stamp)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| MISSING.to_string())
}

fn parse(stamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(stamp)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
