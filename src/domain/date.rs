//! Parsing export timestamps into structured dates

use crate::domain::export::GhostTimestamp;
use crate::error::{MigrateError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp into a naive UTC date-time.
///
/// Accepts RFC 3339, `YYYY-MM-DD[ T]HH:MM:SS[.f]`, bare `YYYY-MM-DD`
/// (midnight), and epoch milliseconds.
pub fn parse_timestamp(timestamp: &GhostTimestamp) -> Result<NaiveDateTime> {
    match timestamp {
        GhostTimestamp::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| MigrateError::UnparseableDate(ms.to_string())),
        GhostTimestamp::Text(text) => parse_text(text.trim())
            .ok_or_else(|| MigrateError::UnparseableDate(text.clone())),
    }
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
