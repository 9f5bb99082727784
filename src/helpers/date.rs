//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats accepted for post dates, tried in order
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a post date string in one of the common front-matter formats
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 keeps the calendar date of its own offset
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

/// Format a post date in long US-English form (like "January 15, 2024")
///
/// Absent or empty input gives an empty string. Input that is not a
/// recognizable date is returned unchanged.
///
/// # Examples
/// ```ignore
/// format_date(Some("2024-01-15")) // -> "January 15, 2024"
/// ```
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date.filter(|d| !d.trim().is_empty()) else {
        return String::new();
    };

    match parse_date(raw) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => {
            tracing::debug!("Unrecognized date {:?}, leaving as is", raw);
            raw.to_string()
        }
    }
}
