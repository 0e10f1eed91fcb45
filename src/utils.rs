use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses a catalog close date.
///
/// Accepts `YYYY-MM-DD` (interpreted as midnight UTC), full RFC 3339
/// timestamps, and offset-less `YYYY-MM-DDTHH:MM:SS` timestamps (read as UTC).
/// Blank or malformed values yield `None`, which callers treat as
/// "no deadline".
pub fn parse_close_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

/// Parses a `--now` override: a date or an RFC 3339 timestamp.
pub fn parse_now(raw: &str) -> Option<DateTime<Utc>> {
    parse_close_date(raw)
}

/// Returns `"s"` when `count` needs a plural noun.
pub fn plural_suffix(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
