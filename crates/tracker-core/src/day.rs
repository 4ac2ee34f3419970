//! Calendar-day normalization.
//!
//! Every "which day is this" question in the tracker goes through this module.
//! Stored date-times are local wall-clock values, so a day is simply the date
//! part of a [`NaiveDateTime`].

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Collapse a local date-time to its calendar day.
pub fn normalize(value: NaiveDateTime) -> NaiveDate {
    value.date()
}

/// Collapse an instant in any timezone to its local calendar day.
pub fn normalize_instant<Tz: TimeZone>(value: &DateTime<Tz>) -> NaiveDate {
    value.with_timezone(&Local).date_naive()
}

/// The current local calendar day.
pub fn today() -> NaiveDate {
    normalize_instant(&Local::now())
}

/// Midnight at the start of `day`.
pub fn start_of(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Parse a user-supplied date or date-time into local wall-clock time.
///
/// Accepted forms:
///
/// | Input | Interpretation |
/// |-------|----------------|
/// | `2026-10-20` | Local midnight |
/// | `2026-10-20T09:30`, `2026-10-20T09:30:00.250` | Local time |
/// | `2026-10-20 09:30:00` | Local time |
/// | `2026-10-20T09:30:00Z`, `...+05:00` | Converted to local time |
pub fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Local).naive_local());
    }

    if let Ok(value) = input.parse::<NaiveDateTime>() {
        return Some(value);
    }

    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    for format in FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(input, format) {
            return Some(value);
        }
    }

    input.parse::<NaiveDate>().ok().map(start_of)
}
