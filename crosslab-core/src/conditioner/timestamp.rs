//! Timestamp parsing with day-first resolution of ambiguous dates.
//!
//! Everything is normalized to UTC so rows from mixed offsets sort
//! correctly. Accepted forms, tried in order:
//! 1. RFC 3339 / ISO 8601 with offset (`2020-01-02T09:30:00+02:00`)
//! 2. Year-first naive date-times and dates (`2020-01-02 09:30`, `2020-01-02`)
//! 3. Day-first numeric dates with `-`, `/` or `.` separators
//!    (`01-02-2020` is 1 February 2020, `01-02-20` the same day)
//! 4. Integer Unix epoch seconds

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// `%Y` accepts fewer than four digits; shorter years are a misread
/// two-digit form and must not match.
const MIN_YEAR: i32 = 1000;

const YEAR_FIRST_DATETIME: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const YEAR_FIRST_DATE: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

const DAY_FIRST_DATETIME: &[&str] = &[
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M",
    "%d-%m-%y %H:%M:%S",
    "%d/%m/%y %H:%M:%S",
    "%d.%m.%y %H:%M:%S",
];

const DAY_FIRST_DATE: &[&str] = &[
    "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%y", "%d/%m/%y", "%d.%m.%y",
];

const WITH_OFFSET: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
];

/// Parse a timestamp string to UTC. Returns `None` when no form matches.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            if dt.year() >= MIN_YEAR {
                return Some(dt.with_timezone(&Utc));
            }
        }
    }

    // A trailing 'Z' on an otherwise naive timestamp means UTC.
    let naive = s.strip_suffix('Z').unwrap_or(s);
    if let Some(dt) = parse_naive(naive, YEAR_FIRST_DATETIME, YEAR_FIRST_DATE) {
        return Some(dt);
    }
    if let Some(dt) = parse_naive(naive, DAY_FIRST_DATETIME, DAY_FIRST_DATE) {
        return Some(dt);
    }

    parse_epoch_seconds(s)
}

fn parse_naive(s: &str, datetimes: &[&str], dates: &[&str]) -> Option<DateTime<Utc>> {
    for fmt in datetimes {
        match NaiveDateTime::parse_from_str(s, fmt) {
            Ok(ndt) if ndt.year() >= MIN_YEAR => return Some(Utc.from_utc_datetime(&ndt)),
            _ => {}
        }
    }
    for fmt in dates {
        match NaiveDate::parse_from_str(s, fmt) {
            Ok(date) if date.year() >= MIN_YEAR => {
                return date.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
            }
            _ => {}
        }
    }
    None
}

fn parse_epoch_seconds(s: &str) -> Option<DateTime<Utc>> {
    // Only plain integers: "20200102" is caught earlier as a compact date.
    if !s.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return None;
    }
    let secs: i64 = s.parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}
