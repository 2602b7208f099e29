//! Loose date parsing for feed `pubDate` values.
//!
//! Feeds disagree on date formats. [`parse_date`] tries the common ones and
//! [`normalize_date`] falls back to a caller-supplied "now" when nothing fits.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing zone abbreviation, e.g. `Tue, 06 May 2025 14:30:00 CEST`.
static ZONE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<stamp>.+?)\s+\(?(?P<zone>[A-Za-z]{1,5})\)?$").expect("zone pattern is valid")
});

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%a, %d %b %Y",
];

/// Offset in hours for the zone abbreviations feeds use in practice.
fn zone_offset_hours(zone: &str) -> Option<i32> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "Z" | "UT" | "UTC" | "GMT" | "WET" => 0,
        "CET" | "BST" | "WEST" => 1,
        "CEST" | "EET" => 2,
        "EEST" => 3,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => return None,
    };
    Some(hours)
}

/// Parse a loosely formatted date string.
///
/// Tries, in order: RFC 2822, RFC 3339, ISO 8601 with numeric offset, a
/// naive timestamp followed by a known zone abbreviation, and finally naive
/// date-times and dates, which are taken as UTC.
///
/// # Returns
///
/// `None` when the string is empty or matches no known format.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Some(caps) = ZONE_SUFFIX.captures(s) {
        if let Some(hours) = zone_offset_hours(&caps["zone"]) {
            if let (Some(naive), Some(offset)) = (
                parse_naive(&caps["stamp"]),
                FixedOffset::east_opt(hours * 3600),
            ) {
                if let Some(dt) = offset.from_local_datetime(&naive).single() {
                    return Some(dt.with_timezone(&Utc));
                }
            }
        }
    }

    parse_naive(s).map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse `raw`, falling back to `fallback` when it cannot be parsed.
///
/// # Returns
///
/// The normalized timestamp and whether the fallback was used.
pub fn normalize_date(raw: &str, fallback: DateTime<Utc>) -> (DateTime<Utc>, bool) {
    match parse_date(raw) {
        Some(dt) => (dt, false),
        None => (fallback, true),
    }
}
