use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

// Formats tried after the two ISO shapes, in order. Month-first for slashed
// dates, as a browser would read them.
const FALLBACK_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M",
    "%d %B %Y %H:%M",
];

const FALLBACK_DATE_FORMATS: [&str; 6] = [
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parses a date cell into a local wall-clock date-time.
///
/// - `YYYY-MM-DD` is midnight of that calendar day, never shifted by a time
///   zone
/// - `YYYY-MM-DD HH:MM[...]` reads the whitespace as the date/time separator
/// - anything else goes through a list of common formats; values carrying an
///   explicit offset (RFC 3339, RFC 2822) are converted to local time
///
/// Empty or unreadable input gives `None`.
pub fn parse_date(input: Option<&str>) -> Option<NaiveDateTime> {
    let s = input?.trim();
    if s.is_empty() {
        return None;
    }
    let res = parse_trimmed(s);
    debug!("parse_date: {:?} -> {:?}", s, res);
    res
}

fn parse_trimmed(s: &str) -> Option<NaiveDateTime> {
    if is_iso_date(s) {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN));
    }

    if s.len() > 10 && s.is_char_boundary(10) && is_iso_date(&s[..10]) {
        let rest = &s[10..];
        let time = rest.trim_start();
        if time.len() < rest.len() && starts_with_hh_mm(time) {
            return parse_iso_datetime(&format!("{}T{}", &s[..10], time));
        }
    }

    parse_fallback(s)
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| with_offset(s))
}

fn parse_fallback(s: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = with_offset(s) {
        return Some(dt);
    }
    for fmt in FALLBACK_DATETIME_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in FALLBACK_DATE_FORMATS.iter() {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

fn with_offset(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

fn starts_with_hh_mm(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 5
        && b[0].is_ascii_digit()
        && b[1].is_ascii_digit()
        && b[2] == b':'
        && b[3].is_ascii_digit()
        && b[4].is_ascii_digit()
}

/// Midnight at the start of the calendar day of `now`.
pub fn start_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}
