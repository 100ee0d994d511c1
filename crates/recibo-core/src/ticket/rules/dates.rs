//! Date and time extraction for receipts.

use chrono::{NaiveDate, NaiveTime};
use regex::Captures;

use super::patterns::{BARE_DATE, BARE_TIME, LABELED_DATE, LABELED_TIME};

/// Century added to two-digit years.
pub const DEFAULT_CENTURY_BASE: i32 = 2000;

/// Extract the receipt date.
///
/// A date after `Fecha` wins over any other date-shaped token. If the
/// labeled date is not a real calendar date the result is `None`; the bare
/// fallback is only consulted when no labeled date is printed at all.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    extract_date_with_base(text, DEFAULT_CENTURY_BASE)
}

/// [`extract_date`] with an explicit century for two-digit years.
pub fn extract_date_with_base(text: &str, century_base: i32) -> Option<NaiveDate> {
    let caps = LABELED_DATE
        .captures(text)
        .or_else(|| BARE_DATE.captures(text))?;

    date_from_captures(&caps, century_base)
}

fn date_from_captures(caps: &Captures<'_>, century_base: i32) -> Option<NaiveDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3], century_base)?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str, century_base: i32) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        Some(century_base + year)
    } else {
        Some(year)
    }
}

/// Parse a day-first date (`DD/MM/YYYY`, `D-M-YY`, ...) on its own.
pub fn parse_day_first_date(s: &str, century_base: i32) -> Option<NaiveDate> {
    let caps = BARE_DATE.captures(s.trim())?;
    if caps.get(0)?.as_str() != s.trim() {
        return None;
    }
    date_from_captures(&caps, century_base)
}

/// Extract the receipt time, preferring the one after `Hora`.
pub fn extract_time(text: &str) -> Option<NaiveTime> {
    let caps = LABELED_TIME
        .captures(text)
        .or_else(|| BARE_TIME.captures(text))?;

    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let second: u32 = caps[3].parse().ok()?;

    NaiveTime::from_hms_opt(hour, minute, second)
}
