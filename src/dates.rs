// File: ./src/dates.rs
// Calendar-day arithmetic and formatting helpers for the event builder.
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

/// Shifts a `YYYY-MM-DD` date string by whole calendar days, handling
/// month/year rollover. A trailing time component is ignored. Returns `None`
/// when the input is not a parseable date.
pub fn offset_date(date: &str, days: i64) -> Option<NaiveDate> {
    let date_part = date.get(..10).unwrap_or(date);
    let parsed = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    if days >= 0 {
        parsed.checked_add_days(Days::new(days as u64))
    } else {
        parsed.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

pub fn format_date_to_local_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lists every `YYYY-MM` month touched by the date range, inclusive on both
/// ends. Range bounds are `YYYY-MM-DD` strings, optionally with a time suffix.
pub fn months_in_date_range(start: &str, end: &str) -> Vec<String> {
    let mut months = Vec::new();
    let Some(start) = parse_date(start) else {
        return months;
    };
    let Some(end) = parse_date(end) else {
        return months;
    };

    let mut cursor = start.with_day(1).unwrap_or(start);
    while cursor <= end {
        months.push(cursor.format("%Y-%m").to_string());
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    months
}

/// Parses a builder instant: either a bare date or `YYYY-MM-DDTHH:MM:SS`.
/// Bare dates resolve to midnight.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Wall-clock difference formatted as `HH:MM`, minutes truncated. Hours are
/// zero-padded to at least two digits but not capped at 24.
pub fn duration_hhmm(start: &str, end: &str) -> Option<String> {
    let start = parse_instant(start)?;
    let end = parse_instant(end)?;
    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        return None;
    }
    Some(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
