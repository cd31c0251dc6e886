//! Millisecond timestamp arithmetic and calendar formatting
//!
//! Timestamps are `u64` milliseconds since the Unix epoch. The record codecs
//! only need the truncation helpers; the formatting and parsing functions are
//! for callers rendering or entering times.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Write;

use crate::error::{FormatError, RangeError};

pub const MILLISECONDS_IN_SECOND: u64 = 1_000;
pub const MILLISECONDS_IN_MINUTE: u64 = 60 * MILLISECONDS_IN_SECOND;
pub const MILLISECONDS_IN_HOUR: u64 = 60 * MILLISECONDS_IN_MINUTE;
pub const MILLISECONDS_IN_DAY: u64 = 24 * MILLISECONDS_IN_HOUR;

/// ISO 8601 with milliseconds, e.g. `2025-09-02T15:45:00.000Z`.
pub const ISO_8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Current wall-clock time. Clocks set before 1970 read as zero.
pub fn now() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

pub fn to_second(ms: u64) -> u64 {
    ms - ms % MILLISECONDS_IN_SECOND
}

pub fn to_minute(ms: u64) -> u64 {
    ms - ms % MILLISECONDS_IN_MINUTE
}

pub fn to_hour(ms: u64) -> u64 {
    ms - ms % MILLISECONDS_IN_HOUR
}

fn add_units(ms: u64, count: i64, unit: u64, what: &str) -> Result<u64, RangeError> {
    let delta = i128::from(count) * i128::from(unit);
    let result = i128::from(ms) + delta;
    u64::try_from(result).map_err(|_| RangeError::TimestampOverflow {
        reason: format!("adding {} {} to {} ms", count, what, ms),
    })
}

pub fn add_days(ms: u64, days: i64) -> Result<u64, RangeError> {
    add_units(ms, days, MILLISECONDS_IN_DAY, "days")
}

pub fn add_hours(ms: u64, hours: i64) -> Result<u64, RangeError> {
    add_units(ms, hours, MILLISECONDS_IN_HOUR, "hours")
}

pub fn add_minutes(ms: u64, minutes: i64) -> Result<u64, RangeError> {
    add_units(ms, minutes, MILLISECONDS_IN_MINUTE, "minutes")
}

pub fn add_seconds(ms: u64, seconds: i64) -> Result<u64, RangeError> {
    add_units(ms, seconds, MILLISECONDS_IN_SECOND, "seconds")
}

fn difference(t1: u64, t2: u64, unit: u64) -> i64 {
    let diff = (i128::from(t1) - i128::from(t2)) / i128::from(unit);
    // |t1 - t2| <= u64::MAX and unit >= 1000, so the quotient fits.
    diff as i64
}

/// Whole days from `t2` to `t1`, truncated toward zero.
pub fn difference_in_days(t1: u64, t2: u64) -> i64 {
    difference(t1, t2, MILLISECONDS_IN_DAY)
}

pub fn difference_in_hours(t1: u64, t2: u64) -> i64 {
    difference(t1, t2, MILLISECONDS_IN_HOUR)
}

pub fn difference_in_minutes(t1: u64, t2: u64) -> i64 {
    difference(t1, t2, MILLISECONDS_IN_MINUTE)
}

pub fn difference_in_seconds(t1: u64, t2: u64) -> i64 {
    difference(t1, t2, MILLISECONDS_IN_SECOND)
}

fn to_datetime(ms: u64) -> Result<DateTime<Utc>, RangeError> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| RangeError::TimestampOverflow {
            reason: format!("{} ms is outside the calendar range", ms),
        })
}

fn render<Tz: TimeZone>(dt: DateTime<Tz>, format: &str) -> Result<String, FormatError>
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", dt.format(format)).map_err(|_| FormatError::Timestamp {
        input: dt.to_rfc3339(),
        format: format.to_string(),
        reason: "invalid format specifier".to_string(),
    })?;
    Ok(out)
}

/// Render `ms` as a UTC calendar string using a strftime-style `format`.
pub fn format_utc(ms: u64, format: &str) -> Result<String, crate::CardError> {
    Ok(render(to_datetime(ms)?, format)?)
}

/// Render `ms` in the host's local time zone.
pub fn format_local(ms: u64, format: &str) -> Result<String, crate::CardError> {
    Ok(render(to_datetime(ms)?.with_timezone(&Local), format)?)
}

fn parse_naive(input: &str, format: &str) -> Result<NaiveDateTime, FormatError> {
    // Date-only formats carry no time of day; treat them as midnight.
    NaiveDateTime::parse_from_str(input, format)
        .or_else(|first| {
            NaiveDate::parse_from_str(input, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .ok_or(first)
        })
        .map_err(|e| FormatError::Timestamp {
            input: input.to_string(),
            format: format.to_string(),
            reason: e.to_string(),
        })
}

fn millis_since_epoch(input: &str, format: &str, millis: i64) -> Result<u64, FormatError> {
    u64::try_from(millis).map_err(|_| FormatError::Timestamp {
        input: input.to_string(),
        format: format.to_string(),
        reason: "time precedes the Unix epoch".to_string(),
    })
}

/// Parse a UTC calendar string into milliseconds since the epoch.
pub fn parse_utc(input: &str, format: &str) -> Result<u64, FormatError> {
    let naive = parse_naive(input, format)?;
    millis_since_epoch(input, format, naive.and_utc().timestamp_millis())
}

/// Parse a calendar string in the host's local time zone.
pub fn parse_local(input: &str, format: &str) -> Result<u64, FormatError> {
    let naive = parse_naive(input, format)?;
    let local = Local.from_local_datetime(&naive).single().ok_or_else(|| FormatError::Timestamp {
        input: input.to_string(),
        format: format.to_string(),
        reason: "ambiguous or nonexistent local time".to_string(),
    })?;
    millis_since_epoch(input, format, local.timestamp_millis())
}
