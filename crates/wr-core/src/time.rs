//! UTC date arithmetic for Sunday-start reward weeks.
//!
//! Instants are `DateTime<Utc>` everywhere inside the crate. Text only shows
//! up at the edges: [`parse_instant`] on the way in, [`canonicalize`] on the
//! way out.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::{Result, RewardError};

/// Zone-less date-time layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse timestamp text into a UTC instant.
///
/// Accepts RFC 3339 (`Z` or numeric offset, optional fraction), zone-less
/// date-times, and bare `YYYY-MM-DD` dates (midnight UTC). Anything else,
/// including impossible calendar dates, is an `InvalidArgument`.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| RewardError::invalid_date())
}

/// UTC midnight of the Sunday on or before `instant`'s UTC calendar date.
pub fn week_start(instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let date = instant.date_naive();
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back))
        .map(start_of_day)
        .ok_or_else(RewardError::invalid_date)
}

/// Whole-second `YYYY-MM-DDTHH:MM:SSZ`. Sub-second precision is dropped.
pub fn canonicalize(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Store key for a week: epoch seconds of its start.
pub fn week_key(week_start: DateTime<Utc>) -> i64 {
    week_start.timestamp()
}

/// `instant + days` on the calendar, failing at the edge of the representable range.
pub fn add_days(instant: DateTime<Utc>, days: u64) -> Result<DateTime<Utc>> {
    instant
        .checked_add_days(Days::new(days))
        .ok_or_else(RewardError::invalid_date)
}

pub fn same_utc_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
