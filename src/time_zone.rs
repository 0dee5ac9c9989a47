//! Time zone identifiers used to interpret deadline wall-clock times.
//!
//! A deadline written as `/deadline 2021/12/01 09:00` has no zone of its own.
//! [`TimeZoneId`] names the zone it is read in: either an IANA region name
//! such as `Asia/Tokyo` or a fixed offset such as `+09:00`. Absent any
//! configuration the zone is UTC.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static FIXED_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:UTC|GMT)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset pattern")
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeZoneError {
    #[error("time zone identifier is empty")]
    Empty,
    #[error("unknown time zone: '{0}'")]
    Unknown(String),
    #[error("UTC offset out of range: '{0}'")]
    OffsetOutOfRange(String),
}

/// An IANA zone or a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneId {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Default for TimeZoneId {
    /// Deadlines without an explicit zone are read as UTC.
    fn default() -> Self {
        TimeZoneId::Named(Tz::UTC)
    }
}

impl TimeZoneId {
    pub fn utc() -> Self {
        Self::default()
    }

    /// Reinterpret wall-clock fields as a local time in this zone and return
    /// the corresponding absolute instant.
    pub fn localize(&self, wall_clock: NaiveDateTime) -> DateTime<Utc> {
        match self {
            TimeZoneId::Named(tz) => resolve_local(tz, wall_clock),
            TimeZoneId::Fixed(offset) => resolve_local(offset, wall_clock),
        }
    }

    /// Calendar date of `instant` as seen on a wall clock in this zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            TimeZoneId::Named(tz) => instant.with_timezone(tz).date_naive(),
            TimeZoneId::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

/// Folds take the earlier instant. Wall-clock times inside a gap use the
/// offset that was in force before the transition.
fn resolve_local<Z: TimeZone>(zone: &Z, wall_clock: NaiveDateTime) -> DateTime<Utc> {
    match zone.from_local_datetime(&wall_clock) {
        LocalResult::Single(local) => local.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = zone
                .offset_from_utc_datetime(&(wall_clock - Duration::days(1)))
                .fix();
            let utc = wall_clock - Duration::seconds(i64::from(before_gap.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    }
}

impl FromStr for TimeZoneId {
    type Err = TimeZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimeZoneError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(TimeZoneId::utc());
        }

        if let Some(caps) = FIXED_OFFSET.captures(trimmed) {
            let hours: i32 = caps[2]
                .parse()
                .map_err(|_| TimeZoneError::OffsetOutOfRange(trimmed.to_string()))?;
            let minutes: i32 = caps
                .get(3)
                .map_or(Ok(0), |m| m.as_str().parse())
                .map_err(|_| TimeZoneError::OffsetOutOfRange(trimmed.to_string()))?;
            if minutes >= 60 {
                return Err(TimeZoneError::OffsetOutOfRange(trimmed.to_string()));
            }
            let sign = if &caps[1] == "-" { -1 } else { 1 };
            let seconds = sign * (hours * 3600 + minutes * 60);
            return FixedOffset::east_opt(seconds)
                .map(TimeZoneId::Fixed)
                .ok_or_else(|| TimeZoneError::OffsetOutOfRange(trimmed.to_string()));
        }

        trimmed
            .parse::<Tz>()
            .map(TimeZoneId::Named)
            .map_err(|_| TimeZoneError::Unknown(trimmed.to_string()))
    }
}

impl TryFrom<String> for TimeZoneId {
    type Error = TimeZoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZoneId> for String {
    fn from(value: TimeZoneId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneId::Named(tz) => write!(f, "{}", tz.name()),
            TimeZoneId::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}
