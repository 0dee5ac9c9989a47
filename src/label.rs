//! Deadline proximity labels.
//!
//! Distances are counted in calendar boundaries, not elapsed time: a deadline
//! at 08:00 tomorrow is one day away even when it is only a few hours off.
//! Days are tried first (up to and including 7), then weeks (up to and
//! including 4), and everything further out is counted in months.

use crate::time_zone::TimeZoneId;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_DAYS_BEFORE: i64 = 7;
const MAX_WEEKS_BEFORE: i64 = 4;

/// How close a deadline is. Exactly one variant applies to any pair of
/// instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlineLabel {
    Outdated,
    /// `0..=7` calendar days left.
    DaysBefore { days: i64 },
    /// `1..=4` calendar weeks left.
    WeeksBefore { weeks: i64 },
    /// One calendar month or more left.
    MonthsBefore { months: i64 },
}

impl DeadlineLabel {
    /// Every label name starts with this prefix so stale labels can be found.
    pub const LABEL_PREFIX: &'static str = "deadline: ";

    /// Label names are the `Display` form of a label.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn is_deadline_label(name: &str) -> bool {
        name.starts_with(Self::LABEL_PREFIX)
    }
}

impl fmt::Display for DeadlineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (count, unit) = match *self {
            DeadlineLabel::Outdated => return write!(f, "{}outdated", Self::LABEL_PREFIX),
            DeadlineLabel::DaysBefore { days } => (days, "day"),
            DeadlineLabel::WeeksBefore { weeks } => (weeks, "week"),
            DeadlineLabel::MonthsBefore { months } => (months, "month"),
        };
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "{}{} {}{}", Self::LABEL_PREFIX, count, unit, plural)
    }
}

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    fn start_of_week(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        date - Duration::days(i64::from(offset))
    }
}

/// Number of midnights between two calendar dates.
pub fn calendar_days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Number of week starts between two calendar dates.
pub fn calendar_weeks_between(later: NaiveDate, earlier: NaiveDate, week_start: WeekStart) -> i64 {
    let days = (week_start.start_of_week(later) - week_start.start_of_week(earlier)).num_days();
    days / 7
}

/// Number of month starts between two calendar dates.
pub fn calendar_months_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    let years = i64::from(later.year() - earlier.year());
    let months = i64::from(later.month()) - i64::from(earlier.month());
    years * 12 + months
}

/// Classifies deadlines read in one time zone with one week convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classifier {
    pub time_zone: TimeZoneId,
    pub week_start: WeekStart,
}

impl Classifier {
    pub fn new(time_zone: TimeZoneId) -> Self {
        Self { time_zone, week_start: WeekStart::default() }
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Label `deadline` (wall-clock time in `self.time_zone`) relative to `now`.
    pub fn classify(&self, deadline: NaiveDateTime, now: DateTime<Utc>) -> DeadlineLabel {
        let deadline_at = self.time_zone.localize(deadline);
        if now > deadline_at {
            return DeadlineLabel::Outdated;
        }

        let deadline_date = self.time_zone.local_date(deadline_at);
        let today = self.time_zone.local_date(now);

        let days = calendar_days_between(deadline_date, today);
        if days <= MAX_DAYS_BEFORE {
            return DeadlineLabel::DaysBefore { days };
        }

        let weeks = calendar_weeks_between(deadline_date, today, self.week_start);
        if weeks <= MAX_WEEKS_BEFORE {
            return DeadlineLabel::WeeksBefore { weeks };
        }

        // Five week starts can fit inside a single month (Saturday the 1st to
        // Sunday the 30th), which would otherwise yield zero months.
        let months = calendar_months_between(deadline_date, today).max(1);
        debug!(
            "Deadline {} is {} days, {} weeks, {} months away",
            deadline_date, days, weeks, months
        );
        DeadlineLabel::MonthsBefore { months }
    }
}

/// Label `deadline` relative to `now`.
///
/// The deadline's wall-clock fields are read in `time_zone`, or in UTC when
/// no zone is given. Weeks start on Sunday.
pub fn classify(
    deadline: NaiveDateTime,
    now: DateTime<Utc>,
    time_zone: Option<&TimeZoneId>,
) -> DeadlineLabel {
    Classifier::new(time_zone.copied().unwrap_or_default()).classify(deadline, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_outdated() {
        let label = classify(wall(2021, 11, 1, 9, 0), utc(2021, 11, 2, 9, 0), None);
        assert_eq!(label, DeadlineLabel::Outdated);
    }

    #[test]
    fn test_one_minute_late_is_outdated() {
        let label = classify(wall(2021, 11, 1, 9, 0), utc(2021, 11, 1, 9, 1), None);
        assert_eq!(label, DeadlineLabel::Outdated);
    }

    #[test]
    fn test_deadline_now_is_zero_days() {
        let label = classify(wall(2021, 11, 1, 9, 0), utc(2021, 11, 1, 9, 0), None);
        assert_eq!(label, DeadlineLabel::DaysBefore { days: 0 });
    }

    #[test]
    fn test_two_days_before_less_than_48_hours() {
        let label = classify(wall(2021, 11, 3, 8, 0), utc(2021, 11, 1, 9, 0), None);
        assert_eq!(label, DeadlineLabel::DaysBefore { days: 2 });
    }

    #[test]
    fn test_two_days_before_more_than_48_hours() {
        let label = classify(wall(2021, 11, 3, 10, 0), utc(2021, 11, 1, 9, 0), None);
        assert_eq!(label, DeadlineLabel::DaysBefore { days: 2 });
    }

    #[test]
    fn test_next_morning_is_one_day() {
        let label = classify(wall(2021, 11, 2, 8, 0), utc(2021, 11, 1, 9, 0), None);
        assert_eq!(label, DeadlineLabel::DaysBefore { days: 1 });
    }

    #[test]
    fn test_exactly_seven_days_stays_in_days() {
        let label = classify(wall(2021, 11, 8, 9, 0), utc(2021, 11, 1, 9, 0), None);
        assert_eq!(label, DeadlineLabel::DaysBefore { days: 7 });
    }

    // 2021-11-01 is a Monday.
    #[test_case(13, DeadlineLabel::WeeksBefore { weeks: 1 } ; "saturday of next week")]
    #[test_case(14, DeadlineLabel::WeeksBefore { weeks: 2 } ; "sunday two weeks on")]
    #[test_case(20, DeadlineLabel::WeeksBefore { weeks: 2 } ; "saturday two weeks on")]
    #[test_case(21, DeadlineLabel::WeeksBefore { weeks: 3 } ; "sunday three weeks on")]
    #[test_case(28, DeadlineLabel::WeeksBefore { weeks: 4 } ; "sunday four weeks on")]
    fn test_weeks_before(day: u32, expected: DeadlineLabel) {
        let label = classify(wall(2021, 11, day, 0, 0), utc(2021, 11, 1, 0, 0), None);
        assert_eq!(label, expected);
    }

    #[test]
    fn test_four_weeks_boundary() {
        let now = utc(2021, 11, 1, 0, 0);
        assert_eq!(
            classify(wall(2021, 12, 4, 0, 0), now, None),
            DeadlineLabel::WeeksBefore { weeks: 4 }
        );
        assert_eq!(
            classify(wall(2021, 12, 5, 0, 0), now, None),
            DeadlineLabel::MonthsBefore { months: 1 }
        );
    }

    #[test]
    fn test_months_before_has_no_upper_bound() {
        let label = classify(wall(2023, 2, 1, 0, 0), utc(2021, 11, 1, 0, 0), None);
        assert_eq!(label, DeadlineLabel::MonthsBefore { months: 15 });
    }

    #[test]
    fn test_five_weeks_within_one_month_is_one_month() {
        // 2022-01-01 is a Saturday, 2022-01-30 a Sunday.
        let label = classify(wall(2022, 1, 30, 0, 0), utc(2022, 1, 1, 0, 0), None);
        assert_eq!(label, DeadlineLabel::MonthsBefore { months: 1 });
    }

    #[test]
    fn test_monday_week_start() {
        let classifier = Classifier::default().with_week_start(WeekStart::Monday);
        let now = utc(2021, 11, 1, 0, 0);
        // Sunday 2021-11-14 is still in the week starting Monday 2021-11-08.
        assert_eq!(
            classifier.classify(wall(2021, 11, 14, 0, 0), now),
            DeadlineLabel::WeeksBefore { weeks: 1 }
        );
        assert_eq!(
            classifier.classify(wall(2021, 11, 15, 0, 0), now),
            DeadlineLabel::WeeksBefore { weeks: 2 }
        );
    }

    #[test]
    fn test_time_zone_normalizes_deadline() {
        let tokyo: TimeZoneId = "Asia/Tokyo".parse().unwrap();
        // 09:00 in Tokyo is 00:00 UTC.
        let deadline = wall(2021, 12, 1, 9, 0);
        assert_eq!(
            classify(deadline, utc(2021, 12, 1, 0, 30), Some(&tokyo)),
            DeadlineLabel::Outdated
        );
        assert_eq!(
            classify(deadline, utc(2021, 12, 1, 0, 30), None),
            DeadlineLabel::DaysBefore { days: 0 }
        );
    }

    #[test]
    fn test_time_zone_decides_calendar_dates() {
        let tokyo: TimeZoneId = "+09:00".parse().unwrap();
        // 16:00 UTC on the 30th is already the 1st in Tokyo.
        let now = utc(2021, 11, 30, 16, 0);
        assert_eq!(
            classify(wall(2021, 12, 1, 23, 0), now, Some(&tokyo)),
            DeadlineLabel::DaysBefore { days: 0 }
        );
        assert_eq!(
            classify(wall(2021, 12, 1, 23, 0), now, None),
            DeadlineLabel::DaysBefore { days: 1 }
        );
    }

    #[test]
    fn test_classify_is_repeatable() {
        let deadline = wall(2022, 3, 1, 12, 0);
        let now = utc(2021, 11, 1, 0, 0);
        assert_eq!(classify(deadline, now, None), classify(deadline, now, None));
    }

    #[test_case(DeadlineLabel::Outdated, "deadline: outdated" ; "outdated")]
    #[test_case(DeadlineLabel::DaysBefore { days: 0 }, "deadline: 0 days" ; "today")]
    #[test_case(DeadlineLabel::DaysBefore { days: 1 }, "deadline: 1 day" ; "one day")]
    #[test_case(DeadlineLabel::WeeksBefore { weeks: 3 }, "deadline: 3 weeks" ; "weeks")]
    #[test_case(DeadlineLabel::MonthsBefore { months: 1 }, "deadline: 1 month" ; "one month")]
    fn test_label_names(label: DeadlineLabel, expected: &str) {
        assert_eq!(label.name(), expected);
        assert!(DeadlineLabel::is_deadline_label(&label.name()));
    }

    #[test]
    fn test_calendar_months_between_across_years() {
        let later = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let earlier = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        assert_eq!(calendar_months_between(later, earlier), 1);
        assert_eq!(calendar_days_between(later, earlier), 1);
        assert_eq!(calendar_weeks_between(later, earlier, WeekStart::Sunday), 0);
    }
}
