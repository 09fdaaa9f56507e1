//! Calendar period keys and time-to-rollover.
//!
//! All functions take the local wall-clock time explicitly so callers decide
//! what "now" is. Keys are compared lower-cased; [`title_case`] restores the
//! display form.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

use super::horoscope_service::HoroscopeError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAlias {
    Today,
    Tomorrow,
    Yesterday,
}

impl DayAlias {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Yesterday => "yesterday",
        }
    }

    fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_uppercase().as_str() {
            "TODAY" => Some(Self::Today),
            "TOMORROW" => Some(Self::Tomorrow),
            "YESTERDAY" => Some(Self::Yesterday),
            _ => None,
        }
    }

    const fn offset_days(self) -> i64 {
        match self {
            Self::Today => 0,
            Self::Tomorrow => 1,
            Self::Yesterday => -1,
        }
    }
}

impl fmt::Display for DayAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the day was asked for; decides which upstream page is scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRef {
    Alias(DayAlias),
    Date(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyKey {
    pub date: NaiveDate,
    pub day: DayRef,
}

impl DailyKey {
    /// Cache key for the day: the concrete calendar date, never the alias.
    #[must_use]
    pub fn period_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

pub fn resolve_daily_key(input: &str, now: NaiveDateTime) -> Result<DailyKey, HoroscopeError> {
    let input = input.trim();
    let today = now.date();

    if input.contains('-') {
        let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map_err(|_| HoroscopeError::InvalidDateFormat(input.to_string()))?;
        if date > today {
            return Err(HoroscopeError::FutureDateNotSupported);
        }
        return Ok(DailyKey {
            date,
            day: DayRef::Date(date),
        });
    }

    let alias = DayAlias::parse(input)
        .ok_or_else(|| HoroscopeError::UnsupportedDayAlias(input.to_string()))?;
    let date = today
        .checked_add_signed(Duration::days(alias.offset_days()))
        .unwrap_or(today);

    Ok(DailyKey {
        date,
        day: DayRef::Alias(alias),
    })
}

#[must_use]
pub fn seconds_until_end_of_day(now: NaiveDateTime) -> i64 {
    now.date()
        .succ_opt()
        .map_or(0, |next| seconds_between(now, next.and_time(NaiveTime::MIN)))
}

#[must_use]
pub fn week_bounds(now: NaiveDateTime) -> (NaiveDate, NaiveDate) {
    let today = now.date();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

#[must_use]
pub fn current_week_range(now: NaiveDateTime) -> String {
    let (start, end) = week_bounds(now);
    format!("{} - {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
}

/// Seconds until the following Monday 00:00.
#[must_use]
pub fn seconds_until_end_of_week(now: NaiveDateTime) -> i64 {
    let (_, sunday) = week_bounds(now);
    sunday
        .succ_opt()
        .map_or(0, |monday| seconds_between(now, monday.and_time(NaiveTime::MIN)))
}

#[must_use]
pub fn current_month(now: NaiveDateTime) -> String {
    now.format("%B %Y").to_string()
}

#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Seconds until 23:59:59 on the last day of the month.
#[must_use]
pub fn seconds_until_end_of_month(now: NaiveDateTime) -> i64 {
    last_day_of_month(now.date())
        .and_hms_opt(23, 59, 59)
        .map_or(0, |end| seconds_between(now, end))
}

fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().max(0)
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest: `"mar 3, 2025 - mar 9, 2025"` becomes `"Mar 3, 2025 - Mar 9, 2025"`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_week_range_starts_monday_ends_sunday() {
        // 2025-03-03 is a Monday
        for offset in 0..7 {
            let now = at(2025, 3, 3 + offset, 13, 30, 0);
            assert_eq!(current_week_range(now), "Mar 3, 2025 - Mar 9, 2025");
            let (start, end) = week_bounds(now);
            assert_eq!(start.weekday(), chrono::Weekday::Mon);
            assert_eq!(end.weekday(), chrono::Weekday::Sun);
            assert_eq!(end - start, Duration::days(6));
        }
    }

    #[test]
    fn test_week_range_across_year() {
        let now = at(2025, 1, 1, 8, 0, 0);
        assert_eq!(current_week_range(now), "Dec 30, 2024 - Jan 5, 2025");
    }

    #[test]
    fn test_week_key_stable_within_week() {
        let a = current_week_range(at(2024, 5, 6, 0, 0, 0));
        let b = current_week_range(at(2024, 5, 12, 23, 59, 59));
        assert_eq!(a, b);
        assert_ne!(a, current_week_range(at(2024, 5, 13, 0, 0, 0)));
    }

    #[test]
    fn test_seconds_until_end_of_day() {
        assert_eq!(seconds_until_end_of_day(at(2024, 5, 1, 23, 59, 0)), 60);
        assert_eq!(seconds_until_end_of_day(at(2024, 5, 1, 0, 0, 0)), 86_400);
    }

    #[test]
    fn test_seconds_until_end_of_week() {
        // Sunday 23:00 -> one hour to Monday
        assert_eq!(seconds_until_end_of_week(at(2025, 3, 9, 23, 0, 0)), 3_600);
        // Monday 00:00 -> a full week
        assert_eq!(seconds_until_end_of_week(at(2025, 3, 3, 0, 0, 0)), 7 * 86_400);
    }

    #[test]
    fn test_seconds_until_end_of_month() {
        assert_eq!(seconds_until_end_of_month(at(2025, 3, 31, 23, 59, 59)), 0);
        assert_eq!(
            seconds_until_end_of_month(at(2025, 3, 1, 0, 0, 0)),
            31 * 86_400 - 1
        );
        assert_eq!(
            seconds_until_end_of_month(at(2024, 2, 1, 0, 0, 0)),
            29 * 86_400 - 1
        );
        assert_eq!(seconds_until_end_of_month(at(2024, 12, 31, 23, 0, 0)), 3_599);
    }

    #[test]
    fn test_current_month() {
        assert_eq!(current_month(at(2025, 3, 15, 12, 0, 0)), "March 2025");
        assert_eq!(last_day_of_month(at(2023, 2, 10, 0, 0, 0).date()).day(), 28);
    }

    #[test]
    fn test_last_day_of_month() {
        let last = |y, m, d| last_day_of_month(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(last(2024, 2, 29), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(last(2024, 12, 1), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(last(2025, 4, 30), NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
    }

    #[test]
    fn test_resolve_aliases() {
        let now = at(2024, 5, 1, 10, 0, 0);
        let today = resolve_daily_key("today", now).unwrap();
        assert_eq!(today.period_key(), "2024-05-01");
        assert_eq!(today.day, DayRef::Alias(DayAlias::Today));

        assert_eq!(resolve_daily_key("TOMORROW", now).unwrap().period_key(), "2024-05-02");
        assert_eq!(resolve_daily_key("Yesterday", now).unwrap().period_key(), "2024-04-30");
    }

    #[test]
    fn test_resolve_explicit_date() {
        let now = at(2024, 5, 1, 10, 0, 0);
        let key = resolve_daily_key("2024-05-01", now).unwrap();
        assert_eq!(key.day, DayRef::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
        assert_eq!(key.period_key(), "2024-05-01");
    }

    #[test]
    fn test_resolve_errors() {
        let now = at(2024, 5, 1, 10, 0, 0);
        assert!(matches!(
            resolve_daily_key("2099-01-01", now),
            Err(HoroscopeError::FutureDateNotSupported)
        ));
        assert!(matches!(
            resolve_daily_key("2024-05-02", now),
            Err(HoroscopeError::FutureDateNotSupported)
        ));
        assert!(matches!(
            resolve_daily_key("2024-13-01", now),
            Err(HoroscopeError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            resolve_daily_key("01-05-2024", now),
            Err(HoroscopeError::InvalidDateFormat(_))
        ));
        assert!(matches!(
            resolve_daily_key("next week", now),
            Err(HoroscopeError::UnsupportedDayAlias(_))
        ));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("mar 3, 2025 - mar 9, 2025"), "Mar 3, 2025 - Mar 9, 2025");
        assert_eq!(title_case("march 2025"), "March 2025");
        assert_eq!(title_case("MAY 1, 2024"), "May 1, 2024");
    }
}
