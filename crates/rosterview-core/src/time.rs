//! Date range types for roster queries.
//!
//! This module provides [`DateRange`], the span of calendar dates a roster
//! report covers, and [`WeekRange`], one Monday-aligned chunk of that span as
//! sent to the upstream API.

use std::fmt;

use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Wire format for dates in query parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How far back a report reaches when no start date is given.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 2;

/// An inclusive span of calendar dates.
///
/// A resolved range always satisfies `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting spans where `start` is not before `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(ConfigError::InvalidDateRange { start, end })
        }
    }

    /// Resolves an optional caller-supplied pair against today's local date.
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::resolve_at(start, end, Local::now().date_naive())
    }

    /// Resolves an optional caller-supplied pair against `today`.
    ///
    /// - a missing start defaults to `today` minus two months
    /// - the supplied end is honoured only when it is after the start,
    ///   otherwise the range ends `today`
    /// - if the start lies after `today` and no usable end was given, the
    ///   range collapses to the single day `today`
    pub fn resolve_at(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Self {
        let start = start.unwrap_or_else(|| default_start(today));

        let end = match end {
            Some(end) => match Self::new(start, end) {
                Ok(range) => return range,
                Err(e) => {
                    warn!("{}, falling back to end = {}", e, today);
                    today
                }
            },
            None => today,
        };

        if start > end {
            warn!(%start, %end, "start date is in the future, clamping to {}", end);
            return Self { start: end, end };
        }

        Self { start, end }
    }

    /// Number of days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn default_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
        .unwrap_or(today)
}

/// One week-sized window of a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    /// First day of the window (a Monday, except when built by hand).
    pub week_start: NaiveDate,
    /// Last day of the window (inclusive).
    pub week_end: NaiveDate,
}

impl WeekRange {
    /// Creates a new week window.
    pub fn new(week_start: NaiveDate, week_end: NaiveDate) -> Self {
        Self {
            week_start,
            week_end,
        }
    }

    /// The `start_date` query value.
    pub fn start_param(&self) -> String {
        self.week_start.format(DATE_FORMAT).to_string()
    }

    /// The `end_date` query value.
    pub fn end_param(&self) -> String {
        self.week_end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}

/// Returns the Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_rejects_reversed_range() {
        let err = DateRange::new(date(2024, 3, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateRange { .. }));
    }

    #[test]
    fn new_rejects_equal_dates() {
        assert!(DateRange::new(date(2024, 3, 1), date(2024, 3, 1)).is_err());
    }

    #[test]
    fn resolve_defaults_to_two_months_back() {
        let today = date(2024, 5, 31);
        let range = DateRange::resolve_at(None, None, today);
        assert_eq!(range.start, date(2024, 3, 31));
        assert_eq!(range.end, today);
    }

    #[test]
    fn resolve_clamps_month_end() {
        let today = date(2024, 4, 30);
        let range = DateRange::resolve_at(None, None, today);
        assert_eq!(range.start, date(2024, 2, 29));
    }

    #[test]
    fn resolve_keeps_valid_pair() {
        let today = date(2024, 6, 1);
        let range = DateRange::resolve_at(Some(date(2024, 1, 10)), Some(date(2024, 1, 20)), today);
        assert_eq!(range, DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap());
    }

    #[test]
    fn resolve_reversed_pair_ends_today() {
        let today = date(2024, 6, 1);
        let range = DateRange::resolve_at(Some(date(2024, 3, 1)), Some(date(2024, 1, 1)), today);
        assert_eq!(range.start, date(2024, 3, 1));
        assert_eq!(range.end, today);
    }

    #[test]
    fn resolve_start_only_ends_today() {
        let today = date(2024, 6, 1);
        let range = DateRange::resolve_at(Some(date(2024, 5, 1)), None, today);
        assert_eq!(range.start, date(2024, 5, 1));
        assert_eq!(range.end, today);
    }

    #[test]
    fn resolve_end_only_uses_default_start() {
        let today = date(2024, 6, 1);
        let range = DateRange::resolve_at(None, Some(date(2024, 7, 1)), today);
        assert_eq!(range.start, date(2024, 4, 1));
        assert_eq!(range.end, date(2024, 7, 1));
    }

    #[test]
    fn resolve_future_start_collapses_to_today() {
        let today = date(2024, 6, 1);
        let range = DateRange::resolve_at(Some(date(2024, 9, 1)), None, today);
        assert_eq!(range.start, today);
        assert_eq!(range.end, today);
    }

    #[test]
    fn range_helpers() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        assert_eq!(range.num_days(), 11);
        assert_eq!(range.to_string(), "2024-01-10 to 2024-01-20");
    }

    #[test]
    fn week_params_use_wire_format() {
        let week = WeekRange::new(date(2024, 1, 8), date(2024, 1, 14));
        assert_eq!(week.start_param(), "2024-01-08");
        assert_eq!(week.end_param(), "2024-01-14");
        assert_eq!(week.to_string(), "2024-01-08..2024-01-14");
    }

    #[test]
    fn monday_alignment() {
        // 2024-01-10 is a Wednesday
        assert_eq!(monday_of(date(2024, 1, 10)), date(2024, 1, 8));
        assert_eq!(monday_of(date(2024, 1, 8)), date(2024, 1, 8));
        assert_eq!(monday_of(date(2024, 1, 14)), date(2024, 1, 8));
    }

    #[test]
    fn date_range_serde_roundtrip() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":"2024-01-10","end":"2024-01-20"}"#);
    }
}
