//! Week-aligned pagination of a date range.
//!
//! The upstream roster API is queried one week at a time. [`generate_weeks`]
//! splits a [`DateRange`] into contiguous windows starting on Mondays, with
//! the final window clipped to the end of the range.

use chrono::Duration;

use crate::time::{DateRange, WeekRange, monday_of};

/// Splits `range` into Monday-aligned windows of at most seven days.
///
/// The first window starts on the Monday on or before `range.start`, every
/// following window starts the day after the previous one ends, and the last
/// window ends exactly on `range.end`. A single-day range still yields one
/// window.
pub fn generate_weeks(range: &DateRange) -> Vec<WeekRange> {
    let mut weeks = Vec::new();
    let mut current = monday_of(range.start);

    while current <= range.end {
        let week_end = (current + Duration::days(6)).min(range.end);
        weeks.push(WeekRange::new(current, week_end));
        current = week_end + Duration::days(1);
    }

    weeks
}
