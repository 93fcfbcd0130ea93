use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timeline::calendar::{self, days_between};

/// Visible calendar window, inclusive of both days.
///
/// Equivalently the half-open interval `[start 00:00, end + 1 day 00:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two bounds in either order. Reversed input is
    /// normalized, so only use this for bounds the crate derived itself;
    /// see [`try_new`](Self::try_new) for host-supplied ranges.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Build a range, rejecting `start > end` instead of reordering it.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn calendar_year(year: i32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        Self::new(start, end)
    }

    pub fn start_of_day(&self) -> NaiveDateTime {
        calendar::start_of_day(self.start)
    }

    pub fn end_of_day(&self) -> NaiveDateTime {
        calendar::end_of_day(self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains_datetime(&self, at: NaiveDateTime) -> bool {
        self.start_of_day() <= at && at <= self.end_of_day()
    }

    /// Number of days in the range, counting both endpoints.
    pub fn days(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }

    /// Every day of the range in order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while({
            let end = self.end;
            move |day| *day <= end
        })
    }
}
