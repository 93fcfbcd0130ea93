//! Calendar arithmetic shared by every timeline component.
//!
//! All functions are pure. Arithmetic that would leave chrono's representable
//! range saturates at `NaiveDate::MIN` / `NaiveDate::MAX` instead of panicking;
//! the `checked_*` variants on [`CalendarUnit`] report overflow instead.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Signed number of days from `a` to `b` (`b - a`).
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_add_days(date, days).unwrap_or(saturate(days))
}

pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    add_days(date, weeks.saturating_mul(7))
}

/// Add calendar months, clamping the day to the target month's length
/// (Jan 31 + 1 month is Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    checked_add_months(date, months).unwrap_or(saturate(months))
}

pub fn add_quarters(date: NaiveDate, quarters: i64) -> NaiveDate {
    add_months(date, quarters.saturating_mul(3))
}

/// Add calendar years; Feb 29 lands on Feb 28 in a non-leap target year.
pub fn add_years(date: NaiveDate, years: i64) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

fn checked_add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

fn checked_add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

fn saturate(direction: i64) -> NaiveDate {
    if direction >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month. `month0` is zero-based (0 = January); values
/// above 11 roll over into the following years.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let year = year.saturating_add((month0 / 12) as i32);
    match month0 % 12 {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Sunday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    add_days(date, -i64::from(date.weekday().num_days_from_sunday()))
}

/// ISO-8601 week number: weeks start on Monday and week 1 is the week
/// containing the year's first Thursday.
pub fn week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Quarter of the year, 1 to 4.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

pub fn start_of_quarter(date: NaiveDate) -> NaiveDate {
    let first_month = (quarter_of(date) - 1) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
}

pub fn days_in_quarter(date: NaiveDate) -> u32 {
    let start = start_of_quarter(date);
    (0..3)
        .map(|offset| days_in_month(start.year(), start.month0() + offset))
        .sum()
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Whole months between the months containing `a` and `b`, ignoring the day.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    i64::from(b.year() - a.year()) * 12 + i64::from(b.month0()) - i64::from(a.month0())
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Last representable millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(date))
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A calendar unit that timeline arithmetic can step by.
///
/// This is the single "extend by N units" primitive: column generation,
/// virtual column extrapolation and drag quantization all go through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl CalendarUnit {
    /// Shift `date` by `n` units, saturating at the calendar limits.
    pub fn add(self, date: NaiveDate, n: i64) -> NaiveDate {
        match self {
            CalendarUnit::Day => add_days(date, n),
            CalendarUnit::Week => add_weeks(date, n),
            CalendarUnit::Month => add_months(date, n),
            CalendarUnit::Quarter => add_quarters(date, n),
            CalendarUnit::Year => add_years(date, n),
        }
    }

    /// Shift `date` by `n` units, or `None` when the result is not representable.
    pub fn checked_add(self, date: NaiveDate, n: i64) -> Option<NaiveDate> {
        match self {
            CalendarUnit::Day => checked_add_days(date, n),
            CalendarUnit::Week => checked_add_days(date, n.checked_mul(7)?),
            CalendarUnit::Month => checked_add_months(date, n),
            CalendarUnit::Quarter => checked_add_months(date, n.checked_mul(3)?),
            CalendarUnit::Year => checked_add_months(date, n.checked_mul(12)?),
        }
    }

    /// First day of the unit containing `date`.
    pub fn align(self, date: NaiveDate) -> NaiveDate {
        match self {
            CalendarUnit::Day => date,
            CalendarUnit::Week => start_of_week(date),
            CalendarUnit::Month => start_of_month(date),
            CalendarUnit::Quarter => start_of_quarter(date),
            CalendarUnit::Year => start_of_year(date),
        }
    }

    /// Index of the unit containing `date`, counted from the unit containing
    /// `origin`. Negative when `date` lies in an earlier unit.
    pub fn units_between(self, origin: NaiveDate, date: NaiveDate) -> i64 {
        match self {
            CalendarUnit::Day => days_between(origin, date),
            CalendarUnit::Week => {
                days_between(start_of_week(origin), start_of_week(date)).div_euclid(7)
            }
            CalendarUnit::Month => months_between(origin, date),
            CalendarUnit::Quarter => {
                months_between(start_of_quarter(origin), start_of_quarter(date)).div_euclid(3)
            }
            CalendarUnit::Year => i64::from(date.year() - origin.year()),
        }
    }

    /// True length in days of the unit containing `date`.
    pub fn length_days(self, date: NaiveDate) -> u32 {
        match self {
            CalendarUnit::Day => 1,
            CalendarUnit::Week => 7,
            CalendarUnit::Month => days_in_month(date.year(), date.month0()),
            CalendarUnit::Quarter => days_in_quarter(date),
            CalendarUnit::Year => days_in_year(date.year()),
        }
    }
}
