#![forbid(unsafe_code)]

//! Calendar dates without a time of day.
//!
//! [`DateValue`] is the only date type the picker works with. It wraps a
//! [`NaiveDate`], so a value is always "midnight" by construction and two
//! values compare by their position on the calendar.
//!
//! # Invariants
//!
//! - Truncation is idempotent: `DateValue::truncate(d.midnight()) == d`.
//! - Flooring to a [`Period`] never moves a date forward.
//! - Stepping helpers return `None` instead of wrapping when they would leave
//!   the range chrono can represent.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};

/// Granularity a date can be floored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Whole days (flooring is a no-op).
    Day,
    /// First day of the month.
    Month,
    /// January 1st of the year.
    Year,
}

/// A calendar date (year, month, day) normalized to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DateValue(NaiveDate);

impl DateValue {
    /// Build a date from a year, a 1-based month and a day of month.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// January 1st of `year`.
    #[must_use]
    pub fn year_start(year: i32) -> Option<Self> {
        Self::from_ymd(year, 1, 1)
    }

    /// Lower bound used when nothing narrower is configured: `0000-01-01`.
    #[must_use]
    pub fn min_bound() -> Self {
        Self(NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    /// Upper bound used when nothing narrower is configured: `9999-12-31`.
    #[must_use]
    pub fn max_bound() -> Self {
        Self(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX))
    }

    /// Today's date in the local calendar.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Strip the time of day from `instant`.
    #[must_use]
    pub fn truncate(instant: NaiveDateTime) -> Self {
        Self(instant.date())
    }

    /// Local calendar date of a millisecond Unix timestamp.
    #[must_use]
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        Local
            .timestamp_millis_opt(millis)
            .earliest()
            .map(|dt| Self(dt.date_naive()))
    }

    /// Millisecond Unix timestamp of local midnight on this date.
    ///
    /// Returns `None` when local midnight does not exist or is out of range.
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<i64> {
        Local
            .from_local_datetime(&self.midnight())
            .earliest()
            .map(|dt| dt.timestamp_millis())
    }

    /// The date at `00:00:00`.
    #[must_use]
    pub fn midnight(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    #[must_use]
    pub const fn naive(&self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of year, 1..=12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Month of year, 0..=11.
    #[must_use]
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Day of month, 1..=31.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Day of week counted from Sunday (Sunday = 0, Saturday = 6).
    #[must_use]
    pub fn days_from_sunday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// First year of the decade containing this date (`floor(year / 10) * 10`).
    #[must_use]
    pub fn decade_start(&self) -> i32 {
        self.year().div_euclid(10) * 10
    }

    /// Floor to the start of the given period.
    #[must_use]
    pub fn floor(&self, period: Period) -> Self {
        let floored = match period {
            Period::Day => Some(self.0),
            Period::Month => self.0.with_day(1),
            Period::Year => NaiveDate::from_ymd_opt(self.year(), 1, 1),
        };
        floored.map_or(*self, Self)
    }

    /// Shift by a signed number of days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map(Self)
    }

    /// Shift by a signed number of months, clamping the day to the target month.
    #[must_use]
    pub fn add_months(&self, months: i32) -> Option<Self> {
        let magnitude = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(magnitude)
        } else {
            self.0.checked_sub_months(magnitude)
        };
        shifted.map(Self)
    }

    /// Shift by a signed number of years.
    #[must_use]
    pub fn add_years(&self, years: i32) -> Option<Self> {
        self.add_months(years.checked_mul(12)?)
    }

    /// Step one unit of `period` forward (`steps > 0`) or backward.
    #[must_use]
    pub fn step(&self, period: Period, steps: i32) -> Option<Self> {
        match period {
            Period::Day => self.add_days(i64::from(steps)),
            Period::Month => self.add_months(steps),
            Period::Year => self.add_years(steps),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(instant: NaiveDateTime) -> Self {
        Self::truncate(instant)
    }
}

impl From<DateValue> for NaiveDate {
    fn from(date: DateValue) -> Self {
        date.0
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DateValue {
    type Err = chrono::ParseError;

    /// Parse an ISO `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::from_str(s.trim()).map(Self)
    }
}
