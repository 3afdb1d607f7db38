//! Calendar month arithmetic (proleptic Gregorian, UTC).

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Years accepted by [`MonthRef::new`].
const MIN_YEAR: i32 = -262_000;
const MAX_YEAR: i32 = 262_000;
/// Navigation may step one year past the accepted range so edge months keep
/// both neighbours; chrono represents years up to about ±262_142.
const NAV_MIN_YEAR: i32 = MIN_YEAR - 1;
const NAV_MAX_YEAR: i32 = MAX_YEAR + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    /// Month outside `1..=12`.
    InvalidMonth(u32),
    YearOutOfRange(i32),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(f, "month must be within 1..=12, got {month}"),
            Self::YearOutOfRange(year) => {
                write!(f, "year {year} is outside {MIN_YEAR}..={MAX_YEAR}")
            }
        }
    }
}

impl Error for CalendarError {}

/// Leap years: divisible by 4, except centuries not divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`; `0` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// A validated `(year, month)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthRef {
    year: i32,
    month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Result<Self, CalendarError> {
        Self::new(date.year(), date.month())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Previous calendar month; January rolls back to December of `year - 1`.
    ///
    /// Every month accepted by [`MonthRef::new`] has a previous month, and
    /// `previous().next()` returns it. Only repeated navigation beyond the
    /// accepted range saturates.
    pub fn previous(self) -> Self {
        match self.month {
            1 if self.year <= NAV_MIN_YEAR => self,
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            month => Self {
                year: self.year,
                month: month - 1,
            },
        }
    }

    /// Next calendar month; December rolls over to January of `year + 1`.
    ///
    /// Mirrors [`MonthRef::previous`] at the upper end of the range.
    pub fn next(self) -> Self {
        match self.month {
            12 if self.year >= NAV_MAX_YEAR => self,
            12 => Self {
                year: self.year + 1,
                month: 1,
            },
            month => Self {
                year: self.year,
                month: month + 1,
            },
        }
    }

    pub fn days_in_month(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("MonthRef years stay inside chrono's supported range")
    }

    /// Weekday of day 1, `0 = Sunday .. 6 = Saturday`.
    pub fn start_weekday_offset(self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// Half-open UTC range `[start of month, start of next month)`.
    pub fn utc_bounds(self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.first_day().and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(i64::from(self.days_in_month()));
        (start, end)
    }

    pub fn contains(self, at: DateTime<Utc>) -> bool {
        at.year() == self.year && at.month() == self.month
    }

    /// Display label used as the calendar heading, e.g. `2024年3月`.
    pub fn label(self) -> String {
        format!("{}年{}月", self.year, self.month)
    }
}

impl Display for MonthRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Month selection as received from a request; missing parts default to
/// the caller-supplied `today`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarRequest {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl CalendarRequest {
    pub fn resolve(self, today: NaiveDate) -> Result<MonthRef, CalendarError> {
        MonthRef::new(
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month()),
        )
    }
}
