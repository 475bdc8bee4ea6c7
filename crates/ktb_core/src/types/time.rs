//! Time types for risk date arithmetic.
//!
//! This module provides [`Date`], a type-safe wrapper around
//! `chrono::NaiveDate`. All tenor arithmetic in the workspace is expressed in
//! whole calendar days, so subtraction yields an `i64` day count and shifting
//! is done with [`Date::add_days`].
//!
//! # Examples
//!
//! ```
//! use ktb_core::types::time::Date;
//!
//! let today = Date::from_ymd(2024, 1, 1).unwrap();
//! let maturity = Date::from_ymd(2025, 1, 1).unwrap();
//! assert_eq!(maturity - today, 366);
//!
//! let fixing = maturity.add_days(-182).unwrap();
//! assert_eq!(maturity - fixing, 182);
//! ```

use chrono::{Days, Local, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Day-count multiplier used to move between year fractions and days.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use ktb_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
/// assert_eq!(date.to_string(), "2024-06-15");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use ktb_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns today's date based on local system time.
    ///
    /// Only the command-line entry point should call this; everything below
    /// it receives the evaluation date as a parameter.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    /// Parses a date from ISO 8601 format (YYYY-MM-DD).
    ///
    /// Surrounding whitespace is ignored, and a trailing time component
    /// (`2024-06-15 00:00:00`, as spreadsheet exports often produce) is
    /// accepted and discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use ktb_core::types::time::Date;
    ///
    /// let date = Date::parse("2024-06-15").unwrap();
    /// assert_eq!(date, Date::parse(" 2024-06-15 00:00:00 ").unwrap());
    /// assert!(Date::parse("not-a-date").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let trimmed = s.trim();
        let date_part = trimmed
            .split(|c: char| c == ' ' || c == 'T')
            .next()
            .unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}': {}", trimmed, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Shifts the date by a signed number of calendar days.
    ///
    /// # Examples
    ///
    /// ```
    /// use ktb_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2024, 3, 1).unwrap();
    /// assert_eq!(date.add_days(-1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
    /// assert_eq!(date.add_days(31).unwrap(), Date::from_ymd(2024, 4, 1).unwrap());
    /// ```
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let out_of_range = || DateError::OutOfRange {
            date: self.to_string(),
            days,
        };
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map(Date).ok_or_else(out_of_range)
    }

    /// Returns the later of `self` and `floor`.
    ///
    /// Used to clamp a settlement date that has already passed onto the
    /// evaluation date.
    pub fn clamp_to(self, floor: Date) -> Self {
        self.max(floor)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}
