//! Calendar period (year, month) value type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing or constructing a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// The key is not in `YYYY-MM` form.
    #[error("invalid period key: {0}")]
    InvalidKey(String),

    /// Month outside 1-12 or year zero.
    #[error("invalid period: {year}-{month}")]
    OutOfRange {
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
    },
}

/// A calendar month.
///
/// Field order matters: the derived `Ord` compares year first, then month.
/// Fields are public so stored data that is out of range can still be
/// represented; use [`Period::is_valid`] before trusting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1-12.
    pub month: u32,
}

/// Signed number of months from `start` to `target`.
///
/// Does not validate either argument.
#[must_use]
pub fn months_between(start: Period, target: Period) -> i64 {
    (i64::from(target.year) - i64::from(start.year)) * 12
        + (i64::from(target.month) - i64::from(start.month))
}

impl Period {
    /// Creates a validated period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::OutOfRange` if the month is not 1-12 or the year is zero.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        let period = Self { year, month };
        if period.is_valid() {
            Ok(period)
        } else {
            Err(PeriodError::OutOfRange { year, month })
        }
    }

    /// Period containing the given date or timestamp.
    #[must_use]
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period containing the current UTC instant.
    #[must_use]
    pub fn current() -> Self {
        Self::of(&Utc::now())
    }

    /// Returns true if the month is 1-12 and the year is non-zero.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.year != 0 && self.month >= 1 && self.month <= 12
    }

    /// Storage key in `YYYY-MM` form.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// The period `months` months away (negative goes backwards).
    ///
    /// Returns `None` if the result does not fit in the year range.
    #[cfg(test)]
    pub(crate) fn plus_months(&self, months: i64) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + months;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = u32::try_from(index.rem_euclid(12) + 1).ok()?;
        Some(Self { year, month })
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Midnight UTC on the first day of the month.
    ///
    /// Cancellation timestamps are stored this way.
    #[must_use]
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.first_day()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// The twelve months of a year, January first.
    #[must_use]
    pub fn months_of_year(year: i32) -> Vec<Self> {
        (1..=12).map(|month| Self { year, month }).collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidKey(s.to_string());
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}
