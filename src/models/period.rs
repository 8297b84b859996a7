use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A calendar month a payroll run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PayPeriod {
    year: i32,
    month: i32,
}

impl PayPeriod {
    pub fn new(year: i32, month: i32) -> AppResult<Self> {
        if !(1..=9999).contains(&year) {
            return Err(AppError::Validation(format!(
                "year must be between 1 and 9999, got {year}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parses raw path segments, rejecting anything that is not a plain integer.
    pub fn parse(year: &str, month: &str) -> AppResult<Self> {
        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::Validation(format!("year '{year}' is not a number")))?;
        let month = month
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::Validation(format!("month '{month}' is not a number")))?;
        Self::new(year, month)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> i32 {
        self.month
    }

    /// Number of calendar days in the month; leap years included.
    pub fn days_in_month(self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month as u32, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .map(|last_day| last_day.day())
            .unwrap_or(0)
    }

    /// The period a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
