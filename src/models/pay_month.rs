//! The calendar month a payslip covers.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// A validated (month, year) pair with its first and last calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayMonth {
    month: u32,
    year: i32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl PayMonth {
    /// Validates a month (1-12) and four-digit year.
    ///
    /// The last day is found as "day zero" of the following month, i.e. the
    /// day before the first of the next month.
    ///
    /// # Example
    ///
    /// ```
    /// use edutack_payroll::models::PayMonth;
    ///
    /// let february = PayMonth::new(2, 2024).unwrap();
    /// assert_eq!(february.days_in_month(), 29);
    /// assert!(PayMonth::new(13, 2024).is_err());
    /// ```
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::validation(
                "month",
                format!("month must be between 1 and 12, got {}", month),
            ));
        }
        if !(1000..=9999).contains(&year) {
            return Err(EngineError::validation(
                "year",
                format!("year must be a four-digit year, got {}", year),
            ));
        }

        let invalid = || EngineError::validation("year", format!("{}/{} is not a valid month", month, year));

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            month,
            year,
            first_day,
            last_day,
        })
    }

    /// The month number (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    /// Returns true if the date falls inside the month (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    /// Human-readable label, e.g. "March 2025".
    pub fn label(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}
