//! Attendance records and their monthly aggregate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The status recorded for a staff member on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Present for the day.
    Present,
    /// Present, but arrived late.
    Late,
    /// Absent without leave.
    Absent,
    /// On approved leave.
    OnLeave,
    /// Worked half the day.
    HalfDay,
}

impl AttendanceStatus {
    /// Returns true if the status counts as a present day.
    pub fn counts_as_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// One attendance entry, created by the attendance subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// The staff member the record belongs to.
    pub staff_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// What was recorded for the day.
    pub status: AttendanceStatus,
    /// Hours worked; missing values count as zero.
    #[serde(default)]
    pub working_hours: Decimal,
}

/// Counters derived from one staff member's records for one month.
///
/// `working_days` is the number of calendar days in the month, weekends
/// included, not the number of records found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAggregate {
    /// Calendar days in the month.
    pub working_days: u32,
    /// Records with status present or late.
    pub present_days: u32,
    /// `working_days - present_days`, floored at zero.
    pub absent_days: u32,
    /// Sum of recorded working hours.
    pub total_working_hours: Decimal,
    /// Records with status late.
    pub late_count: u32,
    /// Records with status on-leave.
    pub leave_count: u32,
    /// Records with status absent.
    pub absent_count: u32,
    /// Records with status half-day.
    pub half_day_count: u32,
}

impl AttendanceAggregate {
    /// Returns true when the month has present days and no late, leave,
    /// absent or half-day record.
    ///
    /// # Example
    ///
    /// ```
    /// use edutack_payroll::models::AttendanceAggregate;
    ///
    /// let aggregate = AttendanceAggregate {
    ///     working_days: 30,
    ///     present_days: 22,
    ///     absent_days: 8,
    ///     ..Default::default()
    /// };
    /// assert!(aggregate.is_perfect_attendance());
    /// ```
    pub fn is_perfect_attendance(&self) -> bool {
        self.late_count == 0
            && self.leave_count == 0
            && self.absent_count == 0
            && self.half_day_count == 0
            && self.present_days > 0
    }
}
