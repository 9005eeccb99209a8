//! Staff model and salary configuration.
//!
//! This module defines the subset of a staff member's profile that payroll
//! reads. Staff records are owned by the staff subsystem; payroll never
//! mutates them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a staff member's monthly salary is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SalaryType {
    /// A fixed monthly figure, independent of attendance.
    Fixed,
    /// Derived from recorded hours or days in the month.
    AttendanceBased,
}

impl SalaryType {
    /// Returns the label printed on payslips.
    pub fn label(&self) -> &'static str {
        match self {
            SalaryType::Fixed => "Fixed",
            SalaryType::AttendanceBased => "Attendance Based",
        }
    }
}

/// Salary configuration for one staff member.
///
/// Rates default to zero rather than being optional so that salary
/// arithmetic stays total over every profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSalaryProfile {
    /// How the salary is determined.
    pub salary_type: SalaryType,
    /// Monthly salary, or a pre-computed attendance-based figure.
    #[serde(default)]
    pub salary: Decimal,
    /// Base monthly salary.
    #[serde(default)]
    pub base_salary: Decimal,
    /// Pay per equivalent day for attendance-based staff.
    #[serde(default)]
    pub daily_rate: Decimal,
    /// Pay per hour for attendance-based staff.
    #[serde(default)]
    pub hourly_rate: Decimal,
}

impl StaffSalaryProfile {
    /// Creates a fixed-salary profile.
    ///
    /// # Example
    ///
    /// ```
    /// use edutack_payroll::models::{SalaryType, StaffSalaryProfile};
    /// use rust_decimal::Decimal;
    ///
    /// let profile = StaffSalaryProfile::fixed(Decimal::new(20000, 0));
    /// assert_eq!(profile.salary_type, SalaryType::Fixed);
    /// assert_eq!(profile.hourly_rate, Decimal::ZERO);
    /// ```
    pub fn fixed(salary: Decimal) -> Self {
        Self {
            salary_type: SalaryType::Fixed,
            salary,
            base_salary: Decimal::ZERO,
            daily_rate: Decimal::ZERO,
            hourly_rate: Decimal::ZERO,
        }
    }

    /// Creates an attendance-based profile with no rates set.
    pub fn attendance_based() -> Self {
        Self {
            salary_type: SalaryType::AttendanceBased,
            salary: Decimal::ZERO,
            base_salary: Decimal::ZERO,
            daily_rate: Decimal::ZERO,
            hourly_rate: Decimal::ZERO,
        }
    }
}

/// A staff member as seen by payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    /// Unique identifier of the staff record.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Institution-issued employee id, printed on payslips.
    pub employee_id: String,
    /// Department name.
    #[serde(default)]
    pub department: String,
    /// Address payslips are delivered to.
    pub email: String,
    /// Only approved staff take part in bulk generation.
    #[serde(default)]
    pub approved: bool,
    /// Salary configuration.
    #[serde(flatten)]
    pub salary: StaffSalaryProfile,
}
