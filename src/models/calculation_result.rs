//! Salary computation result models.
//!
//! This module contains the [`PayslipComputation`] type and its associated
//! structures: the earnings and deductions breakdown, the rule used to resolve
//! the basic salary, and the audit steps recording each decision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AttendanceAggregate;

/// The rule that produced a staff member's basic salary.
///
/// Attendance-based staff are resolved in a fixed priority order; the first
/// rule whose inputs are usable wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryRule {
    /// Fixed-salary staff: `salary`, else `base_salary`, else zero.
    FixedSalary,
    /// A pre-computed attendance-based `salary` used as-is.
    PrecomputedSalary,
    /// `hourly_rate × total_working_hours`.
    HourlyRate,
    /// `daily_rate × (total_working_hours / hours_per_day)`.
    DailyRate,
    /// Hourly rate derived from `base_salary` over the month's hours.
    BaseSalaryHourly,
    /// `base_salary / working_days × present_days`.
    BaseSalaryProRata,
}

/// Earnings side of a payslip.
///
/// # Example
///
/// ```
/// use edutack_payroll::models::Earnings;
/// use rust_decimal::Decimal;
///
/// let earnings = Earnings {
///     basic_salary: Decimal::new(20000, 0),
///     allowances: Decimal::new(2000, 0),
///     overtime: Decimal::ZERO,
///     bonus: Decimal::new(1500, 0),
///     total_earnings: Decimal::new(23500, 0),
/// };
/// assert_eq!(earnings.total_earnings, Decimal::new(23500, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    /// Basic salary for the month.
    pub basic_salary: Decimal,
    /// Allowances, a fixed share of the basic salary.
    pub allowances: Decimal,
    /// Overtime pay (reserved, currently always zero).
    pub overtime: Decimal,
    /// Perfect attendance bonus, or zero.
    pub bonus: Decimal,
    /// Sum of all earnings.
    pub total_earnings: Decimal,
}

/// Deductions side of a payslip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deductions {
    /// Tax on total earnings.
    pub tax: Decimal,
    /// Provident fund contribution on the basic salary.
    pub provident_fund: Decimal,
    /// Insurance, always waived.
    pub insurance: Decimal,
    /// Other deductions (currently always zero).
    pub other: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
}

/// Earnings, deductions and the resulting net salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    /// Earnings side.
    pub earnings: Earnings,
    /// Deductions side.
    pub deductions: Deductions,
    /// `total_earnings - total_deductions`.
    pub net_salary: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The transient result of computing one payslip.
///
/// Produced fresh on every generation and never persisted on its own; the
/// workflow copies its parts into the persisted payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipComputation {
    /// The attendance counters the computation was based on.
    pub attendance: AttendanceAggregate,
    /// The rule used to resolve the basic salary.
    pub salary_rule: SalaryRule,
    /// Earnings, deductions and net salary.
    pub breakdown: SalaryBreakdown,
    /// Every decision taken, in order.
    pub audit_steps: Vec<AuditStep>,
}

impl PayslipComputation {
    /// Returns the resolved basic salary.
    pub fn basic_salary(&self) -> Decimal {
        self.breakdown.earnings.basic_salary
    }

    /// Returns the net salary.
    pub fn net_salary(&self) -> Decimal {
        self.breakdown.net_salary
    }
}
