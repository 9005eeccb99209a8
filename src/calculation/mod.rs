//! Calculation logic for the payroll engine.
//!
//! This module contains attendance aggregation, basic salary resolution
//! and the earnings/deductions breakdown. Everything except
//! [`AttendanceAggregator`] is pure and performs no I/O.

mod attendance;
mod basic_salary;
mod breakdown;

pub use attendance::{AttendanceAggregator, aggregate_attendance, attendance_audit_step};
pub use basic_salary::{BasicSalaryResult, resolve_basic_salary};
pub use breakdown::{BreakdownResult, compute_breakdown};

use crate::config::PayrollPolicy;
use crate::models::{AttendanceAggregate, AuditStep, PayslipComputation, StaffSalaryProfile};

/// Computes a complete payslip from a salary profile and attendance aggregate.
///
/// `attendance_step` is the audit step recorded when the aggregate was
/// produced; it becomes step 1 of the returned trace.
///
/// # Example
///
/// ```
/// use edutack_payroll::calculation::compute_payslip;
/// use edutack_payroll::config::PayrollPolicy;
/// use edutack_payroll::models::{AttendanceAggregate, SalaryRule, StaffSalaryProfile};
/// use rust_decimal::Decimal;
///
/// let mut profile = StaffSalaryProfile::attendance_based();
/// profile.hourly_rate = Decimal::new(150, 0);
///
/// let aggregate = AttendanceAggregate {
///     working_days: 30,
///     present_days: 20,
///     absent_days: 10,
///     total_working_hours: Decimal::new(160, 0),
///     late_count: 2,
///     ..Default::default()
/// };
///
/// let computation = compute_payslip(&profile, &aggregate, &PayrollPolicy::default(), None);
/// assert_eq!(computation.salary_rule, SalaryRule::HourlyRate);
/// assert_eq!(computation.basic_salary(), Decimal::new(24000, 0));
/// assert_eq!(computation.net_salary(), Decimal::new(23640, 0));
/// ```
pub fn compute_payslip(
    profile: &StaffSalaryProfile,
    aggregate: &AttendanceAggregate,
    policy: &PayrollPolicy,
    attendance_step: Option<AuditStep>,
) -> PayslipComputation {
    let mut audit_steps: Vec<AuditStep> = attendance_step.into_iter().collect();
    let mut step_number = audit_steps.len() as u32 + 1;

    let basic = resolve_basic_salary(profile, aggregate, policy, step_number);
    audit_steps.push(basic.audit_step);
    step_number += 1;

    let breakdown = compute_breakdown(basic.amount, aggregate, policy, step_number);
    audit_steps.push(breakdown.audit_step);

    PayslipComputation {
        attendance: aggregate.clone(),
        salary_rule: basic.rule,
        breakdown: breakdown.breakdown,
        audit_steps,
    }
}
