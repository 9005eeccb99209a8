//! Basic salary resolution.
//!
//! This module determines a staff member's basic salary for a month from
//! their salary profile and attendance aggregate.

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::models::{AttendanceAggregate, AuditStep, SalaryRule, SalaryType, StaffSalaryProfile};

/// The result of resolving a basic salary, including the rule used and audit step.
#[derive(Debug, Clone)]
pub struct BasicSalaryResult {
    /// The resolved basic salary.
    pub amount: Decimal,
    /// The rule that produced it.
    pub rule: SalaryRule,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Divides, yielding zero for a zero divisor.
pub(crate) fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Determines the basic salary for one month.
///
/// Fixed-salary staff receive `salary`, else `base_salary`, else zero.
///
/// Attendance-based staff are resolved in priority order, first match wins:
/// 1. `salary > 0`: a pre-computed figure, used as-is
/// 2. `hourly_rate > 0` and hours recorded: `hourly_rate × total_working_hours`
/// 3. `daily_rate > 0`: `daily_rate × total_working_hours / hours_per_day`
/// 4. `base_salary > 0`: `base_salary / (working_days × hours_per_day) × total_working_hours`
/// 5. otherwise: `base_salary / working_days × present_days`
///
/// The function is total: any inputs produce a number, and a zero divisor
/// yields zero rather than an error.
///
/// # Examples
///
/// ```
/// use edutack_payroll::calculation::resolve_basic_salary;
/// use edutack_payroll::config::PayrollPolicy;
/// use edutack_payroll::models::{AttendanceAggregate, SalaryRule, StaffSalaryProfile};
/// use rust_decimal::Decimal;
///
/// let mut profile = StaffSalaryProfile::attendance_based();
/// profile.hourly_rate = Decimal::new(100, 0);
/// profile.daily_rate = Decimal::new(2000, 0);
///
/// let aggregate = AttendanceAggregate {
///     working_days: 30,
///     total_working_hours: Decimal::new(180, 0),
///     ..Default::default()
/// };
///
/// let result = resolve_basic_salary(&profile, &aggregate, &PayrollPolicy::default(), 2);
/// assert_eq!(result.rule, SalaryRule::HourlyRate);
/// assert_eq!(result.amount, Decimal::new(18000, 0));
/// ```
pub fn resolve_basic_salary(
    profile: &StaffSalaryProfile,
    aggregate: &AttendanceAggregate,
    policy: &PayrollPolicy,
    step_number: u32,
) -> BasicSalaryResult {
    let hours = aggregate.total_working_hours;
    let working_days = Decimal::from(aggregate.working_days);

    let (amount, rule, reasoning) = match profile.salary_type {
        SalaryType::Fixed => {
            let amount = if !profile.salary.is_zero() {
                profile.salary
            } else {
                profile.base_salary
            };
            (
                amount,
                SalaryRule::FixedSalary,
                format!("Fixed salary of {}", amount.normalize()),
            )
        }
        SalaryType::AttendanceBased if profile.salary > Decimal::ZERO => (
            profile.salary,
            SalaryRule::PrecomputedSalary,
            format!(
                "Using pre-computed attendance salary {} as-is",
                profile.salary.normalize()
            ),
        ),
        SalaryType::AttendanceBased if profile.hourly_rate > Decimal::ZERO && hours > Decimal::ZERO => {
            let amount = profile.hourly_rate * hours;
            (
                amount,
                SalaryRule::HourlyRate,
                format!(
                    "{} hours × {} per hour = {}",
                    hours.normalize(),
                    profile.hourly_rate.normalize(),
                    amount.normalize()
                ),
            )
        }
        SalaryType::AttendanceBased if profile.daily_rate > Decimal::ZERO => {
            let equivalent_days = safe_div(hours, policy.hours_per_day);
            let amount = profile.daily_rate * equivalent_days;
            (
                amount,
                SalaryRule::DailyRate,
                format!(
                    "{} hours / {} = {} equivalent days × {} per day = {}",
                    hours.normalize(),
                    policy.hours_per_day.normalize(),
                    equivalent_days.normalize(),
                    profile.daily_rate.normalize(),
                    amount.normalize()
                ),
            )
        }
        SalaryType::AttendanceBased if profile.base_salary > Decimal::ZERO => {
            let monthly_hours = working_days * policy.hours_per_day;
            let hourly_from_base = safe_div(profile.base_salary, monthly_hours);
            let amount = hourly_from_base * hours;
            (
                amount,
                SalaryRule::BaseSalaryHourly,
                format!(
                    "Base {} / {} monthly hours = {} per hour × {} hours = {}",
                    profile.base_salary.normalize(),
                    monthly_hours.normalize(),
                    hourly_from_base.normalize(),
                    hours.normalize(),
                    amount.normalize()
                ),
            )
        }
        SalaryType::AttendanceBased => {
            let amount =
                safe_div(profile.base_salary, working_days) * Decimal::from(aggregate.present_days);
            (
                amount,
                SalaryRule::BaseSalaryProRata,
                format!(
                    "Base {} / {} days × {} present days = {}",
                    profile.base_salary.normalize(),
                    aggregate.working_days,
                    aggregate.present_days,
                    amount.normalize()
                ),
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "basic_salary".to_string(),
        rule_name: "Basic Salary Resolution".to_string(),
        input: serde_json::json!({
            "salary_type": profile.salary_type,
            "salary": profile.salary.to_string(),
            "base_salary": profile.base_salary.to_string(),
            "daily_rate": profile.daily_rate.to_string(),
            "hourly_rate": profile.hourly_rate.to_string(),
            "total_working_hours": hours.to_string(),
            "working_days": aggregate.working_days,
            "present_days": aggregate.present_days
        }),
        output: serde_json::json!({
            "basic_salary": amount.to_string(),
            "rule": rule
        }),
        reasoning,
    };

    BasicSalaryResult {
        amount,
        rule,
        audit_step,
    }
}
