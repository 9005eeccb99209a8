//! Earnings and deductions breakdown.
//!
//! Applies the payroll policy uniformly to a resolved basic salary,
//! whatever the salary type. Amounts are never rounded here; rounding is a
//! presentation concern.

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::models::{AttendanceAggregate, AuditStep, Deductions, Earnings, SalaryBreakdown};

/// The result of computing a breakdown, including the audit step.
#[derive(Debug, Clone)]
pub struct BreakdownResult {
    /// Earnings, deductions and net salary.
    pub breakdown: SalaryBreakdown,
    /// The audit step recording this computation.
    pub audit_step: AuditStep,
}

/// Computes earnings, deductions and net salary from a basic salary.
///
/// - allowances = `allowance_rate × basic`
/// - overtime = 0
/// - bonus = `perfect_attendance_bonus` for perfect attendance, else 0
/// - tax = `tax_rate × total_earnings`
/// - provident fund = `provident_fund_rate × basic`
/// - insurance = 0, other = 0
/// - net = total earnings − total deductions
///
/// # Example
///
/// ```
/// use edutack_payroll::calculation::compute_breakdown;
/// use edutack_payroll::config::PayrollPolicy;
/// use edutack_payroll::models::AttendanceAggregate;
/// use rust_decimal::Decimal;
///
/// let aggregate = AttendanceAggregate {
///     working_days: 31,
///     present_days: 22,
///     absent_days: 9,
///     ..Default::default()
/// };
///
/// let result = compute_breakdown(Decimal::new(20000, 0), &aggregate, &PayrollPolicy::default(), 3);
/// assert_eq!(result.breakdown.earnings.bonus, Decimal::new(1500, 0));
/// assert_eq!(result.breakdown.net_salary, Decimal::new(21125, 0));
/// ```
pub fn compute_breakdown(
    basic_salary: Decimal,
    aggregate: &AttendanceAggregate,
    policy: &PayrollPolicy,
    step_number: u32,
) -> BreakdownResult {
    let perfect_attendance = aggregate.is_perfect_attendance();

    let allowances = policy.allowance_rate * basic_salary;
    let overtime = Decimal::ZERO;
    let bonus = if perfect_attendance {
        policy.perfect_attendance_bonus
    } else {
        Decimal::ZERO
    };
    let total_earnings = basic_salary + allowances + overtime + bonus;

    let tax = policy.tax_rate * total_earnings;
    let provident_fund = policy.provident_fund_rate * basic_salary;
    let insurance = Decimal::ZERO;
    let other = Decimal::ZERO;
    let total_deductions = tax + provident_fund + insurance + other;

    let net_salary = total_earnings - total_deductions;

    let breakdown = SalaryBreakdown {
        earnings: Earnings {
            basic_salary,
            allowances,
            overtime,
            bonus,
            total_earnings,
        },
        deductions: Deductions {
            tax,
            provident_fund,
            insurance,
            other,
            total_deductions,
        },
        net_salary,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "salary_breakdown".to_string(),
        rule_name: "Earnings and Deductions".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "perfect_attendance": perfect_attendance,
            "allowance_rate": policy.allowance_rate.to_string(),
            "tax_rate": policy.tax_rate.to_string(),
            "provident_fund_rate": policy.provident_fund_rate.to_string()
        }),
        output: serde_json::json!({
            "total_earnings": total_earnings.to_string(),
            "total_deductions": total_deductions.to_string(),
            "net_salary": net_salary.to_string()
        }),
        reasoning: if perfect_attendance {
            format!(
                "Perfect attendance bonus {} applied; net {} - {} = {}",
                bonus.normalize(),
                total_earnings.normalize(),
                total_deductions.normalize(),
                net_salary.normalize()
            )
        } else {
            format!(
                "No perfect attendance bonus; net {} - {} = {}",
                total_earnings.normalize(),
                total_deductions.normalize(),
                net_salary.normalize()
            )
        },
    };

    BreakdownResult {
        breakdown,
        audit_step,
    }
}
