//! Payslip layout contract.
//!
//! Decides what is printed where on a payslip, independently of the
//! engine that draws it. Amounts are rounded only here.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::InstitutionConfig;
use crate::models::{PayMonth, Payslip};

/// One row of the earnings-versus-deductions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    /// Left column label.
    pub earning_label: String,
    /// Left column amount.
    pub earning_amount: String,
    /// Right column label.
    pub deduction_label: String,
    /// Right column amount.
    pub deduction_amount: String,
}

impl LayoutRow {
    fn new(earning_label: &str, earning_amount: String, deduction_label: &str, deduction_amount: String) -> Self {
        Self {
            earning_label: earning_label.to_string(),
            earning_amount,
            deduction_label: deduction_label.to_string(),
            deduction_amount,
        }
    }
}

/// Everything a document engine needs to draw one payslip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipLayout {
    /// Institution name for the header.
    pub institution: String,
    /// Line under the institution name.
    pub tagline: String,
    /// Document title, e.g. "Salary Slip - March 2025".
    pub title: String,
    /// Employee detail block as (label, value) pairs.
    pub employee_details: Vec<(String, String)>,
    /// Earnings and deductions rows.
    pub rows: Vec<LayoutRow>,
    /// Totals row.
    pub totals: LayoutRow,
    /// Net salary highlight as (label, amount).
    pub net_salary: (String, String),
    /// Footer note.
    pub footer: String,
}

/// Formats an amount as a whole number with thousands separators.
///
/// # Example
///
/// ```
/// use edutack_payroll::render::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(2112550, 2), "Rs."), "Rs. 21,126");
/// assert_eq!(format_currency(Decimal::ZERO, "Rs."), "Rs. 0");
/// ```
pub fn format_currency(amount: Decimal, prefix: &str) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("{} -{}", prefix, grouped)
    } else {
        format!("{} {}", prefix, grouped)
    }
}

/// Builds the layout for a payslip.
///
/// The bonus row reads "Perfect Attendance Bonus" when a bonus was paid and
/// "Bonus" otherwise. Insurance is always printed as "Insurance (Free)".
pub fn build_layout(payslip: &Payslip, institution: &InstitutionConfig, currency_prefix: &str) -> PayslipLayout {
    let money = |amount: Decimal| format_currency(amount, currency_prefix);
    let earnings = &payslip.earnings;
    let deductions = &payslip.deductions;
    let details = &payslip.salary_details;

    let period = PayMonth::new(payslip.month, payslip.year)
        .map(|m| m.label())
        .unwrap_or_else(|_| format!("{}/{}", payslip.month, payslip.year));

    let bonus_label = if earnings.bonus > Decimal::ZERO {
        "Perfect Attendance Bonus"
    } else {
        "Bonus"
    };

    PayslipLayout {
        institution: institution.name.clone(),
        tagline: institution.tagline.clone(),
        title: format!("Salary Slip - {}", period),
        employee_details: vec![
            ("Employee Name".to_string(), payslip.staff_name.clone()),
            ("Employee ID".to_string(), payslip.employee_id.clone()),
            ("Department".to_string(), payslip.department.clone()),
            ("Salary Type".to_string(), details.salary_type.label().to_string()),
            ("Working Days".to_string(), details.working_days.to_string()),
            ("Present Days".to_string(), details.present_days.to_string()),
        ],
        rows: vec![
            LayoutRow::new("Basic Salary", money(earnings.basic_salary), "Tax", money(deductions.tax)),
            LayoutRow::new(
                "Allowances",
                money(earnings.allowances),
                "Provident Fund",
                money(deductions.provident_fund),
            ),
            LayoutRow::new("Overtime", money(earnings.overtime), "Insurance (Free)", money(Decimal::ZERO)),
            LayoutRow::new(bonus_label, money(earnings.bonus), "Other", money(deductions.other)),
        ],
        totals: LayoutRow::new(
            "Total Earnings",
            money(earnings.total_earnings),
            "Total Deductions",
            money(deductions.total_deductions),
        ),
        net_salary: ("Net Salary".to_string(), money(payslip.net_salary)),
        footer: "This is a computer-generated payslip and does not require a signature.".to_string(),
    }
}
