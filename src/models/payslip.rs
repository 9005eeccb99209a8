//! The persisted payslip entity.
//!
//! A payslip is unique per (staff member, month, year). Financial fields are
//! never patched in place: regeneration deletes the record and creates a new
//! one. Only delivery status and the PDF location change after creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditStep, Deductions, Earnings, SalaryRule, SalaryType};

/// Lifecycle state of a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayslipStatus {
    /// Not yet finalised.
    Draft,
    /// Record and PDF exist; email has not been delivered.
    Generated,
    /// Email delivery succeeded at least once.
    Sent,
}

/// The identity a payslip is unique on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayslipKey {
    /// The staff member.
    pub staff_id: String,
    /// The month (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
}

impl PayslipKey {
    /// Creates a key.
    pub fn new(staff_id: impl Into<String>, month: u32, year: i32) -> Self {
        Self {
            staff_id: staff_id.into(),
            month,
            year,
        }
    }
}

/// Snapshot of the inputs a payslip was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDetails {
    /// The staff member's salary type at generation time.
    pub salary_type: SalaryType,
    /// The fixed or pre-computed salary on the profile.
    pub salary: Decimal,
    /// The base salary figure on the profile.
    pub base_salary: Decimal,
    /// Daily rate, zero when unset.
    pub daily_rate: Decimal,
    /// Hourly rate, zero when unset.
    pub hourly_rate: Decimal,
    /// Calendar days in the month.
    pub working_days: u32,
    /// Present (or late) days.
    pub present_days: u32,
    /// Working days minus present days.
    pub absent_days: u32,
    /// Total hours recorded.
    pub total_working_hours: Decimal,
    /// The rule used to resolve the basic salary.
    pub salary_rule: SalaryRule,
}

/// A generated payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    /// Unique identifier of this record.
    pub id: Uuid,
    /// The staff member the payslip is for.
    pub staff_id: String,
    /// Staff name at generation time.
    pub staff_name: String,
    /// Employee id at generation time.
    pub employee_id: String,
    /// Department at generation time.
    pub department: String,
    /// The month (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
    /// Inputs snapshot.
    pub salary_details: SalaryDetails,
    /// Earnings breakdown.
    pub earnings: Earnings,
    /// Deductions breakdown.
    pub deductions: Deductions,
    /// Total earnings minus total deductions.
    pub net_salary: Decimal,
    /// PDF location relative to the upload root.
    pub pdf_path: String,
    /// Whether the payslip email was delivered.
    pub email_sent: bool,
    /// When the email was last delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_sent_at: Option<DateTime<Utc>>,
    /// The staff member who generated the payslip.
    pub generated_by: String,
    /// Lifecycle state.
    pub status: PayslipStatus,
    /// When the record was created.
    pub generated_at: DateTime<Utc>,
    /// Audit trail of the salary computation.
    #[serde(default)]
    pub calculation_steps: Vec<AuditStep>,
}

impl Payslip {
    /// Returns the key this payslip is unique on.
    pub fn key(&self) -> PayslipKey {
        PayslipKey::new(self.staff_id.clone(), self.month, self.year)
    }

    /// Returns the summary shown when a duplicate is detected.
    pub fn summary(&self) -> PayslipSummary {
        PayslipSummary {
            id: self.id,
            staff_id: self.staff_id.clone(),
            staff_name: self.staff_name.clone(),
            employee_id: self.employee_id.clone(),
            month: self.month,
            year: self.year,
            net_salary: self.net_salary,
            status: self.status,
            email_sent: self.email_sent,
            generated_at: self.generated_at,
        }
    }

    /// Records a successful delivery.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.email_sent = true;
        self.email_sent_at = Some(at);
        self.status = PayslipStatus::Sent;
    }
}

/// Enough of a payslip for a client to offer view, download or regenerate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipSummary {
    /// Payslip id.
    pub id: Uuid,
    /// Staff id.
    pub staff_id: String,
    /// Staff name.
    pub staff_name: String,
    /// Employee id.
    pub employee_id: String,
    /// The month (1-12).
    pub month: u32,
    /// The year.
    pub year: i32,
    /// Net salary.
    pub net_salary: Decimal,
    /// Lifecycle state.
    pub status: PayslipStatus,
    /// Whether the email was delivered.
    pub email_sent: bool,
    /// When the record was created.
    pub generated_at: DateTime<Utc>,
}

/// Listing filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipFilter {
    /// Only this staff member.
    #[serde(default)]
    pub staff_id: Option<String>,
    /// Only this month.
    #[serde(default)]
    pub month: Option<u32>,
    /// Only this year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Only this department.
    #[serde(default)]
    pub department: Option<String>,
}

impl PayslipFilter {
    /// Returns true if the payslip passes every set criterion.
    pub fn matches(&self, payslip: &Payslip) -> bool {
        self.staff_id.as_ref().is_none_or(|s| *s == payslip.staff_id)
            && self.month.is_none_or(|m| m == payslip.month)
            && self.year.is_none_or(|y| y == payslip.year)
            && self
                .department
                .as_ref()
                .is_none_or(|d| *d == payslip.department)
    }
}
