//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod calculation_result;
mod pay_month;
mod payslip;
mod staff;

pub use attendance::{AttendanceAggregate, AttendanceRecord, AttendanceStatus};
pub use calculation_result::{
    AuditStep, Deductions, Earnings, PayslipComputation, SalaryBreakdown, SalaryRule,
};
pub use pay_month::PayMonth;
pub use payslip::{
    Payslip, PayslipFilter, PayslipKey, PayslipStatus, PayslipSummary, SalaryDetails,
};
pub use staff::{SalaryType, StaffProfile, StaffSalaryProfile};

#[cfg(test)]
pub(crate) use payslip::fixtures;
