//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while generating, storing,
//! rendering and delivering payslips.

use thiserror::Error;
use uuid::Uuid;

use crate::models::PayslipSummary;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use edutack_payroll::error::EngineError;
///
/// let error = EngineError::StaffNotFound {
///     staff_id: "stf_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Staff member not found: stf_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required request field was missing or malformed.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field, as named on the wire.
        field: String,
        /// A description of what was wrong.
        message: String,
    },

    /// The staff id did not resolve to a staff profile.
    #[error("Staff member not found: {staff_id}")]
    StaffNotFound {
        /// The staff id that was looked up.
        staff_id: String,
    },

    /// A staff profile lacks data needed to produce a payslip.
    #[error("Staff member '{staff_id}' has invalid {field}: {message}")]
    InvalidStaff {
        /// The staff id.
        staff_id: String,
        /// The field that was unusable.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// No payslip exists with the given id.
    #[error("Payslip not found: {payslip_id}")]
    PayslipNotFound {
        /// The payslip id that was looked up.
        payslip_id: Uuid,
    },

    /// No payslip exists for the staff member and month.
    #[error("No payslip found for staff '{staff_id}' for {month}/{year}")]
    PayslipNotFoundForPeriod {
        /// The staff id.
        staff_id: String,
        /// The month (1-12).
        month: u32,
        /// The year.
        year: i32,
    },

    /// The payslip record exists but its PDF is missing on disk.
    #[error("Payslip PDF not found: {path}")]
    PdfNotFound {
        /// The resolved path that was missing.
        path: String,
    },

    /// A payslip already exists for the staff member and month.
    #[error(
        "Payslip already exists for {} for {}/{}",
        existing.staff_name,
        existing.month,
        existing.year
    )]
    DuplicatePayslip {
        /// Summary of the record that already exists.
        existing: Box<PayslipSummary>,
    },

    /// The payslip document could not be rendered or written.
    #[error("Failed to render payslip: {message}")]
    Render {
        /// A description of the render failure.
        message: String,
    },

    /// The payslip email could not be delivered.
    #[error("Failed to deliver payslip email: {message}")]
    Delivery {
        /// A description of the delivery failure.
        message: String,
    },

    /// The persistence layer failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
