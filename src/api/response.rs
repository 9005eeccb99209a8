//! Response types for the payroll API.
//!
//! This module defines the success bodies, the error body, and the mapping
//! from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{Payslip, PayslipSummary};
use crate::workflow::{BulkGenerationReport, GenerationOutcome, RegenerationOutcome, ResendOutcome};

/// Follow-up actions offered when a payslip already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedActions {
    /// Endpoint that replaces the existing payslip.
    pub regenerate: String,
    /// Endpoint that returns the existing payslip.
    pub view: String,
    /// Endpoint that streams the existing PDF.
    pub download: String,
}

impl SuggestedActions {
    /// Actions for an existing payslip.
    pub fn for_payslip(existing: &PayslipSummary) -> Self {
        Self {
            regenerate: "/payslips/regenerate".to_string(),
            view: format!("/payslips/{}", existing.id),
            download: format!("/payslips/{}/download", existing.id),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Underlying error text, for unexpected failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The conflicting record, on 409.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<PayslipSummary>,
    /// What the client can do about a conflict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<SuggestedActions>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            error: None,
            existing: None,
            actions: None,
        }
    }

    /// Creates a new API error carrying the underlying error text.
    pub fn with_error(code: impl Into<String>, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates the conflict response for an existing payslip.
    pub fn payslip_exists(existing: PayslipSummary) -> Self {
        Self {
            actions: Some(SuggestedActions::for_payslip(&existing)),
            message: format!(
                "Payslip already exists for {} for {}/{}",
                existing.staff_name, existing.month, existing.year
            ),
            existing: Some(existing),
            ..Self::new("PAYSLIP_EXISTS", "")
        }
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let text = error.to_string();
        match error {
            EngineError::Validation { message, .. } => {
                Self::new(StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
            EngineError::InvalidStaff { .. } => {
                Self::new(StatusCode::BAD_REQUEST, ApiError::new("INVALID_STAFF", text))
            }
            EngineError::StaffNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, ApiError::new("STAFF_NOT_FOUND", text))
            }
            EngineError::PayslipNotFound { .. } | EngineError::PayslipNotFoundForPeriod { .. } => {
                Self::new(StatusCode::NOT_FOUND, ApiError::new("PAYSLIP_NOT_FOUND", text))
            }
            EngineError::PdfNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("PDF_NOT_FOUND", "Payslip PDF file not found"),
            ),
            EngineError::DuplicatePayslip { existing } => {
                Self::new(StatusCode::CONFLICT, ApiError::payslip_exists(*existing))
            }
            EngineError::Render { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_error("RENDER_ERROR", "Failed to generate payslip PDF", message),
            ),
            EngineError::Delivery { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_error("DELIVERY_ERROR", "Failed to send payslip email", message),
            ),
            EngineError::Storage { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_error("STORAGE_ERROR", "Payslip storage failed", message),
            ),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_error("CONFIG_ERROR", "Configuration error", text),
            ),
        }
    }
}

/// Body of a successful generate call.
#[derive(Debug, Serialize)]
pub struct GeneratedResponse {
    /// Human-readable result.
    pub message: String,
    /// The new payslip and delivery result.
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// Body of a successful regenerate call.
#[derive(Debug, Serialize)]
pub struct RegeneratedResponse {
    /// Human-readable result.
    pub message: String,
    /// The new payslip, delivery result and deleted record.
    #[serde(flatten)]
    pub outcome: RegenerationOutcome,
}

/// Body of a bulk generation call.
#[derive(Debug, Serialize)]
pub struct BulkResponse {
    /// Human-readable result.
    pub message: String,
    /// Per-staff report.
    #[serde(flatten)]
    pub report: BulkGenerationReport,
}

/// Body of a resend call.
#[derive(Debug, Serialize)]
pub struct ResentResponse {
    /// Human-readable result.
    pub message: String,
    /// The payslip and message id.
    #[serde(flatten)]
    pub outcome: ResendOutcome,
}

/// Body of a listing call.
#[derive(Debug, Serialize)]
pub struct PayslipListResponse {
    /// Number of payslips returned.
    pub count: usize,
    /// The payslips, newest period first.
    pub payslips: Vec<Payslip>,
}

impl From<Vec<Payslip>> for PayslipListResponse {
    fn from(payslips: Vec<Payslip>) -> Self {
        Self {
            count: payslips.len(),
            payslips,
        }
    }
}
