//! Results returned by workflow operations.

use serde::Serialize;
use uuid::Uuid;

use crate::delivery::DeliveryOutcome;
use crate::models::{Payslip, PayslipSummary};

/// Result of generating one payslip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// The stored payslip, reflecting the delivery result.
    pub payslip: Payslip,
    /// What happened to the email.
    pub email: DeliveryOutcome,
}

/// Result of regenerating a payslip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationOutcome {
    /// The newly generated payslip.
    #[serde(flatten)]
    pub generated: GenerationOutcome,
    /// Summary of the record that was deleted.
    pub previous: PayslipSummary,
}

/// Result of an explicit email resend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOutcome {
    /// The payslip after it was marked sent.
    pub payslip: Payslip,
    /// Message id reported by the mailer.
    pub message_id: String,
}

/// A payslip PDF ready to stream.
#[derive(Debug, Clone)]
pub struct PayslipDocument {
    /// Download file name.
    pub filename: String,
    /// PDF bytes.
    pub bytes: Vec<u8>,
}

/// Per-staff result of bulk generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkItemStatus {
    /// A new payslip was created.
    Generated,
    /// A payslip already existed and was left alone.
    AlreadyExists,
}

/// One staff member's entry in a bulk report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItem {
    /// Staff id.
    pub staff_id: String,
    /// Staff name.
    pub staff_name: String,
    /// The new or pre-existing payslip.
    pub payslip_id: Uuid,
    /// What happened.
    pub status: BulkItemStatus,
    /// Whether the payslip has been emailed.
    pub email_sent: bool,
}

/// A staff member whose payslip could not be generated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkError {
    /// Staff id.
    pub staff_id: String,
    /// Staff name.
    pub staff_name: String,
    /// Why generation failed.
    pub error: String,
}

/// Summary of a bulk generation run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkGenerationReport {
    /// Approved staff considered.
    pub total_staff: usize,
    /// Payslips created.
    pub successful: usize,
    /// Staff skipped because a payslip already existed.
    pub already_exists: usize,
    /// Staff whose generation failed.
    pub errors: usize,
    /// Created and skipped entries, in processing order.
    pub results: Vec<BulkItem>,
    /// Failed entries, in processing order.
    pub error_details: Vec<BulkError>,
}

impl BulkGenerationReport {
    pub(crate) fn new(total_staff: usize) -> Self {
        Self {
            total_staff,
            ..Default::default()
        }
    }

    pub(crate) fn record_generated(&mut self, payslip: &Payslip) {
        self.successful += 1;
        self.results.push(BulkItem {
            staff_id: payslip.staff_id.clone(),
            staff_name: payslip.staff_name.clone(),
            payslip_id: payslip.id,
            status: BulkItemStatus::Generated,
            email_sent: payslip.email_sent,
        });
    }

    pub(crate) fn record_existing(&mut self, existing: &PayslipSummary) {
        self.already_exists += 1;
        self.results.push(BulkItem {
            staff_id: existing.staff_id.clone(),
            staff_name: existing.staff_name.clone(),
            payslip_id: existing.id,
            status: BulkItemStatus::AlreadyExists,
            email_sent: existing.email_sent,
        });
    }

    pub(crate) fn record_error(&mut self, staff_id: &str, staff_name: &str, error: String) {
        self.errors += 1;
        self.error_details.push(BulkError {
            staff_id: staff_id.to_string(),
            staff_name: staff_name.to_string(),
            error,
        });
    }
}
