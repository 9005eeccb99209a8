//! Payslip email delivery.
//!
//! [`DeliveryCoordinator`] composes the payslip email and reports the result
//! as a [`DeliveryOutcome`]. Delivery failures never fail the caller.

mod mailer;

pub use mailer::{DisabledMailer, Mailer, OutgoingEmail, SmtpMailer};

#[cfg(test)]
pub(crate) use mailer::testing;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{PayMonth, Payslip};
use crate::render::{format_currency, payslip_filename};

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    /// Whether the email was accepted by the mail server.
    pub success: bool,
    /// Message id on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryOutcome {
    fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message_id: Some(message_id),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Escapes text for an HTML element body or attribute value.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sends payslips to staff by email.
pub struct DeliveryCoordinator {
    mailer: Arc<dyn Mailer>,
    institution_name: String,
    currency_prefix: String,
}

impl DeliveryCoordinator {
    /// Creates a coordinator.
    pub fn new(mailer: Arc<dyn Mailer>, institution_name: impl Into<String>, currency_prefix: impl Into<String>) -> Self {
        Self {
            mailer,
            institution_name: institution_name.into(),
            currency_prefix: currency_prefix.into(),
        }
    }

    fn period_label(payslip: &Payslip) -> String {
        PayMonth::new(payslip.month, payslip.year)
            .map(|m| m.label())
            .unwrap_or_else(|_| format!("{}/{}", payslip.month, payslip.year))
    }

    fn html_body(&self, payslip: &Payslip, period: &str) -> String {
        let money = |amount| format_currency(amount, &self.currency_prefix);
        format!(
            "<html><body>\
             <h2>{institution}</h2>\
             <p>Dear {name},</p>\
             <p>Please find attached your salary slip for {period}.</p>\
             <table>\
             <tr><td>Employee ID</td><td>{employee_id}</td></tr>\
             <tr><td>Department</td><td>{department}</td></tr>\
             <tr><td>Total Earnings</td><td>{earnings}</td></tr>\
             <tr><td>Total Deductions</td><td>{deductions}</td></tr>\
             <tr><td><strong>Net Salary</strong></td><td><strong>{net}</strong></td></tr>\
             </table>\
             <p>This is an automated message. Please do not reply.</p>\
             </body></html>",
            institution = escape_html(&self.institution_name),
            name = escape_html(&payslip.staff_name),
            period = period,
            employee_id = escape_html(&payslip.employee_id),
            department = escape_html(&payslip.department),
            earnings = money(payslip.earnings.total_earnings),
            deductions = money(payslip.deductions.total_deductions),
            net = money(payslip.net_salary),
        )
    }

    /// Emails the payslip with its PDF attached.
    ///
    /// Returns a failed outcome instead of an error when the recipient is
    /// missing, the PDF cannot be read, or the mailer rejects the message.
    pub async fn deliver(&self, payslip: &Payslip, pdf_path: &Path, recipient: &str) -> DeliveryOutcome {
        if recipient.trim().is_empty() {
            warn!(payslip_id = %payslip.id, "No email address on file");
            return DeliveryOutcome::failed("no email address on file");
        }

        let attachment = match tokio::fs::read(pdf_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(payslip_id = %payslip.id, path = %pdf_path.display(), error = %e, "Cannot read payslip PDF");
                return DeliveryOutcome::failed(format!("cannot read payslip PDF: {}", e));
            }
        };

        let period = Self::period_label(payslip);
        let email = OutgoingEmail {
            to: recipient.to_string(),
            subject: format!("Salary Slip - {}", period),
            html_body: self.html_body(payslip, &period),
            attachment_name: payslip_filename(&payslip.employee_id, payslip.month, payslip.year),
            attachment,
        };

        match self.mailer.send(email).await {
            Ok(message_id) => {
                info!(payslip_id = %payslip.id, %message_id, "Payslip email sent");
                DeliveryOutcome::sent(message_id)
            }
            Err(e) => {
                warn!(payslip_id = %payslip.id, error = %e, "Payslip email failed");
                DeliveryOutcome::failed(e.to_string())
            }
        }
    }
}
