//! Configuration types for the payroll service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Payroll policy constants applied to every payslip.
///
/// Insurance is deliberately absent: it is always waived and cannot be
/// configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Share of the basic salary paid as allowances.
    pub allowance_rate: Decimal,
    /// Share of total earnings withheld as tax.
    pub tax_rate: Decimal,
    /// Share of the basic salary withheld for the provident fund.
    pub provident_fund_rate: Decimal,
    /// Bonus paid for a month of perfect attendance.
    pub perfect_attendance_bonus: Decimal,
    /// Hours that make up one equivalent day.
    pub hours_per_day: Decimal,
    /// Prefix printed before amounts on payslips.
    pub currency_prefix: String,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            allowance_rate: Decimal::new(10, 2),
            tax_rate: Decimal::new(5, 2),
            provident_fund_rate: Decimal::new(6, 2),
            perfect_attendance_bonus: Decimal::new(1500, 0),
            hours_per_day: Decimal::new(9, 0),
            currency_prefix: "Rs.".to_string(),
        }
    }
}

/// policy.yaml file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyFile {
    /// Payroll policy constants.
    #[serde(default)]
    pub policy: PayrollPolicy,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API binds to.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Where rendered payslips are written.
///
/// Only the path relative to `upload_dir` is persisted, so the upload root
/// can move without migrating records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root upload directory.
    pub upload_dir: PathBuf,
    /// Sub-directory of `upload_dir` holding payslip PDFs.
    pub payslip_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            payslip_dir: "payslips".to_string(),
        }
    }
}

/// Outbound email settings. The SMTP password is never read from file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// When false, deliveries are reported as failed without contacting a server.
    pub enabled: bool,
    /// SMTP relay host.
    pub smtp_server: String,
    /// SMTP port (STARTTLS).
    pub smtp_port: u16,
    /// SMTP user name.
    pub username: String,
    /// Sender mailbox, e.g. `Edutack Payroll <payroll@example.edu>`.
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            from_address: "Edutack Payroll <payroll@edutack.local>".to_string(),
        }
    }
}

/// Branding printed in the payslip header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstitutionConfig {
    /// Institution name.
    pub name: String,
    /// Line printed under the name.
    pub tagline: String,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            name: "Edutack".to_string(),
            tagline: "Academic Management System".to_string(),
        }
    }
}

/// service.yaml file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Payslip storage settings.
    pub storage: StorageConfig,
    /// Email settings.
    pub email: EmailConfig,
    /// Payslip branding.
    pub institution: InstitutionConfig,
    /// Optional staff and attendance seed file, relative to the config directory.
    pub seed_file: Option<PathBuf>,
}
