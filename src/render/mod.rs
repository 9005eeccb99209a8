//! Payslip document rendering.
//!
//! [`PayslipRenderer`] decides where a payslip's PDF lives and hands a
//! [`PayslipLayout`] to a [`DocumentEngine`] to draw it. Documents live at
//! `{payslip_dir}/{payslip id}/payslip_{employeeId}_{month}_{year}.pdf`.

mod engine;
mod layout;

pub use engine::{DocumentEngine, PdfEngine};
pub use layout::{build_layout, format_currency, LayoutRow, PayslipLayout};

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::{InstitutionConfig, PayrollPolicy, StorageConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::Payslip;

/// Where a rendered document was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// File name only.
    pub filename: String,
    /// Absolute (or upload-root based) path on disk.
    pub filepath: PathBuf,
    /// Path relative to the upload root, as stored on the payslip.
    pub relative_path: String,
}

/// Builds a file name that cannot escape the payslip directory.
///
/// Characters outside `[A-Za-z0-9_-]` in the employee id become `_`.
pub fn payslip_filename(employee_id: &str, month: u32, year: i32) -> String {
    let safe_id: String = employee_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("payslip_{}_{}_{}.pdf", safe_id, month, year)
}

/// Renders payslips to documents under the upload root.
pub struct PayslipRenderer {
    engine: Arc<dyn DocumentEngine>,
    upload_dir: PathBuf,
    payslip_dir: String,
    institution: InstitutionConfig,
    currency_prefix: String,
}

impl PayslipRenderer {
    /// Creates a renderer.
    pub fn new(
        engine: Arc<dyn DocumentEngine>,
        storage: &StorageConfig,
        institution: InstitutionConfig,
        policy: &PayrollPolicy,
    ) -> Self {
        Self {
            engine,
            upload_dir: storage.upload_dir.clone(),
            payslip_dir: storage.payslip_dir.clone(),
            institution,
            currency_prefix: policy.currency_prefix.clone(),
        }
    }

    /// Renders a payslip into its own directory under the payslip root,
    /// overwriting any previous document for the same record.
    ///
    /// Files are keyed by payslip id, so employee ids that sanitise to the
    /// same file name never share a document. Drawing runs on the blocking
    /// pool.
    pub async fn render(&self, payslip: &Payslip) -> EngineResult<RenderedDocument> {
        let record_dir = payslip.id.to_string();
        let dir = self.upload_dir.join(&self.payslip_dir).join(&record_dir);
        let filename = payslip_filename(&payslip.employee_id, payslip.month, payslip.year);
        let filepath = dir.join(&filename);
        let layout = build_layout(payslip, &self.institution, &self.currency_prefix);

        let engine = Arc::clone(&self.engine);
        let target = filepath.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir).map_err(|e| EngineError::Render {
                message: format!("cannot create {}: {}", dir.display(), e),
            })?;
            engine.write_document(&layout, &target)
        })
        .await
        .map_err(|e| EngineError::Render {
            message: format!("render task failed: {}", e),
        })??;
        debug!(path = %filepath.display(), "Rendered payslip document");

        Ok(RenderedDocument {
            relative_path: format!("{}/{}/{}", self.payslip_dir, record_dir, filename),
            filename,
            filepath,
        })
    }

    /// Removes a previously rendered document and its record directory.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn discard(&self, relative_path: &str) {
        if relative_path.is_empty() {
            return;
        }
        let path = self.resolve(relative_path);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            debug!(path = %path.display(), error = %e, "Could not remove payslip document");
            return;
        }
        if let Some(parent) = path.parent() {
            if parent != self.upload_dir.join(&self.payslip_dir) {
                let _ = tokio::fs::remove_dir(parent).await;
            }
        }
    }

    /// Resolves a stored relative path against the upload root.
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.upload_dir.join(relative_path)
    }
}
