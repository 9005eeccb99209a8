//! Payslip generation workflow.
//!
//! Each (staff member, month, year) moves through `none -> generated -> sent`.
//! Regeneration replaces the existing record in any state and starts over.
//! Financial fields are never patched in place.

mod report;

pub use report::{
    BulkError, BulkGenerationReport, BulkItem, BulkItemStatus, GenerationOutcome, PayslipDocument,
    RegenerationOutcome, ResendOutcome,
};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{AttendanceAggregator, attendance_audit_step, compute_payslip};
use crate::config::PayrollPolicy;
use crate::delivery::DeliveryCoordinator;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    PayMonth, Payslip, PayslipComputation, PayslipFilter, PayslipKey, PayslipStatus, SalaryDetails,
    StaffProfile,
};
use crate::render::{PayslipRenderer, payslip_filename};
use crate::storage::{AttendanceSource, PayslipStore, StaffDirectory};

fn require_field(value: &str, field: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, format!("{} is required", field)));
    }
    Ok(())
}

/// Rejects profiles that cannot produce a deliverable payslip.
fn check_profile(staff: &StaffProfile) -> EngineResult<()> {
    let invalid = |field: &str, message: &str| EngineError::InvalidStaff {
        staff_id: staff.id.clone(),
        field: field.to_string(),
        message: message.to_string(),
    };
    if staff.employee_id.trim().is_empty() {
        return Err(invalid("employeeId", "employee id is missing"));
    }
    if staff.email.trim().is_empty() {
        return Err(invalid("email", "email address is missing"));
    }
    Ok(())
}

fn build_payslip(
    staff: &StaffProfile,
    pay_month: &PayMonth,
    computation: PayslipComputation,
    generated_by: &str,
) -> Payslip {
    let salary = &staff.salary;
    let attendance = &computation.attendance;
    let breakdown = computation.breakdown;

    Payslip {
        id: Uuid::new_v4(),
        staff_id: staff.id.clone(),
        staff_name: staff.name.clone(),
        employee_id: staff.employee_id.clone(),
        department: staff.department.clone(),
        month: pay_month.month(),
        year: pay_month.year(),
        salary_details: SalaryDetails {
            salary_type: salary.salary_type,
            salary: salary.salary,
            base_salary: salary.base_salary,
            daily_rate: salary.daily_rate,
            hourly_rate: salary.hourly_rate,
            working_days: attendance.working_days,
            present_days: attendance.present_days,
            absent_days: attendance.absent_days,
            total_working_hours: attendance.total_working_hours,
            salary_rule: computation.salary_rule,
        },
        earnings: breakdown.earnings,
        deductions: breakdown.deductions,
        net_salary: breakdown.net_salary,
        pdf_path: String::new(),
        email_sent: false,
        email_sent_at: None,
        generated_by: generated_by.to_string(),
        status: PayslipStatus::Generated,
        generated_at: Utc::now(),
        calculation_steps: computation.audit_steps,
    }
}

/// Orchestrates aggregation, calculation, rendering, storage and delivery.
pub struct PayslipWorkflow {
    staff: Arc<dyn StaffDirectory>,
    payslips: Arc<dyn PayslipStore>,
    aggregator: AttendanceAggregator,
    renderer: PayslipRenderer,
    delivery: DeliveryCoordinator,
    policy: PayrollPolicy,
}

impl PayslipWorkflow {
    /// Creates a workflow over the given backends.
    pub fn new(
        staff: Arc<dyn StaffDirectory>,
        payslips: Arc<dyn PayslipStore>,
        attendance: Arc<dyn AttendanceSource>,
        renderer: PayslipRenderer,
        delivery: DeliveryCoordinator,
        policy: PayrollPolicy,
    ) -> Self {
        Self {
            staff,
            payslips,
            aggregator: AttendanceAggregator::new(attendance),
            renderer,
            delivery,
            policy,
        }
    }

    async fn require_staff(&self, staff_id: &str) -> EngineResult<StaffProfile> {
        self.staff
            .get_staff(staff_id)
            .await?
            .ok_or_else(|| EngineError::StaffNotFound {
                staff_id: staff_id.to_string(),
            })
    }

    async fn require_payslip(&self, payslip_id: Uuid) -> EngineResult<Payslip> {
        self.payslips
            .get(payslip_id)
            .await?
            .ok_or(EngineError::PayslipNotFound { payslip_id })
    }

    /// Computes a payslip and renders its document without storing it.
    async fn prepare(
        &self,
        staff: &StaffProfile,
        pay_month: &PayMonth,
        generated_by: &str,
    ) -> EngineResult<(Payslip, PathBuf)> {
        check_profile(staff)?;

        let (aggregate, record_count) = self.aggregator.aggregate(&staff.id, pay_month).await?;
        let attendance_step = attendance_audit_step(&aggregate, pay_month, record_count, 1);
        let computation = compute_payslip(&staff.salary, &aggregate, &self.policy, Some(attendance_step));

        let mut payslip = build_payslip(staff, pay_month, computation, generated_by);
        let rendered = self.renderer.render(&payslip).await?;
        payslip.pdf_path = rendered.relative_path;
        Ok((payslip, rendered.filepath))
    }

    /// Stores a prepared payslip and emails it.
    ///
    /// A losing concurrent insert surfaces as `DuplicatePayslip` and its
    /// document is removed.
    async fn commit(&self, staff: &StaffProfile, payslip: Payslip, pdf: PathBuf) -> EngineResult<GenerationOutcome> {
        let pdf_path = payslip.pdf_path.clone();
        let mut payslip = match self.payslips.insert(payslip).await {
            Ok(stored) => stored,
            Err(e) => {
                self.renderer.discard(&pdf_path).await;
                return Err(e);
            }
        };
        info!(
            payslip_id = %payslip.id,
            staff_id = %payslip.staff_id,
            month = payslip.month,
            year = payslip.year,
            net_salary = %payslip.net_salary,
            "Payslip generated"
        );

        let email = self.delivery.deliver(&payslip, &pdf, &staff.email).await;
        if email.success {
            if let Some(updated) = self.payslips.mark_sent(payslip.id, Utc::now()).await? {
                payslip = updated;
            }
        }

        Ok(GenerationOutcome { payslip, email })
    }

    /// Computes, renders, stores and emails a payslip with no prior record.
    ///
    /// Nothing is stored if rendering fails.
    async fn create(
        &self,
        staff: &StaffProfile,
        pay_month: &PayMonth,
        generated_by: &str,
    ) -> EngineResult<GenerationOutcome> {
        let (payslip, pdf) = self.prepare(staff, pay_month, generated_by).await?;
        self.commit(staff, payslip, pdf).await
    }

    /// Generates one payslip.
    ///
    /// Fails with `DuplicatePayslip` if one already exists for the month;
    /// the existing record is never overwritten. A failed email leaves the
    /// payslip in the `generated` state and is reported in the outcome.
    pub async fn generate(
        &self,
        staff_id: &str,
        month: u32,
        year: i32,
        generated_by: &str,
    ) -> EngineResult<GenerationOutcome> {
        require_field(staff_id, "staffId")?;
        require_field(generated_by, "generatedBy")?;
        let pay_month = PayMonth::new(month, year)?;

        let staff = self.require_staff(staff_id).await?;
        let key = PayslipKey::new(staff_id, month, year);
        if let Some(existing) = self.payslips.find_for_period(&key).await? {
            return Err(EngineError::DuplicatePayslip {
                existing: Box::new(existing.summary()),
            });
        }

        self.create(&staff, &pay_month, generated_by).await
    }

    /// Generates payslips for every approved staff member, one at a time.
    ///
    /// Existing payslips are skipped and per-staff failures are collected;
    /// neither stops the run.
    pub async fn generate_all(
        &self,
        month: u32,
        year: i32,
        generated_by: &str,
    ) -> EngineResult<BulkGenerationReport> {
        require_field(generated_by, "generatedBy")?;
        let pay_month = PayMonth::new(month, year)?;

        let staff = self.staff.approved_staff().await?;
        let mut report = BulkGenerationReport::new(staff.len());
        info!(month, year, total_staff = staff.len(), "Bulk payslip generation started");

        for member in &staff {
            let key = PayslipKey::new(member.id.clone(), month, year);
            let result = match self.payslips.find_for_period(&key).await {
                Ok(Some(existing)) => Err(EngineError::DuplicatePayslip {
                    existing: Box::new(existing.summary()),
                }),
                Ok(None) => self.create(member, &pay_month, generated_by).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(outcome) => report.record_generated(&outcome.payslip),
                Err(EngineError::DuplicatePayslip { existing }) => report.record_existing(&existing),
                Err(e) => {
                    warn!(staff_id = %member.id, error = %e, "Payslip generation failed");
                    report.record_error(&member.id, &member.name, e.to_string());
                }
            }
        }

        info!(
            successful = report.successful,
            already_exists = report.already_exists,
            errors = report.errors,
            "Bulk payslip generation finished"
        );
        Ok(report)
    }

    /// Replaces the payslip for the month with a freshly generated one.
    ///
    /// The new document is rendered before the old record is deleted, so a
    /// render failure leaves the existing payslip untouched.
    pub async fn regenerate(
        &self,
        staff_id: &str,
        month: u32,
        year: i32,
        generated_by: &str,
    ) -> EngineResult<RegenerationOutcome> {
        require_field(staff_id, "staffId")?;
        require_field(generated_by, "generatedBy")?;
        let pay_month = PayMonth::new(month, year)?;

        let key = PayslipKey::new(staff_id, month, year);
        let previous = self
            .payslips
            .find_for_period(&key)
            .await?
            .ok_or_else(|| EngineError::PayslipNotFoundForPeriod {
                staff_id: staff_id.to_string(),
                month,
                year,
            })?;
        let staff = self.require_staff(staff_id).await?;
        let (payslip, pdf) = self.prepare(&staff, &pay_month, generated_by).await?;

        if let Err(e) = self.payslips.delete(previous.id).await {
            self.renderer.discard(&payslip.pdf_path).await;
            return Err(e);
        }
        self.renderer.discard(&previous.pdf_path).await;
        info!(payslip_id = %previous.id, staff_id, month, year, "Deleted payslip for regeneration");

        let generated = self.commit(&staff, payslip, pdf).await?;
        Ok(RegenerationOutcome {
            generated,
            previous: previous.summary(),
        })
    }

    /// Returns the payslip PDF, re-rendering it if the file has gone missing.
    pub async fn download(&self, payslip_id: Uuid) -> EngineResult<PayslipDocument> {
        let payslip = self.require_payslip(payslip_id).await?;
        let mut path = self.renderer.resolve(&payslip.pdf_path);

        let present = !payslip.pdf_path.is_empty() && tokio::fs::try_exists(&path).await.unwrap_or(false);
        if !present {
            warn!(%payslip_id, path = %path.display(), "Payslip PDF missing, re-rendering");
            let rendered = self.renderer.render(&payslip).await?;
            if rendered.relative_path != payslip.pdf_path {
                self.payslips
                    .update_pdf_path(payslip_id, &rendered.relative_path)
                    .await?;
            }
            path = rendered.filepath;
        }

        let bytes = tokio::fs::read(&path).await.map_err(|_| EngineError::PdfNotFound {
            path: path.display().to_string(),
        })?;

        Ok(PayslipDocument {
            filename: payslip_filename(&payslip.employee_id, payslip.month, payslip.year),
            bytes,
        })
    }

    /// Emails an existing payslip again.
    ///
    /// Unlike initial generation, a failed send is returned as an error.
    pub async fn resend_email(&self, payslip_id: Uuid) -> EngineResult<ResendOutcome> {
        let payslip = self.require_payslip(payslip_id).await?;

        let path = self.renderer.resolve(&payslip.pdf_path);
        if payslip.pdf_path.is_empty() || !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(EngineError::PdfNotFound {
                path: path.display().to_string(),
            });
        }

        let staff = self.require_staff(&payslip.staff_id).await?;
        let outcome = self.delivery.deliver(&payslip, &path, &staff.email).await;
        if !outcome.success {
            return Err(EngineError::Delivery {
                message: outcome.error.unwrap_or_else(|| "unknown delivery failure".to_string()),
            });
        }

        let payslip = self
            .payslips
            .mark_sent(payslip_id, Utc::now())
            .await?
            .ok_or(EngineError::PayslipNotFound { payslip_id })?;

        Ok(ResendOutcome {
            payslip,
            message_id: outcome.message_id.unwrap_or_default(),
        })
    }

    /// Returns one payslip.
    pub async fn get(&self, payslip_id: Uuid) -> EngineResult<Payslip> {
        self.require_payslip(payslip_id).await
    }

    /// Lists payslips matching the filter, newest period first.
    pub async fn list(&self, filter: &PayslipFilter) -> EngineResult<Vec<Payslip>> {
        self.payslips.list(filter).await
    }

    /// Lists one staff member's payslips, optionally for a single year.
    pub async fn list_for_staff(&self, staff_id: &str, year: Option<i32>) -> EngineResult<Vec<Payslip>> {
        let filter = PayslipFilter {
            staff_id: Some(staff_id.to_string()),
            year,
            ..Default::default()
        };
        self.payslips.list(&filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InstitutionConfig, StorageConfig};
    use crate::delivery::testing::RecordingMailer;
    use crate::delivery::Mailer;
    use crate::models::{AttendanceRecord, AttendanceStatus, SalaryRule, StaffSalaryProfile};
    use crate::render::{DocumentEngine, PayslipLayout, PdfEngine};
    use crate::storage::{MemoryAttendanceSource, MemoryPayslipStore, MemoryStaffDirectory};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::path::Path;
    use tempfile::TempDir;

    struct BrokenEngine;

    impl DocumentEngine for BrokenEngine {
        fn write_document(&self, _layout: &PayslipLayout, _path: &Path) -> EngineResult<()> {
            Err(EngineError::Render {
                message: "engine unavailable".to_string(),
            })
        }
    }

    struct Harness {
        workflow: Arc<PayslipWorkflow>,
        store: Arc<MemoryPayslipStore>,
        directory: Arc<MemoryStaffDirectory>,
        attendance: Arc<MemoryAttendanceSource>,
        mailer: Arc<RecordingMailer>,
        dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            Self::with(Arc::new(RecordingMailer::default()), Arc::new(PdfEngine))
        }

        fn with(mailer: Arc<RecordingMailer>, engine: Arc<dyn DocumentEngine>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = Arc::new(MemoryPayslipStore::new());
            let directory = Arc::new(MemoryStaffDirectory::new(vec![asha(), ravi()]));
            let attendance = Arc::new(MemoryAttendanceSource::new(march_attendance()));
            let workflow = Self::workflow_over(&dir, &store, &directory, &attendance, mailer.clone(), engine);
            Self {
                workflow: Arc::new(workflow),
                store,
                directory,
                attendance,
                mailer,
                dir,
            }
        }

        fn workflow_over(
            dir: &TempDir,
            store: &Arc<MemoryPayslipStore>,
            directory: &Arc<MemoryStaffDirectory>,
            attendance: &Arc<MemoryAttendanceSource>,
            mailer: Arc<dyn Mailer>,
            engine: Arc<dyn DocumentEngine>,
        ) -> PayslipWorkflow {
            let policy = PayrollPolicy::default();
            let storage = StorageConfig {
                upload_dir: dir.path().to_path_buf(),
                payslip_dir: "payslips".to_string(),
            };
            PayslipWorkflow::new(
                directory.clone(),
                store.clone(),
                attendance.clone(),
                PayslipRenderer::new(engine, &storage, InstitutionConfig::default(), &policy),
                DeliveryCoordinator::new(mailer, "Edutack", "Rs."),
                policy,
            )
        }

        /// A second workflow over the same stores with a different mailer.
        fn sibling(&self, mailer: Arc<dyn Mailer>) -> PayslipWorkflow {
            self.sibling_with(mailer, Arc::new(PdfEngine))
        }

        fn sibling_with(&self, mailer: Arc<dyn Mailer>, engine: Arc<dyn DocumentEngine>) -> PayslipWorkflow {
            Self::workflow_over(&self.dir, &self.store, &self.directory, &self.attendance, mailer, engine)
        }
    }

    fn asha() -> StaffProfile {
        StaffProfile {
            id: "stf_001".to_string(),
            name: "Asha Rao".to_string(),
            employee_id: "EMP001".to_string(),
            department: "Mathematics".to_string(),
            email: "asha@example.edu".to_string(),
            approved: true,
            salary: StaffSalaryProfile::fixed(Decimal::new(20000, 0)),
        }
    }

    fn ravi() -> StaffProfile {
        let mut salary = StaffSalaryProfile::attendance_based();
        salary.hourly_rate = Decimal::new(150, 0);
        StaffProfile {
            id: "stf_002".to_string(),
            name: "Ravi Kumar".to_string(),
            employee_id: "EMP002".to_string(),
            department: "Physics".to_string(),
            email: "ravi@example.edu".to_string(),
            approved: true,
            salary,
        }
    }

    fn record(staff_id: &str, day: u32, status: AttendanceStatus, hours: i64) -> AttendanceRecord {
        AttendanceRecord {
            staff_id: staff_id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            status,
            working_hours: Decimal::new(hours, 0),
        }
    }

    fn march_attendance() -> Vec<AttendanceRecord> {
        let mut records: Vec<AttendanceRecord> = (3..=7)
            .map(|day| record("stf_001", day, AttendanceStatus::Present, 8))
            .collect();
        // 160 hours for Ravi with one late day.
        records.extend((3..=21).map(|day| record("stf_002", day, AttendanceStatus::Present, 8)));
        records.push(record("stf_002", 24, AttendanceStatus::Late, 8));
        records
    }

    #[tokio::test]
    async fn test_generate_fixed_salary_scenario() {
        let h = Harness::new();
        let outcome = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();
        let payslip = &outcome.payslip;

        assert_eq!(payslip.earnings.basic_salary, Decimal::new(20000, 0));
        assert_eq!(payslip.earnings.allowances, Decimal::new(2000, 0));
        assert_eq!(payslip.earnings.bonus, Decimal::new(1500, 0));
        assert_eq!(payslip.earnings.total_earnings, Decimal::new(23500, 0));
        assert_eq!(payslip.deductions.tax, Decimal::new(1175, 0));
        assert_eq!(payslip.deductions.provident_fund, Decimal::new(1200, 0));
        assert_eq!(payslip.deductions.total_deductions, Decimal::new(2375, 0));
        assert_eq!(payslip.net_salary, Decimal::new(21125, 0));

        assert_eq!(payslip.salary_details.working_days, 31);
        assert_eq!(payslip.salary_details.present_days, 5);
        assert_eq!(payslip.salary_details.salary_rule, SalaryRule::FixedSalary);
        assert_eq!(payslip.salary_details.salary, Decimal::new(20000, 0));
        assert_eq!(
            payslip.pdf_path,
            format!("payslips/{}/payslip_EMP001_3_2025.pdf", payslip.id)
        );
        assert_eq!(payslip.calculation_steps.len(), 3);

        assert!(outcome.email.success);
        assert_eq!(payslip.status, PayslipStatus::Sent);
        assert!(payslip.email_sent);
        assert!(payslip.email_sent_at.is_some());
        assert_eq!(h.mailer.count(), 1);
        assert!(h.dir.path().join(&payslip.pdf_path).exists());
    }

    #[tokio::test]
    async fn test_generate_hourly_scenario() {
        let h = Harness::new();
        let payslip = h.workflow.generate("stf_002", 3, 2025, "admin_001").await.unwrap().payslip;

        assert_eq!(payslip.salary_details.total_working_hours, Decimal::new(160, 0));
        assert_eq!(payslip.salary_details.salary_rule, SalaryRule::HourlyRate);
        assert_eq!(payslip.earnings.basic_salary, Decimal::new(24000, 0));
        assert_eq!(payslip.earnings.bonus, Decimal::ZERO);
        assert_eq!(payslip.earnings.total_earnings, Decimal::new(26400, 0));
        assert_eq!(payslip.deductions.tax, Decimal::new(1320, 0));
        assert_eq!(payslip.deductions.provident_fund, Decimal::new(1440, 0));
        assert_eq!(payslip.net_salary, Decimal::new(23640, 0));
    }

    #[tokio::test]
    async fn test_generate_twice_conflicts_with_first_record() {
        let h = Harness::new();
        let first = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();

        let err = h.workflow.generate("stf_001", 3, 2025, "admin_002").await.unwrap_err();
        match err {
            EngineError::DuplicatePayslip { existing } => assert_eq!(existing.id, first.payslip.id),
            other => panic!("expected duplicate, got {other:?}"),
        }
        assert_eq!(h.store.len().await, 1);
        assert_eq!(h.mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_generate_creates_one_record() {
        let h = Harness::new();

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let workflow = h.workflow.clone();
                tokio::spawn(async move { workflow.generate("stf_001", 3, 2025, "admin_001").await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(EngineError::DuplicatePayslip { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 5);
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_leaves_payslip_generated() {
        let h = Harness::with(Arc::new(RecordingMailer::failing()), Arc::new(PdfEngine));
        let outcome = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();

        assert!(!outcome.email.success);
        assert!(outcome.email.error.is_some());
        assert_eq!(outcome.payslip.status, PayslipStatus::Generated);
        assert!(!outcome.payslip.email_sent);
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_render_failure_stores_nothing() {
        let h = Harness::with(Arc::new(RecordingMailer::default()), Arc::new(BrokenEngine));
        let err = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap_err();

        assert!(matches!(err, EngineError::Render { .. }));
        assert!(h.store.is_empty().await);
        assert_eq!(h.mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_generate_validates_input() {
        let h = Harness::new();

        let err = h.workflow.generate("", 3, 2025, "admin_001").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "staffId"));

        let err = h.workflow.generate("stf_001", 13, 2025, "admin_001").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "month"));

        let err = h.workflow.generate("stf_001", 3, 2025, " ").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "generatedBy"));

        let err = h.workflow.generate("stf_404", 3, 2025, "admin_001").await.unwrap_err();
        assert!(matches!(err, EngineError::StaffNotFound { .. }));
    }

    #[tokio::test]
    async fn test_generate_all_isolates_failures() {
        let h = Harness::new();
        let mut broken = asha();
        broken.id = "stf_003".to_string();
        broken.name = "Meena Iyer".to_string();
        broken.employee_id = String::new();
        h.directory.upsert(broken).await;

        let report = h.workflow.generate_all(3, 2025, "admin_001").await.unwrap();

        assert_eq!(report.total_staff, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.already_exists, 0);
        assert_eq!(report.errors, 1);
        assert_eq!(report.error_details[0].staff_id, "stf_003");
        assert_eq!(report.results.len(), 2);
        assert_eq!(h.store.len().await, 2);
    }

    #[tokio::test]
    async fn test_generate_all_skips_existing_and_unapproved() {
        let h = Harness::new();
        let mut pending = ravi();
        pending.id = "stf_009".to_string();
        pending.approved = false;
        h.directory.upsert(pending).await;

        let first = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();
        let report = h.workflow.generate_all(3, 2025, "admin_001").await.unwrap();

        assert_eq!(report.total_staff, 2);
        assert_eq!(report.successful, 1);
        assert_eq!(report.already_exists, 1);
        assert_eq!(report.errors, 0);
        let skipped = report
            .results
            .iter()
            .find(|r| r.status == BulkItemStatus::AlreadyExists)
            .unwrap();
        assert_eq!(skipped.payslip_id, first.payslip.id);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_record() {
        let h = Harness::new();
        let first = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();
        assert!(first.payslip.email_sent);

        let offline = h.sibling(Arc::new(RecordingMailer::failing()));
        let outcome = offline.regenerate("stf_001", 3, 2025, "admin_002").await.unwrap();

        assert_eq!(outcome.previous.id, first.payslip.id);
        assert_ne!(outcome.generated.payslip.id, first.payslip.id);
        assert!(!outcome.generated.payslip.email_sent);
        assert_eq!(outcome.generated.payslip.status, PayslipStatus::Generated);
        assert_eq!(outcome.generated.payslip.generated_by, "admin_002");
        assert_eq!(h.store.len().await, 1);
        assert!(h.workflow.get(first.payslip.id).await.is_err());
        assert!(!h.dir.path().join(&first.payslip.pdf_path).exists());
        assert!(h.dir.path().join(&outcome.generated.payslip.pdf_path).exists());
    }

    #[tokio::test]
    async fn test_regenerate_keeps_existing_payslip_when_render_fails() {
        let h = Harness::new();
        let first = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();

        let broken = h.sibling_with(Arc::new(RecordingMailer::default()), Arc::new(BrokenEngine));
        let err = broken.regenerate("stf_001", 3, 2025, "admin_002").await.unwrap_err();

        assert!(matches!(err, EngineError::Render { .. }));
        let kept = h.workflow.get(first.payslip.id).await.unwrap();
        assert_eq!(kept, first.payslip);
        assert_eq!(h.store.len().await, 1);
        assert!(h.dir.path().join(&kept.pdf_path).exists());
    }

    #[tokio::test]
    async fn test_regenerate_requires_existing_payslip() {
        let h = Harness::new();
        let err = h.workflow.regenerate("stf_001", 3, 2025, "admin_001").await.unwrap_err();
        assert!(matches!(err, EngineError::PayslipNotFoundForPeriod { month: 3, year: 2025, .. }));
    }

    #[tokio::test]
    async fn test_download_rerenders_missing_pdf() {
        let h = Harness::new();
        let payslip = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap().payslip;
        let path = h.dir.path().join(&payslip.pdf_path);
        std::fs::remove_file(&path).unwrap();

        let document = h.workflow.download(payslip.id).await.unwrap();

        assert_eq!(document.filename, "payslip_EMP001_3_2025.pdf");
        assert!(document.bytes.starts_with(b"%PDF"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_employee_ids_sharing_a_file_name_download_their_own_pdf() {
        let h = Harness::new();
        let mut slash = asha();
        slash.id = "stf_101".to_string();
        slash.employee_id = "T/01".to_string();
        slash.salary = StaffSalaryProfile::fixed(Decimal::new(90000, 0));
        let mut dot = asha();
        dot.id = "stf_102".to_string();
        dot.employee_id = "T.01".to_string();
        dot.salary = StaffSalaryProfile::fixed(Decimal::new(10000, 0));
        h.directory.upsert(slash).await;
        h.directory.upsert(dot).await;

        let a = h.workflow.generate("stf_101", 3, 2025, "admin_001").await.unwrap().payslip;
        let b = h.workflow.generate("stf_102", 3, 2025, "admin_001").await.unwrap().payslip;
        assert_ne!(a.pdf_path, b.pdf_path);

        let doc_a = h.workflow.download(a.id).await.unwrap();
        let doc_b = h.workflow.download(b.id).await.unwrap();
        assert_eq!(doc_a.filename, "payslip_T_01_3_2025.pdf");
        assert_eq!(doc_b.filename, "payslip_T_01_3_2025.pdf");
        assert_ne!(doc_a.bytes, doc_b.bytes);
        assert_eq!(doc_a.bytes, std::fs::read(h.dir.path().join(&a.pdf_path)).unwrap());

        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].attachment, doc_a.bytes);
        assert_eq!(sent[1].attachment, doc_b.bytes);
    }

    #[tokio::test]
    async fn test_download_unknown_payslip() {
        let h = Harness::new();
        let err = h.workflow.download(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EngineError::PayslipNotFound { .. }));
    }

    #[tokio::test]
    async fn test_resend_email_marks_sent() {
        let h = Harness::with(Arc::new(RecordingMailer::failing()), Arc::new(PdfEngine));
        let payslip = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap().payslip;
        assert_eq!(payslip.status, PayslipStatus::Generated);

        let mailer = Arc::new(RecordingMailer::default());
        let online = h.sibling(mailer.clone());
        let outcome = online.resend_email(payslip.id).await.unwrap();

        assert_eq!(outcome.payslip.status, PayslipStatus::Sent);
        assert!(outcome.payslip.email_sent);
        assert_eq!(outcome.message_id, "<test-1@edutack.local>");
        assert_eq!(mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_resend_email_surfaces_failures() {
        let h = Harness::with(Arc::new(RecordingMailer::failing()), Arc::new(PdfEngine));
        let payslip = h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap().payslip;

        let err = h.workflow.resend_email(payslip.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Delivery { .. }));

        std::fs::remove_file(h.dir.path().join(&payslip.pdf_path)).unwrap();
        let err = h.workflow.resend_email(payslip.id).await.unwrap_err();
        assert!(matches!(err, EngineError::PdfNotFound { .. }));

        let err = h.workflow.resend_email(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EngineError::PayslipNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_for_staff_filters_by_year() {
        let h = Harness::new();
        h.workflow.generate("stf_001", 3, 2025, "admin_001").await.unwrap();
        h.workflow.generate("stf_001", 12, 2024, "admin_001").await.unwrap();
        h.workflow.generate("stf_002", 3, 2025, "admin_001").await.unwrap();

        let all = h.workflow.list_for_staff("stf_001", None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!((all[0].month, all[0].year), (3, 2025));

        let only_2024 = h.workflow.list_for_staff("stf_001", Some(2024)).await.unwrap();
        assert_eq!(only_2024.len(), 1);
        assert_eq!(only_2024[0].month, 12);

        let physics = h
            .workflow
            .list(&PayslipFilter {
                department: Some("Physics".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(physics.len(), 1);
    }
}
