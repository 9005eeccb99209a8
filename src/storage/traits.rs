//! Storage traits.
//!
//! These traits abstract the persistence layer so the workflow can run
//! against any backend. Implementations of [`PayslipStore`] must enforce
//! uniqueness of (staff id, month, year) themselves: two racing inserts for
//! the same key must not both succeed.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, Payslip, PayslipFilter, PayslipKey, StaffProfile};

/// Persistence for payslips.
#[async_trait]
pub trait PayslipStore: Send + Sync {
    /// Inserts a new payslip.
    ///
    /// Fails with `DuplicatePayslip`, carrying the existing record's summary,
    /// if a payslip with the same key already exists.
    async fn insert(&self, payslip: Payslip) -> EngineResult<Payslip>;

    /// Retrieves a payslip by id.
    async fn get(&self, id: Uuid) -> EngineResult<Option<Payslip>>;

    /// Retrieves the payslip for a staff member and month.
    async fn find_for_period(&self, key: &PayslipKey) -> EngineResult<Option<Payslip>>;

    /// Deletes a payslip, returning it if it existed.
    async fn delete(&self, id: Uuid) -> EngineResult<Option<Payslip>>;

    /// Records a successful email delivery.
    async fn mark_sent(&self, id: Uuid, at: DateTime<Utc>) -> EngineResult<Option<Payslip>>;

    /// Replaces the stored PDF path.
    async fn update_pdf_path(&self, id: Uuid, pdf_path: &str) -> EngineResult<Option<Payslip>>;

    /// Lists payslips matching the filter, newest period first.
    async fn list(&self, filter: &PayslipFilter) -> EngineResult<Vec<Payslip>>;
}

/// Read access to staff profiles.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Retrieves a staff member by id.
    async fn get_staff(&self, staff_id: &str) -> EngineResult<Option<StaffProfile>>;

    /// Lists approved staff in a stable order.
    async fn approved_staff(&self) -> EngineResult<Vec<StaffProfile>>;
}

/// Read access to attendance records.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Returns a staff member's records dated `from..=to`.
    async fn records_between(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}
