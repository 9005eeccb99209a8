//! In-memory storage backends.
//!
//! The payslip store keeps a key index beside the records and performs the
//! duplicate check and the insert under one write lock, which gives the same
//! guarantee as a unique index.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Payslip, PayslipFilter, PayslipKey, StaffProfile};

use super::traits::{AttendanceSource, PayslipStore, StaffDirectory};

#[derive(Default)]
struct PayslipTable {
    rows: HashMap<Uuid, Payslip>,
    by_key: HashMap<PayslipKey, Uuid>,
}

/// Payslip store held in memory.
#[derive(Default)]
pub struct MemoryPayslipStore {
    table: RwLock<PayslipTable>,
}

impl MemoryPayslipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored payslips.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns true if no payslip is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PayslipStore for MemoryPayslipStore {
    async fn insert(&self, payslip: Payslip) -> EngineResult<Payslip> {
        let mut table = self.table.write().await;
        let key = payslip.key();

        if let Some(existing) = table.by_key.get(&key).and_then(|id| table.rows.get(id)) {
            return Err(EngineError::DuplicatePayslip {
                existing: Box::new(existing.summary()),
            });
        }

        table.by_key.insert(key, payslip.id);
        table.rows.insert(payslip.id, payslip.clone());
        Ok(payslip)
    }

    async fn get(&self, id: Uuid) -> EngineResult<Option<Payslip>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_for_period(&self, key: &PayslipKey) -> EngineResult<Option<Payslip>> {
        let table = self.table.read().await;
        Ok(table.by_key.get(key).and_then(|id| table.rows.get(id)).cloned())
    }

    async fn delete(&self, id: Uuid) -> EngineResult<Option<Payslip>> {
        let mut table = self.table.write().await;
        let removed = table.rows.remove(&id);
        if let Some(payslip) = &removed {
            table.by_key.remove(&payslip.key());
        }
        Ok(removed)
    }

    async fn mark_sent(&self, id: Uuid, at: DateTime<Utc>) -> EngineResult<Option<Payslip>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|payslip| {
            payslip.mark_sent(at);
            payslip.clone()
        }))
    }

    async fn update_pdf_path(&self, id: Uuid, pdf_path: &str) -> EngineResult<Option<Payslip>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|payslip| {
            payslip.pdf_path = pdf_path.to_string();
            payslip.clone()
        }))
    }

    async fn list(&self, filter: &PayslipFilter) -> EngineResult<Vec<Payslip>> {
        let table = self.table.read().await;
        let mut payslips: Vec<Payslip> = table
            .rows
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        payslips.sort_by_key(|p| (Reverse(p.year), Reverse(p.month), Reverse(p.generated_at)));
        Ok(payslips)
    }
}

/// Staff directory held in memory, in insertion order.
#[derive(Default)]
pub struct MemoryStaffDirectory {
    staff: RwLock<Vec<StaffProfile>>,
}

impl MemoryStaffDirectory {
    /// Creates a directory with the given staff.
    pub fn new(staff: Vec<StaffProfile>) -> Self {
        Self {
            staff: RwLock::new(staff),
        }
    }

    /// Adds or replaces a staff member.
    pub async fn upsert(&self, profile: StaffProfile) {
        let mut staff = self.staff.write().await;
        match staff.iter_mut().find(|s| s.id == profile.id) {
            Some(existing) => *existing = profile,
            None => staff.push(profile),
        }
    }
}

#[async_trait]
impl StaffDirectory for MemoryStaffDirectory {
    async fn get_staff(&self, staff_id: &str) -> EngineResult<Option<StaffProfile>> {
        Ok(self
            .staff
            .read()
            .await
            .iter()
            .find(|s| s.id == staff_id)
            .cloned())
    }

    async fn approved_staff(&self) -> EngineResult<Vec<StaffProfile>> {
        Ok(self
            .staff
            .read()
            .await
            .iter()
            .filter(|s| s.approved)
            .cloned()
            .collect())
    }
}

/// Attendance records held in memory.
#[derive(Default)]
pub struct MemoryAttendanceSource {
    records: RwLock<Vec<AttendanceRecord>>,
}

impl MemoryAttendanceSource {
    /// Creates a source with the given records.
    pub fn new(records: Vec<AttendanceRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Appends records.
    pub async fn extend(&self, records: impl IntoIterator<Item = AttendanceRecord>) {
        self.records.write().await.extend(records);
    }
}

#[async_trait]
impl AttendanceSource for MemoryAttendanceSource {
    async fn records_between(
        &self,
        staff_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.staff_id == staff_id && r.date >= from && r.date <= to)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::sample_payslip;
    use crate::models::{AttendanceStatus, PayslipStatus, SalaryType, StaffSalaryProfile};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn staff(id: &str, approved: bool) -> StaffProfile {
        StaffProfile {
            id: id.to_string(),
            name: format!("Staff {}", id),
            employee_id: format!("EMP_{}", id),
            department: "Mathematics".to_string(),
            email: format!("{}@example.edu", id),
            approved,
            salary: StaffSalaryProfile::fixed(Decimal::new(20000, 0)),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_key() {
        let store = MemoryPayslipStore::new();
        let first = store.insert(sample_payslip("stf_001", 3, 2025)).await.unwrap();

        let result = store.insert(sample_payslip("stf_001", 3, 2025)).await;
        match result {
            Err(EngineError::DuplicatePayslip { existing }) => assert_eq!(existing.id, first.id),
            other => panic!("Expected DuplicatePayslip, got {:?}", other),
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_for_same_key_admit_one() {
        let store = Arc::new(MemoryPayslipStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(sample_payslip("stf_001", 3, 2025)).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(EngineError::DuplicatePayslip { .. }) => conflicts += 1,
                Err(other) => panic!("Unexpected error: {:?}", other),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_delete_frees_the_key() {
        let store = MemoryPayslipStore::new();
        let first = store.insert(sample_payslip("stf_001", 3, 2025)).await.unwrap();

        let removed = store.delete(first.id).await.unwrap();
        assert_eq!(removed.map(|p| p.id), Some(first.id));
        assert!(store.is_empty().await);

        let key = PayslipKey::new("stf_001", 3, 2025);
        assert!(store.find_for_period(&key).await.unwrap().is_none());
        assert!(store.insert(sample_payslip("stf_001", 3, 2025)).await.is_ok());
    }

    #[tokio::test]
    async fn test_same_staff_different_month_is_allowed() {
        let store = MemoryPayslipStore::new();
        store.insert(sample_payslip("stf_001", 3, 2025)).await.unwrap();
        store.insert(sample_payslip("stf_001", 4, 2025)).await.unwrap();
        store.insert(sample_payslip("stf_002", 3, 2025)).await.unwrap();
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_mark_sent_and_update_pdf_path() {
        let store = MemoryPayslipStore::new();
        let payslip = store.insert(sample_payslip("stf_001", 3, 2025)).await.unwrap();

        let sent = store.mark_sent(payslip.id, Utc::now()).await.unwrap().unwrap();
        assert_eq!(sent.status, PayslipStatus::Sent);
        assert!(sent.email_sent);

        let moved = store
            .update_pdf_path(payslip.id, "payslips/new.pdf")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.pdf_path, "payslips/new.pdf");

        assert!(store.mark_sent(Uuid::new_v4(), Utc::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts_newest_first() {
        let store = MemoryPayslipStore::new();
        store.insert(sample_payslip("stf_001", 1, 2025)).await.unwrap();
        store.insert(sample_payslip("stf_001", 3, 2025)).await.unwrap();
        store.insert(sample_payslip("stf_001", 12, 2024)).await.unwrap();
        let mut other = sample_payslip("stf_002", 3, 2025);
        other.department = "Physics".to_string();
        store.insert(other).await.unwrap();

        let all = store.list(&PayslipFilter::default()).await.unwrap();
        let periods: Vec<(i32, u32)> = all.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(periods[0], (2025, 3));
        assert_eq!(periods[periods.len() - 1], (2024, 12));

        let physics = store
            .list(&PayslipFilter {
                department: Some("Physics".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(physics.len(), 1);
        assert_eq!(physics[0].staff_id, "stf_002");

        let staff_2025 = store
            .list(&PayslipFilter {
                staff_id: Some("stf_001".to_string()),
                year: Some(2025),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(staff_2025.len(), 2);
    }

    #[tokio::test]
    async fn test_approved_staff_keeps_insertion_order() {
        let directory = MemoryStaffDirectory::new(vec![
            staff("stf_003", true),
            staff("stf_001", false),
            staff("stf_002", true),
        ]);

        let approved: Vec<String> = directory
            .approved_staff()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(approved, vec!["stf_003", "stf_002"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_staff() {
        let directory = MemoryStaffDirectory::default();
        directory.upsert(staff("stf_001", false)).await;

        let mut updated = staff("stf_001", true);
        updated.salary.salary_type = SalaryType::AttendanceBased;
        directory.upsert(updated).await;

        let found = directory.get_staff("stf_001").await.unwrap().unwrap();
        assert!(found.approved);
        assert_eq!(found.salary.salary_type, SalaryType::AttendanceBased);
        assert!(directory.get_staff("stf_404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_between_is_inclusive() {
        let record = |day: u32| AttendanceRecord {
            staff_id: "stf_001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            status: AttendanceStatus::Present,
            working_hours: Decimal::new(8, 0),
        };
        let source = MemoryAttendanceSource::default();
        source.extend(vec![record(1), record(15), record(31)]).await;

        let found = source
            .records_between(
                "stf_001",
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }
}
