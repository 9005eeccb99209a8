//! Attendance aggregation.
//!
//! Reduces one staff member's attendance records for a calendar month into
//! the day and hour counters payroll works from.

use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::{AttendanceAggregate, AttendanceRecord, AttendanceStatus, AuditStep, PayMonth};
use crate::storage::AttendanceSource;

/// Reduces attendance records into monthly counters.
///
/// Records dated outside `pay_month` are ignored. `working_days` is the
/// number of calendar days in the month whatever the records say, and an
/// empty record set is valid.
///
/// # Example
///
/// ```
/// use edutack_payroll::calculation::aggregate_attendance;
/// use edutack_payroll::models::{AttendanceRecord, AttendanceStatus, PayMonth};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let march = PayMonth::new(3, 2025).unwrap();
/// let records = vec![AttendanceRecord {
///     staff_id: "stf_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     status: AttendanceStatus::Late,
///     working_hours: Decimal::new(75, 1),
/// }];
///
/// let aggregate = aggregate_attendance(&records, &march);
/// assert_eq!(aggregate.working_days, 31);
/// assert_eq!(aggregate.present_days, 1);
/// assert_eq!(aggregate.late_count, 1);
/// assert_eq!(aggregate.absent_days, 30);
/// ```
pub fn aggregate_attendance(records: &[AttendanceRecord], pay_month: &PayMonth) -> AttendanceAggregate {
    let mut aggregate = AttendanceAggregate {
        working_days: pay_month.days_in_month(),
        ..Default::default()
    };

    for record in records.iter().filter(|r| pay_month.contains_date(r.date)) {
        aggregate.total_working_hours += record.working_hours;

        match record.status {
            AttendanceStatus::Present => aggregate.present_days += 1,
            AttendanceStatus::Late => {
                aggregate.present_days += 1;
                aggregate.late_count += 1;
            }
            AttendanceStatus::Absent => aggregate.absent_count += 1,
            AttendanceStatus::OnLeave => aggregate.leave_count += 1,
            AttendanceStatus::HalfDay => aggregate.half_day_count += 1,
        }
    }

    aggregate.absent_days = aggregate.working_days.saturating_sub(aggregate.present_days);
    aggregate
}

/// Builds the audit step recording an attendance aggregation.
pub fn attendance_audit_step(
    aggregate: &AttendanceAggregate,
    pay_month: &PayMonth,
    record_count: usize,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "attendance_aggregate".to_string(),
        rule_name: "Attendance Aggregate".to_string(),
        input: serde_json::json!({
            "month": pay_month.month(),
            "year": pay_month.year(),
            "from": pay_month.first_day().to_string(),
            "to": pay_month.last_day().to_string(),
            "records": record_count
        }),
        output: serde_json::json!({
            "working_days": aggregate.working_days,
            "present_days": aggregate.present_days,
            "absent_days": aggregate.absent_days,
            "total_working_hours": aggregate.total_working_hours.to_string(),
            "late": aggregate.late_count,
            "on_leave": aggregate.leave_count,
            "absent": aggregate.absent_count,
            "half_day": aggregate.half_day_count,
            "perfect_attendance": aggregate.is_perfect_attendance()
        }),
        reasoning: format!(
            "{} present of {} calendar days in {}, {} hours recorded",
            aggregate.present_days,
            aggregate.working_days,
            pay_month.label(),
            aggregate.total_working_hours.normalize()
        ),
    }
}

/// Loads attendance for a staff member and month and aggregates it.
#[derive(Clone)]
pub struct AttendanceAggregator {
    source: Arc<dyn AttendanceSource>,
}

impl AttendanceAggregator {
    /// Creates an aggregator over the given attendance source.
    pub fn new(source: Arc<dyn AttendanceSource>) -> Self {
        Self { source }
    }

    /// Aggregates `staff_id`'s records from the first to the last day of
    /// `pay_month`, returning the record count alongside the counters.
    pub async fn aggregate(
        &self,
        staff_id: &str,
        pay_month: &PayMonth,
    ) -> EngineResult<(AttendanceAggregate, usize)> {
        let records = self
            .source
            .records_between(staff_id, pay_month.first_day(), pay_month.last_day())
            .await?;
        Ok((aggregate_attendance(&records, pay_month), records.len()))
    }
}
