//! Request types for the payroll API.
//!
//! Body fields are optional at the serde level so that a missing field is
//! reported with a field-specific message instead of a generic parse error.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PayslipFilter;

fn required<T>(value: Option<T>, field: &str) -> EngineResult<T> {
    value.ok_or_else(|| EngineError::validation(field, format!("{} is required", field)))
}

fn required_text(value: Option<String>, field: &str) -> EngineResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(EngineError::validation(field, format!("{} is required", field))),
    }
}

/// Request body for `/payslips/generate` and `/payslips/regenerate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// The staff member.
    pub staff_id: Option<String>,
    /// The month (1-12).
    pub month: Option<u32>,
    /// The year.
    pub year: Option<i32>,
    /// Who is generating the payslip.
    pub generated_by: Option<String>,
}

/// A [`GenerateRequest`] with every field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidGenerateRequest {
    /// The staff member.
    pub staff_id: String,
    /// The month.
    pub month: u32,
    /// The year.
    pub year: i32,
    /// Who is generating the payslip.
    pub generated_by: String,
}

impl GenerateRequest {
    /// Checks that all required fields are present.
    pub fn validate(self) -> EngineResult<ValidGenerateRequest> {
        Ok(ValidGenerateRequest {
            staff_id: required_text(self.staff_id, "staffId")?,
            month: required(self.month, "month")?,
            year: required(self.year, "year")?,
            generated_by: required_text(self.generated_by, "generatedBy")?,
        })
    }
}

/// Request body for `/payslips/generate-all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkGenerateRequest {
    /// The month (1-12).
    pub month: Option<u32>,
    /// The year.
    pub year: Option<i32>,
    /// Who is generating the payslips.
    pub generated_by: Option<String>,
}

impl BulkGenerateRequest {
    /// Checks that all required fields are present, returning `(month, year, generated_by)`.
    pub fn validate(self) -> EngineResult<(u32, i32, String)> {
        Ok((
            required(self.month, "month")?,
            required(self.year, "year")?,
            required_text(self.generated_by, "generatedBy")?,
        ))
    }
}

/// Parses an optional numeric query parameter.
///
/// Absent and blank values both mean "no filter".
fn parse_param<T: std::str::FromStr>(value: Option<&str>, field: &str) -> EngineResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| EngineError::validation(field, format!("{} must be a number, got '{}'", field, raw))),
    }
}

/// Query string for `/payslips/all`.
///
/// Values arrive as text so that blank filters from forms are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Only this month.
    pub month: Option<String>,
    /// Only this year.
    pub year: Option<String>,
    /// Only this department.
    pub department: Option<String>,
}

impl ListQuery {
    /// Converts the query into a store filter.
    pub fn into_filter(self) -> EngineResult<PayslipFilter> {
        Ok(PayslipFilter {
            staff_id: None,
            month: parse_param(self.month.as_deref(), "month")?,
            year: parse_param(self.year.as_deref(), "year")?,
            department: self.department.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// Query string for `/payslips/staff/:staffId`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffListQuery {
    /// Only this year.
    pub year: Option<String>,
}

impl StaffListQuery {
    /// The year filter, if one was given.
    pub fn year(&self) -> EngineResult<Option<i32>> {
        parse_param(self.year.as_deref(), "year")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_generate_request() {
        let json = r#"{
            "staffId": "stf_001",
            "month": 3,
            "year": 2025,
            "generatedBy": "admin_001"
        }"#;

        let request: GenerateRequest = serde_json::from_str(json).unwrap();
        let valid = request.validate().unwrap();
        assert_eq!(valid.staff_id, "stf_001");
        assert_eq!(valid.month, 3);
        assert_eq!(valid.year, 2025);
        assert_eq!(valid.generated_by, "admin_001");
    }

    #[test]
    fn test_missing_fields_name_the_field() {
        let request: GenerateRequest = serde_json::from_str(r#"{"staffId": "stf_001", "year": 2025}"#).unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid field 'month': month is required");

        let request: GenerateRequest =
            serde_json::from_str(r#"{"staffId": "", "month": 3, "year": 2025, "generatedBy": "a"}"#).unwrap();
        assert!(matches!(
            request.validate().unwrap_err(),
            EngineError::Validation { ref field, .. } if field == "staffId"
        ));
    }

    #[test]
    fn test_bulk_request_requires_generated_by() {
        let request: BulkGenerateRequest = serde_json::from_str(r#"{"month": 3, "year": 2025}"#).unwrap();
        assert!(matches!(
            request.validate().unwrap_err(),
            EngineError::Validation { ref field, .. } if field == "generatedBy"
        ));
    }

    #[test]
    fn test_list_query_into_filter() {
        let filter = ListQuery {
            month: Some("3".to_string()),
            year: None,
            department: Some(String::new()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.month, Some(3));
        assert!(filter.year.is_none());
        assert!(filter.department.is_none());
        assert!(filter.staff_id.is_none());
    }

    #[test]
    fn test_blank_query_params_mean_no_filter() {
        let query: ListQuery = serde_json::from_str(r#"{"month": "", "year": "2025", "department": ""}"#).unwrap();
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.month, None);
        assert_eq!(filter.year, Some(2025));

        let staff = StaffListQuery { year: Some(" ".to_string()) };
        assert_eq!(staff.year().unwrap(), None);
    }

    #[test]
    fn test_non_numeric_query_params_are_rejected() {
        let query = ListQuery {
            month: Some("abc".to_string()),
            ..Default::default()
        };
        let err = query.into_filter().unwrap_err();
        assert_eq!(err.to_string(), "Invalid field 'month': month must be a number, got 'abc'");

        let staff = StaffListQuery {
            year: Some("twenty".to_string()),
        };
        assert!(matches!(
            staff.year().unwrap_err(),
            EngineError::Validation { ref field, .. } if field == "year"
        ));
    }
}
