//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for generating, listing,
//! downloading and emailing payslips.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BulkGenerateRequest, GenerateRequest, ListQuery, StaffListQuery, ValidGenerateRequest};
pub use response::{ApiError, ApiErrorResponse, SuggestedActions};
pub use state::AppState;
