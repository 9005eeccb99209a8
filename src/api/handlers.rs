//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;

use super::request::{BulkGenerateRequest, GenerateRequest, ListQuery, StaffListQuery};
use super::response::{
    ApiError, ApiErrorResponse, BulkResponse, GeneratedResponse, PayslipListResponse, RegeneratedResponse,
    ResentResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payslips/generate", post(generate_handler))
        .route("/payslips/regenerate", post(regenerate_handler))
        .route("/payslips/generate-all", post(generate_all_handler))
        .route("/payslips/all", get(list_handler))
        .route("/payslips/staff/:staff_id", get(staff_list_handler))
        .route("/payslips/:payslip_id", get(get_handler))
        .route("/payslips/:payslip_id/download", get(download_handler))
        .route("/payslips/:payslip_id/resend-email", post(resend_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Maps a body rejection to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Maps a query string rejection to a 400 response.
fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %body_text, "Query string error");
    json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(body_text))
}

fn parse_payslip_id(raw: &str) -> Result<Uuid, EngineError> {
    Uuid::parse_str(raw).map_err(|_| EngineError::validation("payslipId", format!("'{}' is not a valid payslip id", raw)))
}

/// Handler for POST /payslips/generate.
async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip generation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let request = match request.validate() {
        Ok(req) => req,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match state
        .workflow()
        .generate(&request.staff_id, request.month, request.year, &request.generated_by)
        .await
    {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                payslip_id = %outcome.payslip.id,
                email_sent = outcome.payslip.email_sent,
                duration_us = start_time.elapsed().as_micros(),
                "Payslip generation completed"
            );
            let message = if outcome.email.success {
                "Payslip generated and emailed successfully"
            } else {
                "Payslip generated successfully, but the email could not be sent"
            };
            json_response(
                StatusCode::CREATED,
                GeneratedResponse {
                    message: message.to_string(),
                    outcome,
                },
            )
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payslips/regenerate.
async fn regenerate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip regeneration request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let request = match request.validate() {
        Ok(req) => req,
        Err(err) => return error_response(correlation_id, err),
    };

    match state
        .workflow()
        .regenerate(&request.staff_id, request.month, request.year, &request.generated_by)
        .await
    {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                payslip_id = %outcome.generated.payslip.id,
                previous_id = %outcome.previous.id,
                "Payslip regeneration completed"
            );
            json_response(
                StatusCode::CREATED,
                RegeneratedResponse {
                    message: "Payslip regenerated successfully".to_string(),
                    outcome,
                },
            )
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payslips/generate-all.
async fn generate_all_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkGenerateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing bulk payslip generation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let (month, year, generated_by) = match request.validate() {
        Ok(fields) => fields,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match state.workflow().generate_all(month, year, &generated_by).await {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                successful = report.successful,
                errors = report.errors,
                duration_ms = start_time.elapsed().as_millis(),
                "Bulk payslip generation completed"
            );
            json_response(
                StatusCode::OK,
                BulkResponse {
                    message: format!(
                        "Generated {} of {} payslips ({} already existed, {} failed)",
                        report.successful, report.total_staff, report.already_exists, report.errors
                    ),
                    report,
                },
            )
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payslips/all.
async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let filter = match query {
        Ok(Query(query)) => query.into_filter(),
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    let result = match filter {
        Ok(filter) => state.workflow().list(&filter).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(payslips) => json_response(StatusCode::OK, PayslipListResponse::from(payslips)),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payslips/staff/:staff_id.
async fn staff_list_handler(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    query: Result<Query<StaffListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let year = match query {
        Ok(Query(query)) => query.year(),
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    let result = match year {
        Ok(year) => state.workflow().list_for_staff(&staff_id, year).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(payslips) => json_response(StatusCode::OK, PayslipListResponse::from(payslips)),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payslips/:payslip_id.
async fn get_handler(State(state): State<AppState>, Path(payslip_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = match parse_payslip_id(&payslip_id) {
        Ok(id) => state.workflow().get(id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(payslip) => json_response(StatusCode::OK, payslip),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payslips/:payslip_id/download.
///
/// Streams the PDF as an attachment.
async fn download_handler(State(state): State<AppState>, Path(payslip_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = match parse_payslip_id(&payslip_id) {
        Ok(id) => state.workflow().download(id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(document) => {
            info!(
                correlation_id = %correlation_id,
                payslip_id = %payslip_id,
                bytes = document.bytes.len(),
                "Payslip download"
            );
            let disposition = format!("attachment; filename=\"{}\"", document.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                document.bytes,
            )
                .into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payslips/:payslip_id/resend-email.
async fn resend_handler(State(state): State<AppState>, Path(payslip_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, payslip_id = %payslip_id, "Processing payslip email resend");

    let result = match parse_payslip_id(&payslip_id) {
        Ok(id) => state.workflow().resend_email(id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(outcome) => json_response(
            StatusCode::OK,
            ResentResponse {
                message: "Payslip email sent successfully".to_string(),
                outcome,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payslip_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_payslip_id(&id.to_string()).unwrap(), id);

        let err = parse_payslip_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "payslipId"));
    }
}
