use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::listing::submit::FieldError;
use crate::workflow::WorkflowError;

#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(u64),
    InvalidBody(String),
    Workflow(WorkflowError),
    InvalidDraft(Vec<FieldError>),
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        ApiError::Workflow(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("No editing session with id {id}"),
                }),
            ),
            ApiError::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "invalid_body",
                    "message": reason,
                }),
            ),
            ApiError::Workflow(e) => {
                let message = e.to_string();
                match e {
                    WorkflowError::Validation { missing } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        json!({
                            "error": "validation",
                            "message": message,
                            "missing": missing,
                        }),
                    ),
                    WorkflowError::InvalidState { state } => (
                        StatusCode::CONFLICT,
                        json!({
                            "error": "invalid_state",
                            "message": message,
                            "state": state,
                        }),
                    ),
                }
            }
            ApiError::InvalidDraft(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "invalid_draft",
                    "message": "The draft does not meet the listing requirements",
                    "fields": errors,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
