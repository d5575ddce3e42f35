//! Shared response types and error conversion for API handlers.
//!
//! Every failed request gets a JSON body of the form `{"error": "<message>"}`
//! with a status derived from the `ServiceError` variant. Server-side faults
//! are logged and replaced by a generic message.

use crate::errors::ServiceError;
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body for endpoints that only acknowledge an action
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Builds an error response with the given status and message
pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Converts ServiceError to the matching HTTP status and error body
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    match error {
        ServiceError::Validation { message } => error_response(StatusCode::BAD_REQUEST, message),
        ServiceError::Unauthorized { message } => {
            error_response(StatusCode::UNAUTHORIZED, message)
        }
        ServiceError::NotFound { entity, identifier } => {
            tracing::debug!("{} not found: {}", entity, identifier);
            error_response(StatusCode::NOT_FOUND, format!("{} not found", entity))
        }
        ServiceError::AlreadyExists { message } => error_response(StatusCode::CONFLICT, message),
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Unwraps a JSON body, mapping any rejection to a 400 with the given message.
///
/// Handlers take `Result<Json<T>, JsonRejection>` so that malformed bodies and
/// unknown fields produce the standard error shape instead of axum's default.
pub fn extract_json<T>(
    result: Result<Json<T>, JsonRejection>,
    message: Option<&str>,
) -> Result<T, ApiError> {
    result.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        let message = match message {
            Some(message) => message.to_string(),
            None => rejection.body_text(),
        };
        error_response(StatusCode::BAD_REQUEST, message)
    })
}
