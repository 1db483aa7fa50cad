//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry and lifecycle errors to HTTP status codes and JSON error
//! bodies of the form `{"error":{code,message}}` — the payload the console
//! renders as a transient notification. Internal error details are never
//! exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use lmd_state::{ApplicationError, InspectionError, LicenseError};

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable message, suitable for the console notification.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request failed domain validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422). Normalized with `Validation`:
    /// the client sent syntactically valid HTTP but semantically invalid
    /// content.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure — missing/invalid token or bad credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — insufficient role (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current record state — rejected lifecycle transition (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Service dependency not configured or not ready (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Rejected application transitions surface as 409 Conflict.
impl From<ApplicationError> for AppError {
    fn from(err: ApplicationError) -> Self {
        Self::Conflict(err.to_string())
    }
}

/// Rejected license transitions surface as 409 Conflict.
impl From<LicenseError> for AppError {
    fn from(err: LicenseError) -> Self {
        Self::Conflict(err.to_string())
    }
}

/// Rejected inspection operations: a bad GPS fix is a validation failure
/// (the console shows the permission/accuracy notification); everything
/// else is a state conflict.
impl From<InspectionError> for AppError {
    fn from(err: InspectionError) -> Self {
        match &err {
            InspectionError::LocationRejected(_) => Self::Validation(err.to_string()),
            _ => Self::Conflict(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::BadRequest("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_code().0, expected);
        }
    }

    #[test]
    fn internal_message_is_not_leaked() {
        let response = AppError::Internal("database password is hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn lifecycle_errors_map_to_conflict() {
        let err: AppError = ApplicationError::TerminalState {
            state: "approved".into(),
        }
        .into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn rejected_location_maps_to_validation() {
        let err: AppError = InspectionError::LocationRejected("visit already completed".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
