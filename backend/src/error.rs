//! Error handling for the Store Fulfillment server
//!
//! Every error is returned to the view as a JSON `{ error: { code, message } }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::WorkflowError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Workflow errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(#[from] WorkflowError),

    // Service errors
    #[error("Fulfillment workflow is not running")]
    WorkflowUnavailable,

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidStateTransition(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_STATE_TRANSITION")
            }
            AppError::WorkflowUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "WORKFLOW_UNAVAILABLE"),
            AppError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::InvalidStateTransition(err) => err.to_string(),
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_error_maps_to_422() {
        let err = AppError::from(WorkflowError::PopupPending);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let response = AppError::WorkflowUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
