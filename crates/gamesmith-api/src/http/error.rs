//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gamesmith_types::error::SubmitRejected;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// A submission or regeneration was not accepted.
    Rejected(SubmitRejected),
    /// No game has been generated yet.
    NoArtifact,
}

impl From<SubmitRejected> for AppError {
    fn from(e: SubmitRejected) -> Self {
        AppError::Rejected(e)
    }
}

impl AppError {
    /// Status, machine-readable code, and message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Rejected(e @ SubmitRejected::EmptyInput) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Rejected(e @ SubmitRejected::Busy) => {
                (StatusCode::CONFLICT, "BUSY", e.to_string())
            }
            AppError::Rejected(e @ SubmitRejected::NoPromptToRegenerate) => {
                (StatusCode::NOT_FOUND, "NO_PROMPT", e.to_string())
            }
            AppError::NoArtifact => (
                StatusCode::NOT_FOUND,
                "NO_ARTIFACT",
                "no game has been generated yet".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let request_id = uuid::Uuid::now_v7().to_string();
        tracing::debug!(code, %message, "request rejected");
        (status, Json(ApiResponse::error(code, &message, request_id))).into_response()
    }
}
