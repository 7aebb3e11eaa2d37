//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use gemtalk_types::error::{ImageError, VisionError};
use gemtalk_types::llm::LlmError;

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// No session with this id (never created, or reset).
    SessionNotFound(Uuid),
    /// The uploaded file could not be decoded as an accepted image.
    Image(ImageError),
    /// The remote model call failed.
    Llm(LlmError),
    /// Upload exceeds the configured size.
    PayloadTooLarge(String),
    /// Malformed request (bad id, unreadable form).
    Validation(String),
}

impl From<VisionError> for AppError {
    fn from(e: VisionError) -> Self {
        match e {
            VisionError::Image(e) => AppError::Image(e),
            VisionError::Llm(e) => AppError::Llm(e),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {id} not found"),
            ),
            AppError::Image(e) => (StatusCode::BAD_REQUEST, "IMAGE_DECODE_ERROR", e.to_string()),
            AppError::Llm(e) => (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(%status, code, %message, "Request failed");
        } else {
            tracing::debug!(%status, code, %message, "Request rejected");
        }

        let body = ApiResponse::error(code, &message, Uuid::now_v7().to_string(), 0);
        (status, Json(body)).into_response()
    }
}
