use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use atelier_core::error::CoreError;
use atelier_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent `{"error": ...}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atelier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document-store error from `atelier_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Build from an extractor rejection, keeping the size-limit status.
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::BadRequest(message)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::from_rejection(rejection.status(), rejection.body_text())
    }
}

/// `{"error": message}`.
fn error_body(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

/// `{"error": ..., "message": detail}` for a missing capability.
fn unavailable(capability: &str, detail: &str) -> (StatusCode, Value) {
    tracing::error!(capability, detail, "Capability unavailable");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": format!("{capability} unavailable"),
            "message": detail,
        }),
    )
}

/// `{"error": description, "type": kind}` for unexpected failures.
fn uncaught(kind: &str, description: &str) -> (StatusCode, Value) {
    tracing::error!(kind, error = description, "Unhandled error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": description, "type": kind }),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity } => {
                    (StatusCode::NOT_FOUND, error_body(format!("{entity} not found")))
                }
                CoreError::InvalidId { entity } => (
                    StatusCode::BAD_REQUEST,
                    error_body(format!("Invalid {} id", entity.to_lowercase())),
                ),
                CoreError::Validation(msg) | CoreError::Conflict(msg) => {
                    (StatusCode::BAD_REQUEST, error_body(msg.as_str()))
                }
                CoreError::ImageDecode(msg) => (
                    StatusCode::BAD_REQUEST,
                    error_body(format!("Invalid image: {msg}")),
                ),
                CoreError::Unavailable { capability, detail } => unavailable(capability, detail),
                CoreError::Internal(msg) => uncaught("InternalError", msg),
            },

            // --- Store errors ---
            AppError::Store(store) => match store {
                StoreError::Unavailable(detail) => unavailable("Database", detail),
                StoreError::DuplicateKey(msg) => (StatusCode::BAD_REQUEST, error_body(msg.as_str())),
                StoreError::Backend(msg) => {
                    tracing::error!(error = %msg, "Store error");
                    (StatusCode::INTERNAL_SERVER_ERROR, error_body(msg.as_str()))
                }
                StoreError::Mapping(msg) => uncaught("MappingError", msg),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg.as_str())),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, error_body(msg.as_str()))
            }
            AppError::InternalError(msg) => uncaught("InternalError", msg),
        };

        (status, axum::Json(body)).into_response()
    }
}
