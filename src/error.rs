use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::storage::StorageFault;

pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

#[derive(Debug)]
pub enum AppError {
    /// A required field is missing. Raised before any side effect.
    Validation(String),
    Storage(StorageFault),
    /// Building the record failed; reported like an unknown storage fault.
    Construction(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {msg}"),
            AppError::Storage(fault) => write!(f, "Storage Error: {fault}"),
            AppError::Construction(msg) => write!(f, "Construction Error: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::Storage(fault) => {
                tracing::error!("Error saving form to storage: {fault}");
                let (status, message) = classify(fault);
                (
                    status,
                    json!({
                        "success": false,
                        "error": message,
                        "code": fault.code().unwrap_or(UNKNOWN_ERROR_CODE),
                    }),
                )
            }
            AppError::Construction(msg) => {
                tracing::error!("Error building submission: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": STORAGE_FAILED,
                        "code": UNKNOWN_ERROR_CODE,
                    }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageFault> for AppError {
    fn from(fault: StorageFault) -> Self {
        AppError::Storage(fault)
    }
}

const STORAGE_FAILED: &str = "failed to save form data to storage";

/// HTTP status and client-facing message for a storage fault.
pub fn classify(fault: &StorageFault) -> (StatusCode, &'static str) {
    match fault {
        StorageFault::BucketNotFound => (
            StatusCode::NOT_FOUND,
            "storage bucket not found; it must be created first",
        ),
        StorageFault::AccessDenied => (
            StatusCode::FORBIDDEN,
            "access denied to storage; check credentials and permissions",
        ),
        StorageFault::InvalidAccessKey => {
            (StatusCode::UNAUTHORIZED, "invalid access key credential")
        }
        StorageFault::SignatureMismatch => (StatusCode::UNAUTHORIZED, "invalid secret credential"),
        StorageFault::Other { .. } => (StatusCode::INTERNAL_SERVER_ERROR, STORAGE_FAILED),
    }
}
