//! # Application Error
//!
//! Maps flow and ledger errors to structured HTTP responses with
//! proper status codes and error bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use firstmark_flow::{UploadError, VerifyError};
use firstmark_ledger::LedgerError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// The content is already registered — first writer wins.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A backend (storage or ledger) could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::AlreadyRegistered { digest } => {
                AppError::Conflict(format!("content already registered under digest {digest}"))
            }
            UploadError::StorageUnavailable(msg) => AppError::Unavailable(msg),
            UploadError::SigningRejected(msg) | UploadError::SignatureMismatch(msg) => {
                AppError::Validation(msg)
            }
            UploadError::Read(io) => AppError::Internal(io.to_string()),
            UploadError::Ledger(ledger) => ledger.into(),
        }
    }
}

impl From<VerifyError> for AppError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Read(io) => AppError::Internal(io.to_string()),
            VerifyError::Ledger(ledger) => ledger.into(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::DuplicateDigest { digest } => {
                AppError::Conflict(format!("content already registered under digest {digest}"))
            }
            LedgerError::Unavailable(msg) => AppError::Unavailable(msg),
            LedgerError::ZeroIdentity => AppError::Validation(e.to_string()),
            LedgerError::CommitFailed(_) | LedgerError::InvalidResponse(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}
