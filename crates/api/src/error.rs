use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use estate_core::error::CoreError;
use estate_db::LedgerError;
use estate_storage::StorageError;

use crate::response::Envelope;

/// Application-level error type for action handlers.
///
/// Wraps the domain, ledger and object-store errors and renders every one
/// of them as a failure [`Envelope`] with a matching HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The request body could not be understood.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request did not finish within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::InvalidToken | CoreError::ExpiredToken => {
                    tracing::debug!(error = %core, "Rejected session token");
                    (StatusCode::UNAUTHORIZED, core.to_string())
                }
                CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, core.to_string()),
                CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, core.to_string()),
                CoreError::LeadAlreadyLocked { holder, since } => {
                    tracing::info!(holder = %holder, since = %since, "Lead lease refused");
                    (StatusCode::CONFLICT, core.to_string())
                }
                CoreError::LockContended { lead_id } => {
                    tracing::info!(lead_id = %lead_id, "Lead guard wait timed out");
                    (StatusCode::SERVICE_UNAVAILABLE, core.to_string())
                }
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, core.to_string()),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },

            // --- Ledger errors ---
            AppError::Ledger(err) => classify_ledger_error(err),

            // --- Object-store errors ---
            AppError::Storage(err) => {
                tracing::warn!(error = %err, "Object store operation failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Timeout => (StatusCode::REQUEST_TIMEOUT, self.to_string()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        (status, axum::Json(Envelope::err(message))).into_response()
    }
}

/// Classify a ledger error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_ledger_error(err: &LedgerError) -> (StatusCode, String) {
    match err {
        LedgerError::RowNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        LedgerError::DuplicateKey { .. } => (StatusCode::CONFLICT, err.to_string()),
        other => {
            tracing::error!(error = %other, "Ledger error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
    }
}
