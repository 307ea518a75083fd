use crate::types::Timestamp;

/// Domain-level failures shared by every layer of the admin API.
///
/// Storage and ledger failures have their own error types in the `storage`
/// and `db` crates; the API layer folds all of them into one envelope.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Token is malformed, tampered with, or signed with another secret.
    #[error("Unauthorized: Invalid token")]
    InvalidToken,

    /// Token is well-signed but past its expiry.
    #[error("Unauthorized: Token expired")]
    ExpiredToken,

    /// No credentials, or credentials that do not match an active user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not allow the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Lead is locked by another agent")]
    LeadAlreadyLocked { holder: String, since: Timestamp },

    #[error("Lead {lead_id} is busy, retry the request")]
    LockContended { lead_id: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
