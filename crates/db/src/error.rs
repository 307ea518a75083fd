use crate::ledger::Sheet;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{sheet} row not found: {key}")]
    RowNotFound { sheet: Sheet, key: String },

    #[error("{sheet} row already exists: {key}")]
    DuplicateKey { sheet: Sheet, key: String },

    #[error("{sheet} row has no id")]
    MissingKey { sheet: Sheet },

    #[error("Malformed {sheet} row: {reason}")]
    Malformed { sheet: Sheet, reason: String },
}
