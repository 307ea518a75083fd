//! The row-store contract.

use std::fmt;

use async_trait::async_trait;
use estate_core::types::Row;
use serde_json::Value;

use crate::error::LedgerError;

/// Column every sheet is keyed by.
pub const KEY_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Users,
    Leads,
    Properties,
}

impl Sheet {
    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Leads => "Leads",
            Self::Properties => "Properties",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimal row store with last-write-wins semantics.
///
/// Each call is individually atomic; nothing spans calls. Callers that need
/// a read-check-write sequence must serialize it themselves.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// All rows of `sheet` in insertion order.
    async fn read_all(&self, sheet: Sheet) -> Result<Vec<Row>, LedgerError>;

    async fn read_by_key(&self, sheet: Sheet, key: &str) -> Result<Option<Row>, LedgerError>;

    /// Replace the row keyed `key`. Fails with [`LedgerError::RowNotFound`]
    /// when no such row exists.
    async fn write_by_key(&self, sheet: Sheet, key: &str, row: Row) -> Result<(), LedgerError>;

    /// Append a new row; its key is read from the `id` column.
    async fn append(&self, sheet: Sheet, row: Row) -> Result<(), LedgerError>;

    async fn health_check(&self) -> Result<(), LedgerError>;
}

/// The row's key as a string. Spreadsheet-sourced ids may be numbers.
pub fn row_key(row: &Row) -> Option<String> {
    match row.get(KEY_COLUMN)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
