//! In-process ledger.

use std::collections::HashMap;

use async_trait::async_trait;
use estate_core::types::Row;
use tokio::sync::RwLock;

use crate::error::LedgerError;
use crate::ledger::{row_key, Ledger, Sheet};

/// Ledger held in memory, one ordered row list per sheet.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    sheets: RwLock<HashMap<Sheet, Vec<Row>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger pre-populated with `rows` in `sheet`.
    pub fn with_rows(sheet: Sheet, rows: Vec<Row>) -> Self {
        Self {
            sheets: RwLock::new(HashMap::from([(sheet, rows)])),
        }
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn read_all(&self, sheet: Sheet) -> Result<Vec<Row>, LedgerError> {
        Ok(self
            .sheets
            .read()
            .await
            .get(&sheet)
            .cloned()
            .unwrap_or_default())
    }

    async fn read_by_key(&self, sheet: Sheet, key: &str) -> Result<Option<Row>, LedgerError> {
        let sheets = self.sheets.read().await;
        Ok(sheets.get(&sheet).and_then(|rows| {
            rows.iter()
                .find(|row| row_key(row).as_deref() == Some(key))
                .cloned()
        }))
    }

    async fn write_by_key(&self, sheet: Sheet, key: &str, row: Row) -> Result<(), LedgerError> {
        let mut sheets = self.sheets.write().await;
        let slot = sheets
            .get_mut(&sheet)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|existing| row_key(existing).as_deref() == Some(key))
            })
            .ok_or_else(|| LedgerError::RowNotFound {
                sheet,
                key: key.to_string(),
            })?;
        *slot = row;
        Ok(())
    }

    async fn append(&self, sheet: Sheet, row: Row) -> Result<(), LedgerError> {
        let key = row_key(&row).ok_or(LedgerError::MissingKey { sheet })?;
        let mut sheets = self.sheets.write().await;
        let rows = sheets.entry(sheet).or_default();
        if rows
            .iter()
            .any(|existing| row_key(existing).as_deref() == Some(key.as_str()))
        {
            return Err(LedgerError::DuplicateKey { sheet, key });
        }
        rows.push(row);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}
