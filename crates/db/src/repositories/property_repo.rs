//! Repository for the `Properties` sheet.

use estate_core::types::Row;

use crate::error::LedgerError;
use crate::ledger::{row_key, Ledger, Sheet};
use crate::models::property::into_listing;

pub struct PropertyRepo;

impl PropertyRepo {
    /// All properties with `images` decoded into arrays.
    pub async fn list(ledger: &dyn Ledger) -> Result<Vec<Row>, LedgerError> {
        Ok(ledger
            .read_all(Sheet::Properties)
            .await?
            .into_iter()
            .map(into_listing)
            .collect())
    }

    /// Raw stored row, as the merge input.
    pub async fn find(ledger: &dyn Ledger, id: &str) -> Result<Option<Row>, LedgerError> {
        ledger.read_by_key(Sheet::Properties, id).await
    }

    /// Persist a merged row: update in place when `exists`, append otherwise.
    pub async fn save(ledger: &dyn Ledger, row: Row, exists: bool) -> Result<(), LedgerError> {
        let key = row_key(&row).ok_or(LedgerError::MissingKey {
            sheet: Sheet::Properties,
        })?;
        if exists {
            ledger.write_by_key(Sheet::Properties, &key, row).await
        } else {
            ledger.append(Sheet::Properties, row).await
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::memory::MemoryLedger;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn save_appends_then_updates() {
        let ledger = MemoryLedger::new();
        PropertyRepo::save(&ledger, row(json!({ "id": "p1", "title": "A" })), false)
            .await
            .unwrap();
        PropertyRepo::save(&ledger, row(json!({ "id": "p1", "title": "B" })), true)
            .await
            .unwrap();

        let all = PropertyRepo::list(&ledger).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["title"], "B");
        assert_eq!(all[0]["images"], json!([]));
    }
}
