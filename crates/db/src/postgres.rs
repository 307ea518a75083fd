//! PostgreSQL-backed ledger.
//!
//! Every sheet lives in the single `ledger_rows` table as JSONB documents
//! keyed by `(sheet, row_key)`; `position` preserves append order.

use async_trait::async_trait;
use estate_core::types::Row;
use serde_json::Value;
use sqlx::types::Json;

use crate::error::LedgerError;
use crate::ledger::{row_key, Ledger, Sheet};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgLedger {
    pool: DbPool,
}

impl PgLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_row(sheet: Sheet, value: Value) -> Result<Row, LedgerError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(LedgerError::Malformed {
            sheet,
            reason: format!("expected a JSON object, found {other}"),
        }),
    }
}

#[async_trait]
impl Ledger for PgLedger {
    async fn read_all(&self, sheet: Sheet) -> Result<Vec<Row>, LedgerError> {
        let rows: Vec<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM ledger_rows WHERE sheet = $1 ORDER BY position")
                .bind(sheet.name())
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .map(|(Json(data),)| into_row(sheet, data))
            .collect()
    }

    async fn read_by_key(&self, sheet: Sheet, key: &str) -> Result<Option<Row>, LedgerError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM ledger_rows WHERE sheet = $1 AND row_key = $2")
                .bind(sheet.name())
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(Json(data),)| into_row(sheet, data)).transpose()
    }

    async fn write_by_key(&self, sheet: Sheet, key: &str, row: Row) -> Result<(), LedgerError> {
        let result = sqlx::query(
            "UPDATE ledger_rows SET data = $3, updated_at = now() \
             WHERE sheet = $1 AND row_key = $2",
        )
        .bind(sheet.name())
        .bind(key)
        .bind(Json(Value::Object(row)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::RowNotFound {
                sheet,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    async fn append(&self, sheet: Sheet, row: Row) -> Result<(), LedgerError> {
        let key = row_key(&row).ok_or(LedgerError::MissingKey { sheet })?;
        let inserted =
            sqlx::query("INSERT INTO ledger_rows (sheet, row_key, data) VALUES ($1, $2, $3)")
                .bind(sheet.name())
                .bind(&key)
                .bind(Json(Value::Object(row)))
                .execute(&self.pool)
                .await;
        match inserted {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(LedgerError::DuplicateKey { sheet, key })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn non_object_documents_are_malformed() {
        assert_matches!(
            into_row(Sheet::Leads, json!([1, 2])),
            Err(LedgerError::Malformed { sheet: Sheet::Leads, .. })
        );
        assert!(into_row(Sheet::Leads, json!({ "id": "1" })).is_ok());
    }
}
