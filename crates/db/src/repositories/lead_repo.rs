//! Repository for the `Leads` sheet.

use estate_core::types::{Row, Timestamp};
use serde_json::Value;

use crate::error::LedgerError;
use crate::ledger::{Ledger, Sheet};
use crate::models::lead::{
    Lead, COL_AGENT_ASSIGNED, COL_LOCKED_AT, COL_LOCKED_BY, COL_STATUS, STATUS_IN_PROGRESS,
};
use crate::models::timestamp_cell;

pub struct LeadRepo;

impl LeadRepo {
    /// All lead rows, newest (last appended) first.
    pub async fn list_newest_first(ledger: &dyn Ledger) -> Result<Vec<Row>, LedgerError> {
        let mut rows = ledger.read_all(Sheet::Leads).await?;
        rows.reverse();
        Ok(rows)
    }

    pub async fn find(ledger: &dyn Ledger, id: &str) -> Result<Option<Lead>, LedgerError> {
        ledger
            .read_by_key(Sheet::Leads, id)
            .await?
            .map(|row| Lead::from_row(&row))
            .transpose()
    }

    /// Write the lease columns for `agent_id` and move the lead to
    /// "In Progress". Callers must hold the lead's guard.
    pub async fn write_lease(
        ledger: &dyn Ledger,
        lead_id: &str,
        agent_id: &str,
        agent_name: &str,
        at: Timestamp,
    ) -> Result<(), LedgerError> {
        let mut row = ledger
            .read_by_key(Sheet::Leads, lead_id)
            .await?
            .ok_or_else(|| LedgerError::RowNotFound {
                sheet: Sheet::Leads,
                key: lead_id.to_string(),
            })?;
        row.insert(COL_LOCKED_BY.into(), Value::String(agent_id.to_string()));
        row.insert(COL_LOCKED_AT.into(), timestamp_cell(at));
        row.insert(COL_STATUS.into(), Value::String(STATUS_IN_PROGRESS.to_string()));
        row.insert(COL_AGENT_ASSIGNED.into(), Value::String(agent_name.to_string()));
        ledger.write_by_key(Sheet::Leads, lead_id, row).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::memory::MemoryLedger;

    fn leads() -> MemoryLedger {
        let rows = [
            json!({ "id": "L1", "name": "First", "status": "New", "locked_by": "", "locked_at": "" }),
            json!({ "id": "L2", "name": "Second", "status": "New", "locked_by": "", "locked_at": "" }),
        ];
        MemoryLedger::with_rows(
            Sheet::Leads,
            rows.iter().map(|r| r.as_object().cloned().unwrap()).collect(),
        )
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let rows = LeadRepo::list_newest_first(&leads()).await.unwrap();
        assert_eq!(rows[0]["id"], "L2");
        assert_eq!(rows[1]["id"], "L1");
    }

    #[tokio::test]
    async fn write_lease_sets_lock_columns() {
        let ledger = leads();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        LeadRepo::write_lease(&ledger, "L1", "u7", "Dana", at).await.unwrap();

        let lead = LeadRepo::find(&ledger, "L1").await.unwrap().unwrap();
        assert_eq!(lead.locked_by.as_deref(), Some("u7"));
        assert_eq!(lead.locked_at, Some(at));
        assert_eq!(lead.status, "In Progress");
        assert_eq!(lead.agent_assigned, "Dana");
        assert_eq!(lead.name, "First");
    }
}
