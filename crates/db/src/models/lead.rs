//! `Leads` sheet rows.

use estate_core::lease::LockState;
use estate_core::types::{Row, Timestamp};

use super::{cell_opt_text, cell_text, cell_timestamp};
use crate::error::LedgerError;
use crate::ledger::Sheet;

pub const COL_LOCKED_BY: &str = "locked_by";
pub const COL_LOCKED_AT: &str = "locked_at";
pub const COL_STATUS: &str = "status";
pub const COL_AGENT_ASSIGNED: &str = "agent_assigned";

pub const STATUS_NEW: &str = "New";
pub const STATUS_IN_PROGRESS: &str = "In Progress";

/// A sales lead. Created by the public inquiry form, never deleted here.
#[derive(Debug, Clone)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
    pub status: String,
    pub locked_by: Option<String>,
    pub locked_at: Option<Timestamp>,
    pub agent_assigned: String,
}

impl Lead {
    pub fn from_row(row: &Row) -> Result<Self, LedgerError> {
        let id = cell_opt_text(row, "id").ok_or(LedgerError::MissingKey { sheet: Sheet::Leads })?;
        Ok(Self {
            id,
            name: cell_text(row, "name"),
            email: cell_text(row, "email"),
            phone: cell_text(row, "phone"),
            created_at: cell_text(row, "created_at"),
            status: cell_opt_text(row, COL_STATUS).unwrap_or_else(|| STATUS_NEW.to_string()),
            locked_by: cell_opt_text(row, COL_LOCKED_BY),
            locked_at: cell_timestamp(row, COL_LOCKED_AT),
            agent_assigned: cell_text(row, COL_AGENT_ASSIGNED),
        })
    }

    pub fn lock_state(&self) -> LockState {
        LockState {
            locked_by: self.locked_by.clone(),
            locked_at: self.locked_at,
        }
    }
}
