//! `Users` sheet rows.

use estate_core::types::{EpochMillis, Row};
use serde::Serialize;

use super::{cell_bool, cell_i64, cell_opt_text, cell_text};
use crate::error::LedgerError;
use crate::ledger::Sheet;

pub const COL_TOKEN: &str = "token";
pub const COL_TOKEN_EXPIRY: &str = "token_expiry";

/// A provisioned user. Rows are created outside this service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Last issued session token; informational only.
    pub token: Option<String>,
    pub token_expiry: Option<EpochMillis>,
}

impl User {
    pub fn from_row(row: &Row) -> Result<Self, LedgerError> {
        let id = cell_opt_text(row, "id").ok_or(LedgerError::MissingKey { sheet: Sheet::Users })?;
        Ok(Self {
            id,
            name: cell_text(row, "name"),
            email: cell_text(row, "email"),
            role: cell_text(row, "role"),
            active: cell_bool(row, "active"),
            password_hash: cell_text(row, "password_hash"),
            token: cell_opt_text(row, COL_TOKEN),
            token_expiry: cell_i64(row, COL_TOKEN_EXPIRY),
        })
    }

    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// Public projection of [`User`] without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_sheet_row() {
        let row = json!({
            "id": 3,
            "name": "Sam",
            "email": "sam@example.com",
            "role": "admin",
            "active": "TRUE",
            "password_hash": "$argon2id$...",
            "token": "",
            "token_expiry": "",
        });
        let user = User::from_row(row.as_object().unwrap()).unwrap();
        assert_eq!(user.id, "3");
        assert!(user.active);
        assert_eq!(user.token, None);
        assert_eq!(user.token_expiry, None);
    }

    #[test]
    fn info_omits_credentials() {
        let row = json!({ "id": "u1", "name": "A", "email": "a@x", "role": "agent", "password_hash": "h" });
        let info = serde_json::to_value(User::from_row(row.as_object().unwrap()).unwrap().info()).unwrap();
        assert!(info.get("password_hash").is_none());
        assert_eq!(info["email"], "a@x");
    }
}
