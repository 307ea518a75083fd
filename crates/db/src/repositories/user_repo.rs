//! Repository for the `Users` sheet.

use estate_core::types::EpochMillis;
use serde_json::Value;

use crate::error::LedgerError;
use crate::ledger::{Ledger, Sheet};
use crate::models::user::{User, UserInfo, COL_TOKEN, COL_TOKEN_EXPIRY};

pub struct UserRepo;

impl UserRepo {
    /// Find an active user by exact email.
    pub async fn find_active_by_email(
        ledger: &dyn Ledger,
        email: &str,
    ) -> Result<Option<User>, LedgerError> {
        for row in ledger.read_all(Sheet::Users).await? {
            // Blank trailing rows carry no id.
            let Ok(user) = User::from_row(&row) else {
                continue;
            };
            if user.active && user.email == email {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// All users without credentials, in sheet order. Rows without an id
    /// are skipped.
    pub async fn list(ledger: &dyn Ledger) -> Result<Vec<UserInfo>, LedgerError> {
        Ok(ledger
            .read_all(Sheet::Users)
            .await?
            .iter()
            .filter_map(|row| User::from_row(row).ok())
            .map(|user| user.info())
            .collect())
    }

    /// Store the latest issued token and its expiry on the user's row.
    pub async fn record_login(
        ledger: &dyn Ledger,
        user_id: &str,
        token: &str,
        expiry: EpochMillis,
    ) -> Result<(), LedgerError> {
        let mut row = ledger
            .read_by_key(Sheet::Users, user_id)
            .await?
            .ok_or_else(|| LedgerError::RowNotFound {
                sheet: Sheet::Users,
                key: user_id.to_string(),
            })?;
        row.insert(COL_TOKEN.into(), Value::String(token.to_string()));
        row.insert(COL_TOKEN_EXPIRY.into(), Value::from(expiry));
        ledger.write_by_key(Sheet::Users, user_id, row).await
    }
}
