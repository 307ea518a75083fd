//! `getUsers` (admin only).

use estate_db::models::user::UserInfo;
use estate_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// All users, without credentials.
pub async fn get_users(state: &AppState, RequireAdmin(admin): RequireAdmin) -> AppResult<Vec<UserInfo>> {
    tracing::debug!(admin_id = %admin.id, "Listing users");
    Ok(UserRepo::list(state.ledger.as_ref()).await?)
}
