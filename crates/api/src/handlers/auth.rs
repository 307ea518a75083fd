//! `login`: exchange email and password for a session token.

use estate_core::error::CoreError;
use estate_core::types::Row;
use estate_db::models::user::UserInfo;
use estate_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use super::parse_params;
use crate::auth::password::verify_password;
use crate::auth::session::issue_session;
use crate::error::AppResult;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials or inactive account";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

pub async fn login(state: &AppState, params: Row) -> AppResult<LoginResponse> {
    let input: LoginRequest = parse_params(params)?;
    let email = input.email.trim();

    let user = UserRepo::find_active_by_email(state.ledger.as_ref(), email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let verified = verify_password(&input.password, &user.password_hash).unwrap_or_else(|e| {
        tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
        false
    });
    if !verified {
        tracing::info!(user_id = %user.id, "Login rejected");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    let now_ms = state.clock.now().timestamp_millis();
    let session = issue_session(&user, &state.config.token, now_ms)?;

    if let Err(e) = UserRepo::record_login(
        state.ledger.as_ref(),
        &user.id,
        &session.token,
        session.expires_at,
    )
    .await
    {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record issued token");
    }

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(LoginResponse {
        token: session.token,
        user: user.info(),
    })
}
