//! Session issuance for a logged-in user.

use estate_core::error::CoreError;
use estate_core::token::{self, SessionClaims};
use estate_core::types::EpochMillis;
use estate_db::models::user::User;

use crate::config::TokenConfig;

/// A signed token and the expiry baked into it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: EpochMillis,
}

/// Issue a session token for `user`, valid for the configured TTL from `now_ms`.
pub fn issue_session(
    user: &User,
    config: &TokenConfig,
    now_ms: EpochMillis,
) -> Result<Session, CoreError> {
    let claims = SessionClaims {
        id: user.id.clone(),
        name: user.name.clone(),
        role: user.role.clone(),
        exp: now_ms + config.ttl_ms,
    };
    let token = token::issue(&claims, &config.secret)?;
    Ok(Session {
        token,
        expires_at: claims.exp,
    })
}
