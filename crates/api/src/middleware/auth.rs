//! Session-token authentication for actions.
//!
//! The token normally travels in the request body next to the action. An
//! `Authorization: Bearer <token>` header is accepted as a fallback for
//! clients that keep credentials out of payloads.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use estate_core::error::CoreError;
use estate_core::token;

use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// The user's ledger id.
    pub id: String,
    /// Display name at login time.
    pub name: String,
    /// The user's role name (`"admin"` or `"agent"`).
    pub role: String,
}

impl AuthUser {
    /// Verify the body token, or the bearer header when the body has none.
    pub fn authenticate(
        state: &AppState,
        body_token: Option<&str>,
        headers: &HeaderMap,
    ) -> Result<Self, AppError> {
        let token = body_token
            .filter(|t| !t.is_empty())
            .or_else(|| bearer_token(headers))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing Authorization token".into()))
            })?;

        let now_ms = state.clock.now().timestamp_millis();
        let claims = token::verify_at(token, &state.config.token.secret, now_ms)?;

        Ok(AuthUser {
            id: claims.id,
            name: claims.name,
            role: claims.role,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
