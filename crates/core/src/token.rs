//! Compact signed session tokens.
//!
//! Tokens are HS256 JWTs (`b64url(header).b64url(payload).b64url(hmac)`)
//! whose payload is a [`SessionClaims`]. Unlike standard JWTs the `exp`
//! claim is in epoch **milliseconds**, so `jsonwebtoken`'s own expiry
//! validation is switched off and expiry is checked here instead. That also
//! lets callers tell an expired token apart from a forged one.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EpochMillis;

/// Lifetime of a freshly issued session token (24 hours).
pub const DEFAULT_TOKEN_TTL_MS: EpochMillis = 24 * 60 * 60 * 1000;

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The user's ledger id.
    pub id: String,
    /// Display name, used for `agent_name` / `agent_assigned` columns.
    pub name: String,
    /// `"admin"` or `"agent"`.
    pub role: String,
    /// Expiry, epoch milliseconds.
    pub exp: EpochMillis,
}

/// Sign `claims` with `secret`.
pub fn issue(claims: &SessionClaims, secret: &str) -> Result<String, CoreError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("Token encoding failed: {e}")))
}

/// Verify `token` against `secret` at the current wall-clock time.
pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, CoreError> {
    verify_at(token, secret, chrono::Utc::now().timestamp_millis())
}

/// Verify `token` against `secret` as of `now_ms`.
///
/// Structure and signature are checked first; a token that fails either is
/// [`CoreError::InvalidToken`] regardless of its expiry. Only a correctly
/// signed token can be reported as [`CoreError::ExpiredToken`].
pub fn verify_at(
    token: &str,
    secret: &str,
    now_ms: EpochMillis,
) -> Result<SessionClaims, CoreError> {
    if token.split('.').count() != 3 {
        return Err(CoreError::InvalidToken);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| CoreError::InvalidToken)?;

    if now_ms > data.claims.exp {
        return Err(CoreError::ExpiredToken);
    }
    Ok(data.claims)
}
