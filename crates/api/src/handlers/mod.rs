//! Action dispatch.
//!
//! Every action arrives as one POST body `{ "action", "params", "token" }`
//! and answers with an [`Envelope`]. Browser clients send the body as
//! `text/plain` to avoid CORS preflights, so it is parsed as JSON whatever
//! its declared content type.

pub mod auth;
pub mod leads;
pub mod properties;
pub mod uploads;
pub mod users;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use estate_core::error::CoreError;
use estate_core::types::Row;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::Envelope;
use crate::state::AppState;

/// The single request shape every action shares.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub params: Option<Row>,
    #[serde(default)]
    pub token: Option<String>,
}

/// POST / -- run one action.
pub async fn dispatch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result = match std::str::from_utf8(&body) {
        Ok(body) => run_action(&state, &headers, body).await,
        Err(e) => Err(AppError::BadRequest(format!("Request body is not valid UTF-8: {e}"))),
    };
    match result {
        Ok(data) => Json(Envelope::ok(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn run_action(state: &AppState, headers: &HeaderMap, body: &str) -> AppResult<Value> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("No data found".into()));
    }
    let request: ActionRequest = serde_json::from_str(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;
    let params = request.params.unwrap_or_default();

    tracing::debug!(action = %request.action, "Dispatching action");

    // The only action that runs without a session.
    if request.action == "login" {
        return to_data(auth::login(state, params).await?);
    }

    let user = AuthUser::authenticate(state, request.token.as_deref(), headers)?;

    match request.action.as_str() {
        "getLeads" => to_data(leads::get_leads(state).await?),
        "lockLead" => to_data(leads::lock_lead(state, &user, params).await?),
        "getProperties" => to_data(properties::get_properties(state).await?),
        "saveProperty" => to_data(properties::save_property(state, &user, params).await?),
        "getUploadUrl" => to_data(uploads::get_upload_url(state, params)?),
        "deleteImage" => to_data(uploads::delete_image(state, params).await?),
        "getUsers" => to_data(users::get_users(state, RequireAdmin::try_from(user)?).await?),
        other => Err(CoreError::Validation(format!("Unknown action: {other}")).into()),
    }
}

fn to_data<T: Serialize>(data: T) -> AppResult<Value> {
    serde_json::to_value(data)
        .map_err(|e| AppError::InternalError(format!("Response serialization failed: {e}")))
}

/// Decode an action's `params` into its typed request.
pub(crate) fn parse_params<T: DeserializeOwned>(params: Row) -> AppResult<T> {
    serde_json::from_value(Value::Object(params))
        .map_err(|e| CoreError::Validation(format!("Invalid params: {e}")).into())
}

/// An id parameter as text. Clients send ids as strings or numbers.
pub(crate) fn id_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ids_accept_strings_and_numbers() {
        assert_eq!(id_text(Some(&json!("L1"))), Some("L1".to_string()));
        assert_eq!(id_text(Some(&json!(42))), Some("42".to_string()));
        assert_eq!(id_text(Some(&json!("  "))), None);
        assert_eq!(id_text(Some(&json!(null))), None);
        assert_eq!(id_text(None), None);
    }

    #[test]
    fn params_default_to_empty() {
        let request: ActionRequest = serde_json::from_str(r#"{"action":"getLeads"}"#).unwrap();
        assert!(request.params.is_none());
        assert!(request.token.is_none());
    }
}
