//! `getProperties` and `saveProperty`.
//!
//! Saving promotes any temporary image keys in the payload into the
//! property's permanent namespace before the merge, so the stored row only
//! ever references promoted keys (or temporary ones whose promotion failed).

use std::collections::HashMap;

use estate_core::error::CoreError;
use estate_core::merge::{self, gallery_entries, DEFAULT_AGENT_NAME};
use estate_core::types::Row;
use estate_db::repositories::PropertyRepo;
use serde::Serialize;
use serde_json::Value;

use super::id_text;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Candidates tried for a generated id before giving up.
const MAX_ID_ATTEMPTS: u32 = 64;

#[derive(Debug, Serialize)]
pub struct SavePropertyResponse {
    pub success: bool,
    pub id: String,
}

/// All properties with `images` decoded into arrays.
pub async fn get_properties(state: &AppState) -> AppResult<Vec<Row>> {
    Ok(PropertyRepo::list(state.ledger.as_ref()).await?)
}

/// Create or update a property from a partial payload.
pub async fn save_property(
    state: &AppState,
    user: &AuthUser,
    params: Row,
) -> AppResult<SavePropertyResponse> {
    let requested = id_text(params.get("id"));
    let existing = match requested.as_deref() {
        Some(id) if id != merge::NEW_ID => PropertyRepo::find(state.ledger.as_ref(), id).await?,
        _ => None,
    };
    let resolved = merge::resolve_id(requested.as_deref(), state.clock.now().timestamp_millis());
    let id = if requested.as_deref().map(str::trim) == Some(resolved.as_str()) {
        resolved
    } else {
        free_property_id(state, &resolved).await?
    };

    let mut incoming = params;
    incoming.insert("id".into(), Value::String(id.clone()));
    let agent_name = match user.name.trim() {
        "" => DEFAULT_AGENT_NAME,
        name => name,
    };
    incoming.insert("agent_name".into(), Value::String(agent_name.to_string()));

    promote_images(state, &mut incoming, &id).await;

    let row = merge::merge(existing.as_ref(), &incoming)?;
    PropertyRepo::save(state.ledger.as_ref(), row, existing.is_some()).await?;

    tracing::info!(
        property_id = %id,
        created = existing.is_none(),
        user_id = %user.id,
        "Property saved",
    );
    Ok(SavePropertyResponse { success: true, id })
}

/// First candidate derived from `base` that no stored property uses yet.
async fn free_property_id(state: &AppState, base: &str) -> AppResult<String> {
    for attempt in 0..MAX_ID_ATTEMPTS {
        let candidate = merge::candidate_id(base, attempt);
        if PropertyRepo::find(state.ledger.as_ref(), &candidate)
            .await?
            .is_none()
        {
            return Ok(candidate);
        }
    }
    Err(CoreError::Internal(format!("No free property id after {base}")).into())
}

/// Rewrite temporary keys in `thumbnail`, legacy `image` and `images`.
///
/// A key referenced more than once is promoted once; later references
/// reuse the first result.
async fn promote_images(state: &AppState, incoming: &mut Row, property_id: &str) {
    let mut promoted: HashMap<String, String> = HashMap::new();

    let thumbnail = non_empty_text(incoming, "thumbnail");
    let legacy = non_empty_text(incoming, "image");

    if let Some(key) = thumbnail {
        let dest = promote_once(state, &mut promoted, &key, property_id).await;
        incoming.insert("thumbnail".into(), Value::String(dest));
    } else if let Some(key) = legacy {
        // A legacy-only payload also sets the thumbnail.
        let dest = promote_once(state, &mut promoted, &key, property_id).await;
        incoming.insert("image".into(), Value::String(dest.clone()));
        incoming.insert("thumbnail".into(), Value::String(dest));
    }

    let gallery = match incoming.get("images") {
        Some(value) if !value.is_null() => gallery_entries(value),
        _ => return,
    };
    let mut entries = Vec::with_capacity(gallery.len());
    for key in &gallery {
        let dest = promote_once(state, &mut promoted, key, property_id).await;
        entries.push(Value::String(dest));
    }
    incoming.insert("images".into(), Value::Array(entries));
}

async fn promote_once(
    state: &AppState,
    promoted: &mut HashMap<String, String>,
    key: &str,
    property_id: &str,
) -> String {
    if let Some(dest) = promoted.get(key) {
        return dest.clone();
    }
    let dest = state.images.promote_if_temporary(key, property_id).await;
    promoted.insert(key.to_string(), dest.clone());
    dest
}

fn non_empty_text(row: &Row, column: &str) -> Option<String> {
    row.get(column)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
