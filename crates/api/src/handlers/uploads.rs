//! `getUploadUrl` and `deleteImage`.

use estate_core::error::CoreError;
use estate_core::keys;
use estate_core::types::Row;
use serde::{Deserialize, Serialize};

use super::{id_text, parse_params};
use crate::error::AppResult;
use crate::state::AppState;

/// Property id used for archive paths when the caller sends none.
const UNKNOWN_PROPERTY: &str = "unknown";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Presigned PUT URL, valid for five minutes.
    pub upload_url: String,
    /// Object key relative to the bucket; clients prefix their asset base URL.
    /// Sent back unchanged in `saveProperty`.
    pub public_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageRequest {
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageResponse {
    pub success: bool,
    pub deleted: bool,
    pub moved_to: String,
}

pub fn get_upload_url(state: &AppState, params: Row) -> AppResult<UploadUrlResponse> {
    let filename = params
        .get("filename")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty());
    let (Some(filename), Some(_)) = (filename, id_text(params.get("propertyId"))) else {
        return Err(CoreError::Validation("Missing filename or propertyId".into()).into());
    };

    let key = keys::temporary_key(filename)?;
    let presigned = state.signer.presign("PUT", &key, state.clock.now());

    tracing::debug!(key = %key, "Issued upload URL");
    Ok(UploadUrlResponse {
        upload_url: presigned.url,
        public_url: key,
    })
}

/// Soft-delete an image by moving it into the archive namespace.
pub async fn delete_image(state: &AppState, params: Row) -> AppResult<DeleteImageResponse> {
    let property_id =
        id_text(params.get("propertyId")).unwrap_or_else(|| UNKNOWN_PROPERTY.to_string());
    let input: DeleteImageRequest = parse_params(params)?;
    let key = input
        .image_path
        .as_deref()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('/');
    if key.is_empty() {
        return Err(CoreError::Validation("Missing imagePath".into()).into());
    }

    let moved_to = state.images.archive(key, &property_id).await?;

    Ok(DeleteImageResponse {
        success: true,
        deleted: true,
        moved_to,
    })
}
