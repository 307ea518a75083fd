//! `Properties` sheet rows.
//!
//! Property rows stay untyped ([`Row`]) because the merge rules in
//! `estate_core::merge` operate column by column and must carry unknown
//! columns through.

use estate_core::merge::gallery_entries;
use estate_core::types::Row;
use serde_json::Value;

pub const COL_IMAGES: &str = "images";

/// Listing view of a stored row: the `images` cell decoded into an array.
pub fn into_listing(mut row: Row) -> Row {
    let images = row
        .get(COL_IMAGES)
        .map(gallery_entries)
        .unwrap_or_default()
        .into_iter()
        .map(Value::String)
        .collect();
    row.insert(COL_IMAGES.into(), Value::Array(images));
    row
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn listing(value: Value) -> Row {
        into_listing(value.as_object().cloned().unwrap())
    }

    #[test]
    fn comma_joined_images_become_array() {
        let row = listing(json!({ "id": "p", "images": "a.jpg, b.jpg,," }));
        assert_eq!(row["images"], json!(["a.jpg", "b.jpg"]));
    }

    #[test]
    fn legacy_json_images_become_array() {
        let row = listing(json!({ "id": "p", "images": "[\"a.jpg\"]" }));
        assert_eq!(row["images"], json!(["a.jpg"]));
    }

    #[test]
    fn broken_legacy_json_becomes_empty() {
        let row = listing(json!({ "id": "p", "images": "[not json" }));
        assert_eq!(row["images"], json!([]));
    }

    #[test]
    fn missing_images_become_empty() {
        let row = listing(json!({ "id": "p" }));
        assert_eq!(row["images"], json!([]));
    }
}
