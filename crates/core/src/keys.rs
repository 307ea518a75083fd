//! Object key conventions for property images.
//!
//! ```text
//! uploaded_assets/<file>                              temporary (browser upload target)
//! assets/props-imgs/prop-id-<property>/<file>         permanent
//! assets/props-imgs-deleted/prop-id-<property>/<file> archive (soft-deleted)
//! ```
//!
//! Destination keys depend only on the property id and the source key's
//! final segment, so retried moves always land on the same key.

use crate::error::CoreError;

pub const TEMP_PREFIX: &str = "uploaded_assets/";
pub const PERMANENT_PREFIX: &str = "assets/props-imgs";
pub const ARCHIVE_PREFIX: &str = "assets/props-imgs-deleted";

pub fn is_temporary(key: &str) -> bool {
    key.starts_with(TEMP_PREFIX)
}

/// Final path segment of `key`.
pub fn filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Temporary upload key for a client-supplied filename.
pub fn temporary_key(filename: &str) -> Result<String, CoreError> {
    let name = filename.trim();
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(CoreError::Validation(format!("Invalid filename: {filename:?}")));
    }
    Ok(format!("{TEMP_PREFIX}{name}"))
}

pub fn permanent_key(property_id: &str, source_key: &str) -> String {
    format!("{PERMANENT_PREFIX}/prop-id-{property_id}/{}", filename(source_key))
}

pub fn archive_key(property_id: &str, source_key: &str) -> String {
    format!("{ARCHIVE_PREFIX}/prop-id-{property_id}/{}", filename(source_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_detection() {
        assert!(is_temporary("uploaded_assets/a.jpg"));
        assert!(!is_temporary("assets/props-imgs/prop-id-1/a.jpg"));
        assert!(!is_temporary("https://cdn.example.com/uploaded_assets/a.jpg"));
    }

    #[test]
    fn permanent_key_uses_last_segment() {
        assert_eq!(
            permanent_key("prop_17", "uploaded_assets/nested/kitchen.jpg"),
            "assets/props-imgs/prop-id-prop_17/kitchen.jpg"
        );
    }

    #[test]
    fn archive_key_is_deterministic() {
        let src = "assets/props-imgs/prop-id-9/pool.png";
        assert_eq!(archive_key("9", src), "assets/props-imgs-deleted/prop-id-9/pool.png");
        assert_eq!(archive_key("9", src), archive_key("9", src));
    }

    #[test]
    fn temporary_key_rejects_paths() {
        assert_eq!(temporary_key("a.jpg").unwrap(), "uploaded_assets/a.jpg");
        assert!(temporary_key("").is_err());
        assert!(temporary_key("../etc/passwd").is_err());
        assert!(temporary_key("dir/a.jpg").is_err());
    }
}
