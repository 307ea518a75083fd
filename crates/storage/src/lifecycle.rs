//! Image moves between the temporary, permanent and archive namespaces.
//!
//! Every move is COPY-then-DELETE. The copy must succeed before the source
//! is touched, so a failure at any point leaves at least one full copy.
//! Destination keys are deterministic (see `estate_core::keys`), which
//! makes a retried move overwrite its own earlier partial result.

use std::sync::Arc;

use estate_core::keys;

use crate::error::StorageError;
use crate::store::ObjectStore;

#[derive(Clone)]
pub struct ImageLifecycle {
    store: Arc<dyn ObjectStore>,
}

impl ImageLifecycle {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Move an uploaded object into the property's permanent namespace.
    ///
    /// A failed COPY fails with [`StorageError::PromotionFailed`] and no
    /// DELETE is sent. A failed DELETE after a good COPY is logged and
    /// ignored: the permanent copy exists, the temporary one leaks.
    pub async fn promote(&self, temp_key: &str, property_id: &str) -> Result<String, StorageError> {
        let dest = keys::permanent_key(property_id, temp_key);

        self.store
            .copy_object(temp_key, &dest)
            .await
            .map_err(|e| StorageError::PromotionFailed {
                key: temp_key.to_string(),
                source: Box::new(e),
            })?;

        if let Err(e) = self.store.delete_object(temp_key).await {
            tracing::warn!(key = temp_key, error = %e, "Promoted image left behind in temporary namespace");
        }

        tracing::info!(from = temp_key, to = %dest, property_id, "Image promoted");
        Ok(dest)
    }

    /// Promote `key` if it is a temporary upload, otherwise return it as is.
    ///
    /// Promotion failures keep the temporary reference so the record never
    /// loses track of the upload.
    pub async fn promote_if_temporary(&self, key: &str, property_id: &str) -> String {
        if !keys::is_temporary(key) {
            return key.to_string();
        }
        match self.promote(key, property_id).await {
            Ok(dest) => dest,
            Err(e) => {
                tracing::warn!(key, property_id, error = %e, "Keeping temporary image reference");
                key.to_string()
            }
        }
    }

    /// Soft-delete: copy `key` into the archive namespace, then delete it.
    ///
    /// A failed COPY fails with [`StorageError::ArchiveFailed`] and the
    /// original is left in place. A failed DELETE after a good COPY is
    /// returned as is; the archive copy is already written.
    pub async fn archive(&self, key: &str, property_id: &str) -> Result<String, StorageError> {
        let dest = keys::archive_key(property_id, key);
        if dest == key {
            // Already archived.
            return Ok(dest);
        }

        self.store
            .copy_object(key, &dest)
            .await
            .map_err(|e| StorageError::ArchiveFailed {
                key: key.to_string(),
                source: Box::new(e),
            })?;

        self.store.delete_object(key).await?;

        tracing::info!(from = key, to = %dest, property_id, "Image archived");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::memory::{MemoryObjectStore, StoreCall};

    fn setup() -> (Arc<MemoryObjectStore>, ImageLifecycle) {
        let store = Arc::new(MemoryObjectStore::new());
        let lifecycle = ImageLifecycle::new(store.clone());
        (store, lifecycle)
    }

    #[tokio::test]
    async fn promote_copies_then_deletes() {
        let (store, lifecycle) = setup();
        store.put("uploaded_assets/a.jpg");

        let dest = lifecycle.promote("uploaded_assets/a.jpg", "p1").await.unwrap();

        assert_eq!(dest, "assets/props-imgs/prop-id-p1/a.jpg");
        assert!(store.contains(&dest));
        assert!(!store.contains("uploaded_assets/a.jpg"));
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Copy {
                    source: "uploaded_assets/a.jpg".into(),
                    dest: dest.clone()
                },
                StoreCall::Delete {
                    key: "uploaded_assets/a.jpg".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn failed_promotion_copy_sends_no_delete() {
        let (store, lifecycle) = setup();
        store.put("uploaded_assets/a.jpg");
        store.fail_copies(true);

        let result = lifecycle.promote("uploaded_assets/a.jpg", "p1").await;

        assert_matches!(result, Err(StorageError::PromotionFailed { .. }));
        assert!(store.contains("uploaded_assets/a.jpg"));
        assert!(!store
            .calls()
            .iter()
            .any(|c| matches!(c, StoreCall::Delete { .. })));
    }

    #[tokio::test]
    async fn failed_temp_delete_still_promotes() {
        let (store, lifecycle) = setup();
        store.put("uploaded_assets/a.jpg");
        store.fail_deletes(true);

        let dest = lifecycle.promote("uploaded_assets/a.jpg", "p1").await.unwrap();

        assert!(store.contains(&dest));
        assert!(store.contains("uploaded_assets/a.jpg"));
    }

    #[tokio::test]
    async fn promote_is_idempotent_per_key() {
        let (store, lifecycle) = setup();
        store.put("uploaded_assets/a.jpg");
        store.fail_deletes(true);

        let first = lifecycle.promote("uploaded_assets/a.jpg", "p1").await.unwrap();
        store.fail_deletes(false);
        let second = lifecycle.promote("uploaded_assets/a.jpg", "p1").await.unwrap();

        assert_eq!(first, second);
        assert!(!store.contains("uploaded_assets/a.jpg"));
    }

    #[tokio::test]
    async fn promote_if_temporary_passes_through_permanent_keys() {
        let (store, lifecycle) = setup();
        let key = "assets/props-imgs/prop-id-p1/a.jpg";
        assert_eq!(lifecycle.promote_if_temporary(key, "p1").await, key);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn promote_if_temporary_keeps_reference_on_failure() {
        let (store, lifecycle) = setup();
        store.fail_copies(true);
        let key = "uploaded_assets/a.jpg";
        assert_eq!(lifecycle.promote_if_temporary(key, "p1").await, key);
    }

    #[tokio::test]
    async fn archive_copies_before_deleting() {
        let (store, lifecycle) = setup();
        let key = "assets/props-imgs/prop-id-p1/a.jpg";
        store.put(key);

        let dest = lifecycle.archive(key, "p1").await.unwrap();

        assert_eq!(dest, "assets/props-imgs-deleted/prop-id-p1/a.jpg");
        assert!(store.contains(&dest));
        assert!(!store.contains(key));
        assert_matches!(store.calls().first(), Some(StoreCall::Copy { .. }));
    }

    #[tokio::test]
    async fn failed_archive_copy_preserves_original() {
        let (store, lifecycle) = setup();
        let key = "assets/props-imgs/prop-id-p1/a.jpg";
        store.put(key);
        store.fail_copies(true);

        let result = lifecycle.archive(key, "p1").await;

        assert_matches!(result, Err(StorageError::ArchiveFailed { .. }));
        assert!(store.contains(key));
        assert!(!store
            .calls()
            .iter()
            .any(|c| matches!(c, StoreCall::Delete { .. })));
    }

    #[tokio::test]
    async fn failed_archive_delete_is_reported() {
        let (store, lifecycle) = setup();
        let key = "assets/props-imgs/prop-id-p1/a.jpg";
        store.put(key);
        store.fail_deletes(true);

        let result = lifecycle.archive(key, "p1").await;

        assert_matches!(result, Err(StorageError::RequestFailed { status: 403, .. }));
        assert!(store.contains("assets/props-imgs-deleted/prop-id-p1/a.jpg"));
    }

    #[tokio::test]
    async fn archiving_an_archived_key_is_a_no_op() {
        let (store, lifecycle) = setup();
        let key = "assets/props-imgs-deleted/prop-id-p1/a.jpg";
        assert_eq!(lifecycle.archive(key, "p1").await.unwrap(), key);
        assert!(store.calls().is_empty());
    }
}
