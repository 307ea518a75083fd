use async_trait::async_trait;

use crate::error::StorageError;

/// Server-side object operations used by the image lifecycle.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Copy `source_key` to `dest_key`, overwriting any existing object.
    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<(), StorageError>;

    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}
