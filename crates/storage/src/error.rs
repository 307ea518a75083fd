/// Errors from the object-store layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a failure status.
    #[error("Storage request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The copy into the permanent namespace failed; the temporary object
    /// is untouched.
    #[error("Failed to promote {key}: {source}")]
    PromotionFailed {
        key: String,
        #[source]
        source: Box<StorageError>,
    },

    /// The copy into the archive namespace failed; the original is untouched.
    #[error("Failed to archive image before deletion: {source}")]
    ArchiveFailed {
        key: String,
        #[source]
        source: Box<StorageError>,
    },
}
