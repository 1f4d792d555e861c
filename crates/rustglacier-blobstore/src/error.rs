//! Error taxonomy for blob store backends.

/// Errors surfaced by [`BlobStore`](crate::BlobStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    /// The named container does not exist.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// A container delete was refused because blobs remain in it.
    #[error("container not empty: {0}")]
    ContainerNotEmpty(String),

    /// The named blob does not exist in the container.
    #[error("blob not found: {container}/{blob}")]
    BlobNotFound {
        /// The container searched.
        container: String,
        /// The missing blob name.
        blob: String,
    },

    /// The multipart session is unknown or already finished.
    #[error("multipart session not found: {0}")]
    SessionNotFound(String),

    /// Backend failure with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for blob store operations.
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;
