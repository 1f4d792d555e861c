//! Object store abstraction for RustGlacier.
//!
//! The Glacier protocol layer speaks to storage exclusively through the
//! [`BlobStore`] trait: containers map to vaults, blobs to archives, and
//! multipart sessions to in-progress multipart uploads. The crate ships an
//! in-memory backend, [`InMemoryBlobStore`], used by the server binary and
//! the test suite; other backends can be plugged in behind the same trait.

mod error;
mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

pub use error::{BlobStoreError, BlobStoreResult};
pub use memory::InMemoryBlobStore;

/// Metadata for a container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    /// The container name.
    pub name: String,
    /// When the container was created.
    pub creation_date: DateTime<Utc>,
}

/// Metadata for a stored blob.
#[derive(Debug, Clone)]
pub struct BlobInfo {
    /// The blob name.
    pub name: String,
    /// The blob's size in bytes.
    pub size: u64,
    /// When the blob was written.
    pub creation_date: DateTime<Utc>,
}

/// Handle for an in-progress multipart write, returned by
/// [`BlobStore::initiate_multipart`] and consumed by the part, complete,
/// and abort operations.
#[derive(Debug, Clone)]
pub struct MultipartSession {
    /// Backend-assigned session identifier.
    pub id: String,
    /// The destination container.
    pub container: String,
    /// The destination blob name.
    pub blob: String,
}

/// The storage primitives the Glacier protocol layer is built on.
///
/// Implementations must be safe for concurrent use; the HTTP layer calls
/// into a single shared instance from every request task.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Whether the named container exists.
    async fn container_exists(&self, container: &str) -> BlobStoreResult<bool>;

    /// Create a container. Creating an existing container is a no-op.
    async fn create_container(&self, container: &str) -> BlobStoreResult<()>;

    /// Delete a container.
    ///
    /// # Errors
    /// Returns [`BlobStoreError::ContainerNotEmpty`] when blobs remain in
    /// the container, and [`BlobStoreError::ContainerNotFound`] when it
    /// does not exist.
    async fn delete_container(&self, container: &str) -> BlobStoreResult<()>;

    /// List all containers.
    async fn list_containers(&self) -> BlobStoreResult<Vec<ContainerInfo>>;

    /// Fetch a single container's metadata.
    async fn container_metadata(&self, container: &str) -> BlobStoreResult<ContainerInfo>;

    /// Whether the named blob exists.
    async fn blob_exists(&self, container: &str, blob: &str) -> BlobStoreResult<bool>;

    /// Write a blob, replacing any existing blob of the same name.
    /// Returns the backend's etag for the written data.
    async fn put_blob(&self, container: &str, blob: &str, data: Bytes) -> BlobStoreResult<String>;

    /// Read a blob's full content.
    async fn get_blob(&self, container: &str, blob: &str) -> BlobStoreResult<Bytes>;

    /// Fetch a blob's metadata without reading its content.
    async fn blob_metadata(&self, container: &str, blob: &str) -> BlobStoreResult<BlobInfo>;

    /// Remove a blob. Removing a missing blob is a no-op.
    async fn remove_blob(&self, container: &str, blob: &str) -> BlobStoreResult<()>;

    /// List all blobs in a container.
    async fn list_blobs(&self, container: &str) -> BlobStoreResult<Vec<BlobInfo>>;

    /// Open a multipart session targeting the given blob.
    async fn initiate_multipart(
        &self,
        container: &str,
        blob: &str,
    ) -> BlobStoreResult<MultipartSession>;

    /// Write one part of a multipart session. Re-writing a part number
    /// replaces the previous data. Returns the part's etag.
    async fn upload_part(
        &self,
        session: &MultipartSession,
        part_number: u32,
        data: Bytes,
    ) -> BlobStoreResult<String>;

    /// Assemble the session's parts in part-number order into the target
    /// blob and discard the session. Returns the blob's etag.
    async fn complete_multipart(&self, session: &MultipartSession) -> BlobStoreResult<String>;

    /// Discard the session and any parts written to it.
    async fn abort_multipart(&self, session: &MultipartSession) -> BlobStoreResult<()>;
}
