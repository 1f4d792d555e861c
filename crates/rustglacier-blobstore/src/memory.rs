//! In-memory blob store backend.
//!
//! Thread-safe and transient: all containers, blobs, and multipart sessions
//! live in [`DashMap`]s and vanish on restart. Etags are MD5 hex digests of
//! the blob content, matching what object store backends typically report.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use md5::{Digest, Md5};
use parking_lot::Mutex;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{BlobStoreError, BlobStoreResult};
use crate::{BlobInfo, BlobStore, ContainerInfo, MultipartSession};

/// A stored blob with its metadata.
#[derive(Debug, Clone)]
struct StoredBlob {
    data: Bytes,
    etag: String,
    creation_date: DateTime<Utc>,
}

/// A container and the blobs it holds.
#[derive(Debug)]
struct Container {
    creation_date: DateTime<Utc>,
    blobs: DashMap<String, StoredBlob>,
}

/// Parts accumulated by an open multipart session, keyed by part number.
#[derive(Debug, Default)]
struct SessionParts {
    parts: Mutex<std::collections::BTreeMap<u32, Bytes>>,
}

/// In-memory [`BlobStore`] implementation.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use rustglacier_blobstore::{BlobStore, InMemoryBlobStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryBlobStore::new();
/// store.create_container("vault").await.unwrap();
/// store
///     .put_blob("vault", "archive-1", Bytes::from("hello"))
///     .await
///     .unwrap();
/// let data = store.get_blob("vault", "archive-1").await.unwrap();
/// assert_eq!(data.as_ref(), b"hello");
/// # });
/// ```
pub struct InMemoryBlobStore {
    containers: DashMap<String, Arc<Container>>,
    sessions: DashMap<String, Arc<SessionParts>>,
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("containers_count", &self.containers.len())
            .field("sessions_count", &self.sessions.len())
            .finish()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            containers: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    fn container(&self, name: &str) -> BlobStoreResult<Arc<Container>> {
        self.containers
            .get(name)
            .map(|c| c.clone())
            .ok_or_else(|| BlobStoreError::ContainerNotFound(name.to_owned()))
    }
}

/// Compute the MD5 hex etag for blob content.
fn compute_etag(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn container_exists(&self, container: &str) -> BlobStoreResult<bool> {
        Ok(self.containers.contains_key(container))
    }

    async fn create_container(&self, container: &str) -> BlobStoreResult<()> {
        self.containers
            .entry(container.to_owned())
            .or_insert_with(|| {
                debug!(container, "creating container");
                Arc::new(Container {
                    creation_date: Utc::now(),
                    blobs: DashMap::new(),
                })
            });
        Ok(())
    }

    async fn delete_container(&self, container: &str) -> BlobStoreResult<()> {
        let existing = self.container(container)?;
        if !existing.blobs.is_empty() {
            return Err(BlobStoreError::ContainerNotEmpty(container.to_owned()));
        }
        self.containers.remove(container);
        debug!(container, "deleted container");
        Ok(())
    }

    async fn list_containers(&self) -> BlobStoreResult<Vec<ContainerInfo>> {
        let mut containers: Vec<ContainerInfo> = self
            .containers
            .iter()
            .map(|entry| ContainerInfo {
                name: entry.key().clone(),
                creation_date: entry.value().creation_date,
            })
            .collect();
        containers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(containers)
    }

    async fn container_metadata(&self, container: &str) -> BlobStoreResult<ContainerInfo> {
        let existing = self.container(container)?;
        Ok(ContainerInfo {
            name: container.to_owned(),
            creation_date: existing.creation_date,
        })
    }

    async fn blob_exists(&self, container: &str, blob: &str) -> BlobStoreResult<bool> {
        Ok(self.container(container)?.blobs.contains_key(blob))
    }

    async fn put_blob(&self, container: &str, blob: &str, data: Bytes) -> BlobStoreResult<String> {
        let target = self.container(container)?;
        let etag = compute_etag(&data);
        trace!(container, blob, size = data.len(), "stored blob");
        target.blobs.insert(
            blob.to_owned(),
            StoredBlob {
                data,
                etag: etag.clone(),
                creation_date: Utc::now(),
            },
        );
        Ok(etag)
    }

    async fn get_blob(&self, container: &str, blob: &str) -> BlobStoreResult<Bytes> {
        self.container(container)?
            .blobs
            .get(blob)
            .map(|b| b.data.clone())
            .ok_or_else(|| BlobStoreError::BlobNotFound {
                container: container.to_owned(),
                blob: blob.to_owned(),
            })
    }

    async fn blob_metadata(&self, container: &str, blob: &str) -> BlobStoreResult<BlobInfo> {
        self.container(container)?
            .blobs
            .get(blob)
            .map(|b| BlobInfo {
                name: blob.to_owned(),
                size: b.data.len() as u64,
                creation_date: b.creation_date,
            })
            .ok_or_else(|| BlobStoreError::BlobNotFound {
                container: container.to_owned(),
                blob: blob.to_owned(),
            })
    }

    async fn remove_blob(&self, container: &str, blob: &str) -> BlobStoreResult<()> {
        self.container(container)?.blobs.remove(blob);
        trace!(container, blob, "removed blob");
        Ok(())
    }

    async fn list_blobs(&self, container: &str) -> BlobStoreResult<Vec<BlobInfo>> {
        let target = self.container(container)?;
        let mut blobs: Vec<BlobInfo> = target
            .blobs
            .iter()
            .map(|entry| BlobInfo {
                name: entry.key().clone(),
                size: entry.value().data.len() as u64,
                creation_date: entry.value().creation_date,
            })
            .collect();
        blobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(blobs)
    }

    async fn initiate_multipart(
        &self,
        container: &str,
        blob: &str,
    ) -> BlobStoreResult<MultipartSession> {
        // Fail early if the target container is gone.
        let _ = self.container(container)?;
        let id = Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Arc::new(SessionParts::default()));
        debug!(container, blob, session = %id, "opened multipart session");
        Ok(MultipartSession {
            id,
            container: container.to_owned(),
            blob: blob.to_owned(),
        })
    }

    async fn upload_part(
        &self,
        session: &MultipartSession,
        part_number: u32,
        data: Bytes,
    ) -> BlobStoreResult<String> {
        let parts = self
            .sessions
            .get(&session.id)
            .map(|s| s.clone())
            .ok_or_else(|| BlobStoreError::SessionNotFound(session.id.clone()))?;
        let etag = compute_etag(&data);
        parts.parts.lock().insert(part_number, data);
        Ok(etag)
    }

    async fn complete_multipart(&self, session: &MultipartSession) -> BlobStoreResult<String> {
        let parts = self
            .sessions
            .remove(&session.id)
            .map(|(_, s)| s)
            .ok_or_else(|| BlobStoreError::SessionNotFound(session.id.clone()))?;

        let assembled = {
            let parts = parts.parts.lock();
            let total: usize = parts.values().map(Bytes::len).sum();
            let mut buf = BytesMut::with_capacity(total);
            for data in parts.values() {
                buf.extend_from_slice(data);
            }
            buf.freeze()
        };

        debug!(
            container = %session.container,
            blob = %session.blob,
            session = %session.id,
            size = assembled.len(),
            "completed multipart session"
        );
        self.put_blob(&session.container, &session.blob, assembled)
            .await
    }

    async fn abort_multipart(&self, session: &MultipartSession) -> BlobStoreResult<()> {
        self.sessions
            .remove(&session.id)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::SessionNotFound(session.id.clone()))
    }
}
