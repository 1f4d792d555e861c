//! Archive operations: upload and delete.
//!
//! An archive is a primary blob named by a v4 UUID plus a JSON side-blob
//! `<id>_metadata` holding the description and the client-supplied hashes.
//! The side-blob is written after the primary; if either write fails, both
//! are removed best-effort before the failure surfaces as 503.

use bytes::Bytes;
use http::StatusCode;
use rustglacier_blobstore::{BlobStore, BlobStoreError};
use rustglacier_core::AccountId;
use rustglacier_model::GlacierError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::body::GlacierResponseBody;
use crate::handlers::{GlacierHandler, header_value, require_header, store_error};
use crate::response::{build_response, empty_response};

/// Suffix of the metadata side-blob accompanying each archive.
pub(crate) const METADATA_SUFFIX: &str = "_metadata";

/// Header carrying the archive's SHA-256 tree hash.
pub(crate) const TREE_HASH_HEADER: &str = "x-amz-sha256-tree-hash";

/// Header carrying the payload's SHA-256 hash.
pub(crate) const CONTENT_HASH_HEADER: &str = "x-amz-content-sha256";

/// Header carrying the optional archive description.
pub(crate) const DESCRIPTION_HEADER: &str = "x-amz-archive-description";

impl<S: BlobStore> GlacierHandler<S> {
    /// Upload an archive: write the primary blob and its metadata side-blob.
    pub(crate) async fn upload_archive(
        &self,
        account: &AccountId,
        vault: &str,
        parts: &http::request::Parts,
        body: Bytes,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let content_hash = require_header(parts, CONTENT_HASH_HEADER)?.to_owned();
        let tree_hash = require_header(parts, TREE_HASH_HEADER)?.to_owned();
        let description = header_value(parts, DESCRIPTION_HEADER).map(str::to_owned);

        if !self
            .store()
            .container_exists(vault)
            .await
            .map_err(store_error)?
        {
            return Err(GlacierError::not_found("vault", vault));
        }

        let archive_id = Uuid::new_v4().to_string();
        let size = body.len();

        let mut metadata = serde_json::Map::new();
        if let Some(description) = &description {
            metadata.insert(
                "archive-description".to_owned(),
                serde_json::Value::String(description.clone()),
            );
        }
        metadata.insert(
            "tree-hash".to_owned(),
            serde_json::Value::String(tree_hash.clone()),
        );
        metadata.insert(
            "content-hash".to_owned(),
            serde_json::Value::String(content_hash),
        );
        let metadata = Bytes::from(serde_json::Value::Object(metadata).to_string());

        if let Err(err) = self.write_archive_pair(vault, &archive_id, body, metadata).await {
            self.cleanup_archive_pair(vault, &archive_id).await;
            return Err(match err {
                BlobStoreError::ContainerNotFound(name) => GlacierError::not_found("vault", name),
                other => GlacierError::unavailable(other.to_string()),
            });
        }

        info!(vault, archive_id = %archive_id, size, "uploaded archive");

        let builder = http::Response::builder()
            .status(StatusCode::CREATED)
            .header(
                http::header::LOCATION,
                format!("/{}/vaults/{vault}/archives/{archive_id}", account.as_str()),
            )
            .header("x-amz-archive-id", &archive_id)
            .header(TREE_HASH_HEADER, &tree_hash);
        build_response(builder, GlacierResponseBody::empty())
    }

    /// Delete an archive and its metadata side-blob. Idempotent.
    pub(crate) async fn delete_archive(
        &self,
        vault: &str,
        id: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        self.store()
            .remove_blob(vault, id)
            .await
            .map_err(store_error)?;
        self.store()
            .remove_blob(vault, &format!("{id}{METADATA_SUFFIX}"))
            .await
            .map_err(store_error)?;

        info!(vault, archive_id = id, "deleted archive");
        empty_response(StatusCode::NO_CONTENT)
    }

    /// Write the archive blob then its metadata side-blob.
    async fn write_archive_pair(
        &self,
        vault: &str,
        archive_id: &str,
        body: Bytes,
        metadata: Bytes,
    ) -> Result<(), BlobStoreError> {
        self.store().put_blob(vault, archive_id, body).await?;
        self.store()
            .put_blob(vault, &format!("{archive_id}{METADATA_SUFFIX}"), metadata)
            .await?;
        Ok(())
    }

    /// Best-effort removal of a partially written archive pair.
    async fn cleanup_archive_pair(&self, vault: &str, archive_id: &str) {
        if let Err(err) = self.store().remove_blob(vault, archive_id).await {
            warn!(vault, archive_id, error = %err, "failed to clean up archive blob");
        }
        let metadata_blob = format!("{archive_id}{METADATA_SUFFIX}");
        if let Err(err) = self.store().remove_blob(vault, &metadata_blob).await {
            warn!(vault, archive_id, error = %err, "failed to clean up archive metadata blob");
        }
    }
}
