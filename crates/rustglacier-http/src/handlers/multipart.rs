//! Multipart upload operations: initiate, upload part, list, complete,
//! and abort.
//!
//! Part placement is derived from the `Content-Range` header: the start
//! offset must fall on a part-size boundary and determines the 1-based
//! part number. Part bytes go straight to the blob store's session; only
//! sizes and tree hashes are tracked in the upload record.

use bytes::Bytes;
use http::StatusCode;
use rustglacier_blobstore::{BlobStore, BlobStoreError};
use rustglacier_core::AccountId;
use rustglacier_model::multipart::{
    MAX_PARTS, PartEntry, PartList, UploadEntry, UploadList, parse_content_range,
};
use rustglacier_model::{GlacierError, format_timestamp, vault_arn};
use tracing::info;

use crate::body::GlacierResponseBody;
use crate::handlers::archive::{CONTENT_HASH_HEADER, DESCRIPTION_HEADER, TREE_HASH_HEADER};
use crate::handlers::{GlacierHandler, header_value, require_header, store_error};
use crate::response::{build_response, empty_response, json_response};
use crate::state::{UploadPart, UploadRecord};

/// Header carrying the declared part size at initiation.
const PART_SIZE_HEADER: &str = "x-amz-part-size";

/// Header carrying the declared total archive size at completion.
const ARCHIVE_SIZE_HEADER: &str = "x-amz-archive-size";

/// Map a session-level store failure: a vanished session means the upload
/// id no longer resolves.
fn session_error(err: BlobStoreError, upload_id: &str) -> GlacierError {
    match err {
        BlobStoreError::SessionNotFound(_) => GlacierError::not_found("upload", upload_id),
        other => store_error(other),
    }
}

impl<S: BlobStore> GlacierHandler<S> {
    /// Start a multipart upload into the given vault.
    pub(crate) async fn initiate_upload(
        &self,
        account: &AccountId,
        vault: &str,
        parts: &http::request::Parts,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let part_size = require_header(parts, PART_SIZE_HEADER)?;
        let part_size: u64 = part_size
            .parse()
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| GlacierError::bad_request(format!("Invalid part size: {part_size}")))?;
        let description = header_value(parts, DESCRIPTION_HEADER).map(str::to_owned);

        if !self
            .store()
            .container_exists(vault)
            .await
            .map_err(store_error)?
        {
            return Err(GlacierError::not_found("vault", vault));
        }

        let archive_id = uuid::Uuid::new_v4().to_string();
        let session = self
            .store()
            .initiate_multipart(vault, &archive_id)
            .await
            .map_err(store_error)?;
        let upload_id = session.id.clone();

        self.state().uploads.insert(
            vault,
            &upload_id,
            UploadRecord {
                archive_id,
                part_size,
                description,
                creation_date: chrono::Utc::now(),
                session,
                parts: std::collections::BTreeMap::new(),
            },
        );

        info!(vault, upload_id = %upload_id, part_size, "initiated multipart upload");

        let builder = http::Response::builder()
            .status(StatusCode::CREATED)
            .header(
                http::header::LOCATION,
                format!(
                    "/{}/vaults/{vault}/multipart-uploads/{upload_id}",
                    account.as_str()
                ),
            )
            .header("x-amz-multipart-upload-id", &upload_id);
        build_response(builder, GlacierResponseBody::empty())
    }

    /// Upload one part of an open multipart upload.
    ///
    /// Re-uploading a range replaces the previous part. An upload holds at
    /// most [`MAX_PARTS`] distinct parts.
    pub(crate) async fn upload_part(
        &self,
        vault: &str,
        id: &str,
        parts: &http::request::Parts,
        body: Bytes,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        require_header(parts, CONTENT_HASH_HEADER)?;
        let tree_hash = require_header(parts, TREE_HASH_HEADER)?.to_owned();
        let range_header = require_header(parts, "Content-Range")?;
        let (start, end) = parse_content_range(range_header).ok_or_else(|| {
            GlacierError::bad_request(format!("Invalid Content-Range header: {range_header}"))
        })?;

        let record = self
            .state()
            .uploads
            .get(vault, id)
            .ok_or_else(|| GlacierError::not_found("upload", id))?;

        let size = end - start + 1;
        if size > record.part_size {
            return Err(GlacierError::bad_request(format!(
                "Part size {size} exceeds declared part size {}",
                record.part_size
            )));
        }
        if start % record.part_size != 0 {
            return Err(GlacierError::bad_request(format!(
                "Range start {start} is not aligned to part size {}",
                record.part_size
            )));
        }
        let part_number = u32::try_from(start / record.part_size + 1)
            .map_err(|_| GlacierError::bad_request(format!("Range start {start} is out of range")))?;

        self.store()
            .upload_part(&record.session, part_number, body)
            .await
            .map_err(|err| session_error(err, id))?;

        let recorded = self
            .state()
            .uploads
            .update(vault, id, |record| {
                if !record.parts.contains_key(&part_number) && record.parts.len() >= MAX_PARTS {
                    return false;
                }
                record.parts.insert(
                    part_number,
                    UploadPart {
                        tree_hash: tree_hash.clone(),
                        size,
                    },
                );
                true
            })
            .ok_or_else(|| GlacierError::not_found("upload", id))?;
        if !recorded {
            return Err(GlacierError::bad_request("Too many parts"));
        }

        let mut resp = empty_response(StatusCode::NO_CONTENT)?;
        let hash = tree_hash
            .parse()
            .map_err(|_| GlacierError::bad_request("Invalid tree hash header value"))?;
        resp.headers_mut().insert(TREE_HASH_HEADER, hash);
        Ok(resp)
    }

    /// List the recorded parts of an open upload, in part-number order.
    pub(crate) async fn list_parts(
        &self,
        account: &AccountId,
        vault: &str,
        id: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let record = self
            .state()
            .uploads
            .get(vault, id)
            .ok_or_else(|| GlacierError::not_found("upload", id))?;

        let mut offset: u64 = 0;
        let mut entries = Vec::with_capacity(record.parts.len());
        for part in record.parts.values() {
            entries.push(PartEntry {
                range_in_bytes: format!("{offset}-{}", offset + part.size - 1),
                sha256_tree_hash: part.tree_hash.clone(),
            });
            offset += part.size;
        }

        json_response(
            StatusCode::OK,
            &PartList {
                archive_description: record.description.clone(),
                creation_date: format_timestamp(&record.creation_date),
                marker: None,
                multipart_upload_id: id.to_owned(),
                part_size_in_bytes: record.part_size,
                parts: entries,
                vault_arn: vault_arn(account.as_str(), vault),
            },
        )
    }

    /// List the vault's in-progress uploads as a single page.
    pub(crate) async fn list_uploads(
        &self,
        account: &AccountId,
        vault: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        if !self
            .store()
            .container_exists(vault)
            .await
            .map_err(store_error)?
        {
            return Err(GlacierError::not_found("vault", vault));
        }

        let mut records = self.state().uploads.list(vault);
        records.sort_by(|(a, _), (b, _)| a.cmp(b));
        let uploads = records
            .into_iter()
            .map(|(upload_id, record)| UploadEntry {
                archive_description: record.description,
                creation_date: format_timestamp(&record.creation_date),
                multipart_upload_id: upload_id,
                part_size_in_bytes: record.part_size,
                vault_arn: vault_arn(account.as_str(), vault),
            })
            .collect();

        json_response(
            StatusCode::OK,
            &UploadList {
                marker: None,
                uploads,
            },
        )
    }

    /// Assemble an upload's parts into the final archive blob.
    pub(crate) async fn complete_upload(
        &self,
        account: &AccountId,
        vault: &str,
        id: &str,
        parts: &http::request::Parts,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let declared_size = require_header(parts, ARCHIVE_SIZE_HEADER)?;
        let declared_size: u64 = declared_size.parse().map_err(|_| {
            GlacierError::bad_request(format!("Invalid archive size: {declared_size}"))
        })?;
        require_header(parts, TREE_HASH_HEADER)?;

        let record = self
            .state()
            .uploads
            .get(vault, id)
            .ok_or_else(|| GlacierError::not_found("upload", id))?;

        // Every part except the last must fill the declared part size.
        let last = record.parts.keys().next_back().copied();
        for (number, part) in &record.parts {
            if Some(*number) != last && part.size != record.part_size {
                return Err(GlacierError::bad_request(format!(
                    "Part {number} has size {} instead of {}",
                    part.size, record.part_size
                )));
            }
        }
        let total: u64 = record.parts.values().map(|part| part.size).sum();
        if total != declared_size {
            return Err(GlacierError::bad_request(format!(
                "Uploaded size {total} does not match declared archive size {declared_size}"
            )));
        }

        self.store()
            .complete_multipart(&record.session)
            .await
            .map_err(|err| session_error(err, id))?;
        let _ = self.state().uploads.remove(vault, id);

        info!(
            vault,
            upload_id = id,
            archive_id = %record.archive_id,
            size = total,
            "completed multipart upload"
        );

        let builder = http::Response::builder()
            .status(StatusCode::CREATED)
            .header(
                http::header::LOCATION,
                format!(
                    "/{}/vaults/{vault}/archives/{}",
                    account.as_str(),
                    record.archive_id
                ),
            )
            .header("x-amz-archive-id", &record.archive_id);
        build_response(builder, GlacierResponseBody::empty())
    }

    /// Abort an upload, discarding its parts.
    pub(crate) async fn abort_upload(
        &self,
        vault: &str,
        id: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let record = self
            .state()
            .uploads
            .remove(vault, id)
            .ok_or_else(|| GlacierError::not_found("upload", id))?;

        match self.store().abort_multipart(&record.session).await {
            Ok(()) | Err(BlobStoreError::SessionNotFound(_)) => {}
            Err(other) => return Err(store_error(other)),
        }

        info!(vault, upload_id = id, "aborted multipart upload");
        empty_response(StatusCode::NO_CONTENT)
    }
}
