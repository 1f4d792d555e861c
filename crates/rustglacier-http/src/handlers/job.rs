//! Job operations: submit, list, describe, and output retrieval.
//!
//! Jobs never run: a submission is validated, recorded, and immediately
//! considered complete. Output is computed fresh from the blob store at
//! read time, so an inventory job always reflects the vault's current
//! archives and an archive retrieval job streams the archive's current
//! bytes.

use bytes::Bytes;
use chrono::Utc;
use http::StatusCode;
use rustglacier_blobstore::BlobStore;
use rustglacier_core::AccountId;
use rustglacier_model::job::{
    Inventory, InventoryEntry, JobDetails, JobEntry, JobKind, JobList, JobStatus, JobSubmitRequest,
    ListJobsOptions,
};
use rustglacier_model::{GlacierError, format_timestamp, vault_arn};
use tracing::info;
use uuid::Uuid;

use crate::body::GlacierResponseBody;
use crate::handlers::archive::{METADATA_SUFFIX, TREE_HASH_HEADER};
use crate::handlers::{GlacierHandler, store_error};
use crate::response::{build_response, bytes_response, json_response};
use crate::state::JobRecord;

/// Placeholder tree hash reported for retrieval output. Real hashes are
/// never computed here.
const PLACEHOLDER_TREE_HASH: &str = "deadbeef";

/// Shared fields for a job rendered on the wire.
fn job_status(account: &AccountId, vault: &str, job_id: &str, record: &JobRecord) -> JobStatus {
    JobStatus {
        action: record.kind.action(),
        completed: true,
        completion_date: format_timestamp(&record.completion_date),
        creation_date: format_timestamp(&record.creation_date),
        job_description: record.description.clone(),
        job_id: job_id.to_owned(),
        sns_topic: record.sns_topic.clone(),
        status_code: "Succeeded",
        status_message: "Succeeded",
        vault_arn: vault_arn(account.as_str(), vault),
    }
}

/// Tag echoed inventory parameters with the output format.
fn inventory_parameters(record: &JobRecord) -> serde_json::Value {
    let mut params = record
        .inventory_parameters
        .clone()
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    if let Some(object) = params.as_object_mut() {
        object.insert(
            "Format".to_owned(),
            serde_json::Value::String("JSON".to_owned()),
        );
    } else {
        params = serde_json::json!({ "Format": "JSON" });
    }
    params
}

impl<S: BlobStore> GlacierHandler<S> {
    /// Accept a job submission. The job completes at submission time.
    pub(crate) async fn submit_job(
        &self,
        account: &AccountId,
        vault: &str,
        body: &Bytes,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let request: JobSubmitRequest = serde_json::from_slice(body)
            .map_err(|_| GlacierError::bad_request("Invalid job submission payload"))?;
        let kind = request
            .job_type
            .as_deref()
            .and_then(JobKind::parse)
            .ok_or_else(|| GlacierError::bad_request("Invalid job type"))?;

        if !self
            .store()
            .container_exists(vault)
            .await
            .map_err(store_error)?
        {
            return Err(GlacierError::not_found("vault", vault));
        }

        if kind == JobKind::ArchiveRetrieval {
            let archive_id = request
                .archive_id
                .as_deref()
                .ok_or_else(|| GlacierError::bad_request("ArchiveId is required"))?;
            if !self
                .store()
                .blob_exists(vault, archive_id)
                .await
                .map_err(store_error)?
            {
                return Err(GlacierError::not_found("archive", archive_id));
            }
        }

        let job_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        self.state().jobs.insert(
            vault,
            &job_id,
            JobRecord {
                kind,
                archive_id: request.archive_id,
                description: request.description,
                sns_topic: request.sns_topic,
                inventory_parameters: request.inventory_parameters,
                creation_date: now,
                completion_date: now,
            },
        );

        info!(vault, job_id = %job_id, action = kind.action(), "accepted job");

        let builder = http::Response::builder()
            .status(StatusCode::ACCEPTED)
            .header(
                http::header::LOCATION,
                format!("/{}/vaults/{vault}/jobs/{job_id}", account.as_str()),
            )
            .header("x-amz-job-id", &job_id);
        build_response(builder, GlacierResponseBody::empty())
    }

    /// List the vault's jobs as a single page, honoring the filters that
    /// can exclude the emulated always-succeeded jobs.
    pub(crate) async fn list_jobs(
        &self,
        account: &AccountId,
        vault: &str,
        query: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let options = ListJobsOptions::from_query(query).map_err(GlacierError::bad_request)?;

        if !self
            .store()
            .container_exists(vault)
            .await
            .map_err(store_error)?
        {
            return Err(GlacierError::not_found("vault", vault));
        }

        if options.excludes_all_jobs() {
            return json_response(
                StatusCode::OK,
                &JobList {
                    jobs: vec![],
                    marker: None,
                },
            );
        }

        let mut jobs = Vec::new();
        for (job_id, record) in self.state().jobs.list(vault) {
            let entry = match record.kind {
                JobKind::ArchiveRetrieval => {
                    // The archive may have been deleted since submission;
                    // its size fields are then simply omitted.
                    let size = match record.archive_id.as_deref() {
                        Some(archive_id) => self
                            .store()
                            .blob_metadata(vault, archive_id)
                            .await
                            .ok()
                            .map(|info| info.size),
                        None => None,
                    };
                    JobEntry {
                        status: job_status(account, vault, &job_id, &record),
                        archive_id: record.archive_id.clone(),
                        archive_size_in_bytes: size,
                        retrieval_byte_range: size.map(|s| format!("0-{}", s.saturating_sub(1))),
                        inventory_size_in_bytes: None,
                        inventory_retrieval_parameters: None,
                    }
                }
                JobKind::InventoryRetrieval => JobEntry {
                    status: job_status(account, vault, &job_id, &record),
                    archive_id: None,
                    archive_size_in_bytes: None,
                    retrieval_byte_range: None,
                    inventory_size_in_bytes: Some(-1),
                    inventory_retrieval_parameters: Some(inventory_parameters(&record)),
                },
            };
            jobs.push(entry);
        }

        json_response(StatusCode::OK, &JobList { jobs, marker: None })
    }

    /// Describe a single job, with every type-specific key present.
    pub(crate) async fn describe_job(
        &self,
        account: &AccountId,
        vault: &str,
        id: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let record = self
            .state()
            .jobs
            .get(vault, id)
            .ok_or_else(|| GlacierError::not_found("job", id))?;

        let details = match record.kind {
            JobKind::ArchiveRetrieval => {
                let archive_id = record
                    .archive_id
                    .clone()
                    .ok_or_else(|| GlacierError::internal("archive retrieval job without id"))?;
                let info = self
                    .store()
                    .blob_metadata(vault, &archive_id)
                    .await
                    .map_err(store_error)?;
                JobDetails {
                    status: job_status(account, vault, id, &record),
                    archive_id: Some(archive_id),
                    archive_size_in_bytes: Some(info.size),
                    archive_sha256_tree_hash: Some(PLACEHOLDER_TREE_HASH.to_owned()),
                    inventory_size_in_bytes: None,
                    retrieval_byte_range: Some(format!("0-{}", info.size.saturating_sub(1))),
                    sha256_tree_hash: Some(PLACEHOLDER_TREE_HASH.to_owned()),
                }
            }
            JobKind::InventoryRetrieval => JobDetails {
                status: job_status(account, vault, id, &record),
                archive_id: None,
                archive_size_in_bytes: None,
                archive_sha256_tree_hash: None,
                inventory_size_in_bytes: Some(-1),
                retrieval_byte_range: None,
                sha256_tree_hash: None,
            },
        };

        json_response(StatusCode::OK, &details)
    }

    /// Fetch a completed job's output.
    ///
    /// Archive retrieval returns the archive bytes; inventory retrieval
    /// returns a JSON listing of the vault's archives, skipping the
    /// metadata side-blobs.
    pub(crate) async fn job_output(
        &self,
        account: &AccountId,
        vault: &str,
        id: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let record = self
            .state()
            .jobs
            .get(vault, id)
            .ok_or_else(|| GlacierError::not_found("job", id))?;

        match record.kind {
            JobKind::ArchiveRetrieval => {
                let archive_id = record
                    .archive_id
                    .as_deref()
                    .ok_or_else(|| GlacierError::internal("archive retrieval job without id"))?;
                let data = self
                    .store()
                    .get_blob(vault, archive_id)
                    .await
                    .map_err(store_error)?;
                let mut resp = bytes_response(data)?;
                let hash = PLACEHOLDER_TREE_HASH
                    .parse()
                    .map_err(|_| GlacierError::internal("invalid tree hash header value"))?;
                resp.headers_mut().insert(TREE_HASH_HEADER, hash);
                Ok(resp)
            }
            JobKind::InventoryRetrieval => {
                let blobs = self.store().list_blobs(vault).await.map_err(store_error)?;
                let archives = blobs
                    .into_iter()
                    .filter(|blob| !blob.name.ends_with(METADATA_SUFFIX))
                    .map(|blob| InventoryEntry {
                        archive_id: blob.name,
                        creation_date: format_timestamp(&blob.creation_date),
                        size: blob.size,
                    })
                    .collect();
                json_response(
                    StatusCode::OK,
                    &Inventory {
                        archives,
                        inventory_date: format_timestamp(&Utc::now()),
                        vault_arn: vault_arn(account.as_str(), vault),
                    },
                )
            }
        }
    }
}
