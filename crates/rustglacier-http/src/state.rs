//! Server-side state for jobs and in-progress multipart uploads.
//!
//! Both indices are transient and vault-scoped. [`GlacierState`] is the only
//! shared mutable resource in the protocol layer; handlers receive it
//! explicitly and re-resolve records by `(vault, id)` on every request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rustglacier_blobstore::MultipartSession;
use rustglacier_core::VaultScopedStore;
use rustglacier_model::job::JobKind;

/// An accepted job. Never mutated after insertion.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// The job type.
    pub kind: JobKind,
    /// The target archive for archive retrieval jobs.
    pub archive_id: Option<String>,
    /// The description supplied at submission.
    pub description: Option<String>,
    /// The notification topic supplied at submission.
    pub sns_topic: Option<String>,
    /// Inventory retrieval parameters, echoed back verbatim.
    pub inventory_parameters: Option<serde_json::Value>,
    /// When the job was accepted.
    pub creation_date: DateTime<Utc>,
    /// When the job completed. Always equals the creation date.
    pub completion_date: DateTime<Utc>,
}

/// A part recorded against an open multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// The tree hash the client supplied for the part.
    pub tree_hash: String,
    /// The part's size in bytes.
    pub size: u64,
}

/// An in-progress multipart upload.
///
/// Lives in the pending index from initiation until completion or abort,
/// at which point it is removed and the upload id stops resolving.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    /// The blob name the finished archive will be stored under.
    pub archive_id: String,
    /// The declared part size every non-final part must match.
    pub part_size: u64,
    /// The archive description supplied at initiation.
    pub description: Option<String>,
    /// When the upload was initiated.
    pub creation_date: DateTime<Utc>,
    /// The backing store's session handle.
    pub session: MultipartSession,
    /// Recorded parts keyed by part number. Re-uploading a part number
    /// replaces the entry.
    pub parts: BTreeMap<u32, UploadPart>,
}

/// Shared mutable state of the protocol layer: the job index and the
/// pending multipart upload index.
#[derive(Debug, Default)]
pub struct GlacierState {
    /// Accepted jobs by `(vault, job id)`.
    pub jobs: VaultScopedStore<JobRecord>,
    /// Pending multipart uploads by `(vault, upload id)`.
    pub uploads: VaultScopedStore<UploadRecord>,
}

impl GlacierState {
    /// Create empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
