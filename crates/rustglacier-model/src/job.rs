//! Job request and response payloads.
//!
//! Jobs complete instantly in the emulator, so every job rendered on the
//! wire carries the fixed `Succeeded` status with identical creation and
//! completion timestamps.

/// The two job types Glacier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Retrieve the bytes of a single archive.
    ArchiveRetrieval,
    /// Produce a listing of the vault's archives.
    InventoryRetrieval,
}

impl JobKind {
    /// Parse the `Type` field of a job submission payload.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "archive-retrieval" => Some(Self::ArchiveRetrieval),
            "inventory-retrieval" => Some(Self::InventoryRetrieval),
            _ => None,
        }
    }

    /// The `Action` string rendered in job responses.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::ArchiveRetrieval => "ArchiveRetrieval",
            Self::InventoryRetrieval => "InventoryRetrieval",
        }
    }
}

/// A job submission payload (`POST .../jobs`).
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct JobSubmitRequest {
    /// The job type, `archive-retrieval` or `inventory-retrieval`.
    #[serde(rename = "Type")]
    pub job_type: Option<String>,
    /// The archive to retrieve. Required for archive retrieval jobs.
    #[serde(rename = "ArchiveId")]
    pub archive_id: Option<String>,
    /// Free-form job description, echoed back in job responses.
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Notification topic, echoed back in job responses.
    #[serde(rename = "SNSTopic")]
    pub sns_topic: Option<String>,
    /// Inventory retrieval parameters, echoed back verbatim.
    #[serde(rename = "InventoryRetrievalParameters")]
    pub inventory_parameters: Option<serde_json::Value>,
}

/// Fields shared by every job rendered on the wire.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobStatus {
    /// The job action, `ArchiveRetrieval` or `InventoryRetrieval`.
    #[serde(rename = "Action")]
    pub action: &'static str,
    /// Always `true`: jobs complete at submission time.
    #[serde(rename = "Completed")]
    pub completed: bool,
    /// Completion timestamp, identical to the creation timestamp.
    #[serde(rename = "CompletionDate")]
    pub completion_date: String,
    /// Creation timestamp.
    #[serde(rename = "CreationDate")]
    pub creation_date: String,
    /// The description supplied at submission, if any.
    #[serde(rename = "JobDescription")]
    pub job_description: Option<String>,
    /// The job identifier.
    #[serde(rename = "JobId")]
    pub job_id: String,
    /// The notification topic supplied at submission, if any.
    #[serde(rename = "SNSTopic")]
    pub sns_topic: Option<String>,
    /// Always `Succeeded`.
    #[serde(rename = "StatusCode")]
    pub status_code: &'static str,
    /// Always `Succeeded`.
    #[serde(rename = "StatusMessage")]
    pub status_message: &'static str,
    /// The owning vault's ARN.
    #[serde(rename = "VaultARN")]
    pub vault_arn: String,
}

/// A single job in a `ListJobs` response. Type-specific fields are only
/// present for the matching job kind.
#[derive(Debug, serde::Serialize)]
pub struct JobEntry {
    /// Shared job fields.
    #[serde(flatten)]
    pub status: JobStatus,
    /// Archive retrieval: the target archive.
    #[serde(rename = "ArchiveId", skip_serializing_if = "Option::is_none")]
    pub archive_id: Option<String>,
    /// Archive retrieval: the archive's current size.
    #[serde(rename = "ArchiveSizeInBytes", skip_serializing_if = "Option::is_none")]
    pub archive_size_in_bytes: Option<u64>,
    /// Archive retrieval: the full byte range of the archive.
    #[serde(rename = "RetrievalByteRange", skip_serializing_if = "Option::is_none")]
    pub retrieval_byte_range: Option<String>,
    /// Inventory retrieval: inventory size is not tracked, reported as -1.
    #[serde(rename = "InventorySizeInBytes", skip_serializing_if = "Option::is_none")]
    pub inventory_size_in_bytes: Option<i64>,
    /// Inventory retrieval: the parameters echoed from submission, tagged
    /// with `Format: "JSON"`.
    #[serde(
        rename = "InventoryRetrievalParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub inventory_retrieval_parameters: Option<serde_json::Value>,
}

/// Response body for `ListJobs`. Always a single page.
#[derive(Debug, serde::Serialize)]
pub struct JobList {
    /// The jobs.
    #[serde(rename = "JobList")]
    pub jobs: Vec<JobEntry>,
    /// Pagination marker, always `null`.
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
}

/// Response body for `DescribeJob`. Unlike list entries, the describe body
/// always carries the type-specific keys, with `null` for the ones that do
/// not apply.
#[derive(Debug, serde::Serialize)]
pub struct JobDetails {
    /// Shared job fields.
    #[serde(flatten)]
    pub status: JobStatus,
    /// The target archive for archive retrieval jobs.
    #[serde(rename = "ArchiveId")]
    pub archive_id: Option<String>,
    /// The archive's current size for archive retrieval jobs.
    #[serde(rename = "ArchiveSizeInBytes")]
    pub archive_size_in_bytes: Option<u64>,
    /// Placeholder archive tree hash for archive retrieval jobs.
    #[serde(rename = "ArchiveSHA256TreeHash")]
    pub archive_sha256_tree_hash: Option<String>,
    /// Inventory size, not tracked.
    #[serde(rename = "InventorySizeInBytes")]
    pub inventory_size_in_bytes: Option<i64>,
    /// The full byte range for archive retrieval jobs.
    #[serde(rename = "RetrievalByteRange")]
    pub retrieval_byte_range: Option<String>,
    /// Output tree hash, never computed.
    #[serde(rename = "SHA256TreeHash")]
    pub sha256_tree_hash: Option<String>,
}

/// A single archive in an inventory retrieval job's output.
#[derive(Debug, serde::Serialize)]
pub struct InventoryEntry {
    /// The archive identifier (blob name).
    #[serde(rename = "ArchiveId")]
    pub archive_id: String,
    /// When the archive's blob was created.
    #[serde(rename = "CreationDate")]
    pub creation_date: String,
    /// The archive's size in bytes.
    #[serde(rename = "Size")]
    pub size: u64,
}

/// Output body of an inventory retrieval job, computed fresh at read time.
#[derive(Debug, serde::Serialize)]
pub struct Inventory {
    /// The vault's current archives.
    #[serde(rename = "ArchiveList")]
    pub archives: Vec<InventoryEntry>,
    /// When this inventory was produced.
    #[serde(rename = "InventoryDate")]
    pub inventory_date: String,
    /// The owning vault's ARN.
    #[serde(rename = "VaultARN")]
    pub vault_arn: String,
}

/// Validated query parameters accepted by `ListJobs`.
///
/// `limit` and `marker` are validated but otherwise ignored: the emulator
/// always returns a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListJobsOptions {
    /// The `completed` filter.
    pub completed: Option<bool>,
    /// The `statuscode` filter.
    pub status_code: Option<String>,
    /// The `limit` parameter, 1 to 1000.
    pub limit: Option<u32>,
    /// The `marker` parameter.
    pub marker: Option<String>,
}

impl ListJobsOptions {
    /// Parse and validate a raw query string.
    ///
    /// # Errors
    /// Returns a message naming the offending parameter when a value is
    /// out of range or unrecognized.
    pub fn from_query(query: &str) -> Result<Self, String> {
        let mut options = Self::default();

        for pair in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "completed" => match value {
                    "true" => options.completed = Some(true),
                    "false" => options.completed = Some(false),
                    _ => return Err(format!("Invalid completed parameter: {value}")),
                },
                "statuscode" => match value {
                    "Succeeded" | "InProgress" | "Failed" => {
                        options.status_code = Some(value.to_owned());
                    }
                    _ => return Err(format!("Invalid statuscode parameter: {value}")),
                },
                "limit" => match value.parse::<u32>() {
                    Ok(limit) if (1..=1000).contains(&limit) => options.limit = Some(limit),
                    _ => return Err(format!("Invalid limit parameter: {value}")),
                },
                "marker" => options.marker = Some(value.to_owned()),
                _ => {}
            }
        }

        Ok(options)
    }

    /// Whether these filters can never match an emulated job. Every job is
    /// `Completed` with status `Succeeded`, so filtering on anything else
    /// yields an empty list.
    #[must_use]
    pub fn excludes_all_jobs(&self) -> bool {
        self.completed == Some(false)
            || self
                .status_code
                .as_deref()
                .is_some_and(|code| code != "Succeeded")
    }
}
