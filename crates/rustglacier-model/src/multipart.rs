//! Multipart upload request parsing and response payloads.

/// The maximum number of parts a single upload may carry.
pub const MAX_PARTS: usize = 10_000;

/// Parse a part upload's `Content-Range` header of the exact form
/// `bytes {start}-{end}/*`, returning the inclusive byte range.
#[must_use]
pub fn parse_content_range(value: &str) -> Option<(u64, u64)> {
    let range = value.strip_prefix("bytes ")?.strip_suffix("/*")?;
    let (start, end) = range.split_once('-')?;
    let start: u64 = start.parse().ok()?;
    let end: u64 = end.parse().ok()?;
    if end < start {
        return None;
    }
    Some((start, end))
}

/// A single part in a `ListParts` response.
#[derive(Debug, serde::Serialize)]
pub struct PartEntry {
    /// The byte range the part covers, `start-end` inclusive.
    #[serde(rename = "RangeInBytes")]
    pub range_in_bytes: String,
    /// The tree hash the client supplied for the part.
    #[serde(rename = "SHA256TreeHash")]
    pub sha256_tree_hash: String,
}

/// Response body for `ListParts`.
#[derive(Debug, serde::Serialize)]
pub struct PartList {
    /// The archive description supplied at initiation, if any.
    #[serde(rename = "ArchiveDescription")]
    pub archive_description: Option<String>,
    /// When the upload was initiated.
    #[serde(rename = "CreationDate")]
    pub creation_date: String,
    /// Pagination marker, always `null`.
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
    /// The upload identifier.
    #[serde(rename = "MultipartUploadId")]
    pub multipart_upload_id: String,
    /// The declared part size.
    #[serde(rename = "PartSizeInBytes")]
    pub part_size_in_bytes: u64,
    /// The recorded parts in part-number order.
    #[serde(rename = "Parts")]
    pub parts: Vec<PartEntry>,
    /// The owning vault's ARN.
    #[serde(rename = "VaultARN")]
    pub vault_arn: String,
}

/// A single upload in a `ListMultipartUploads` response.
#[derive(Debug, serde::Serialize)]
pub struct UploadEntry {
    /// The archive description supplied at initiation, if any.
    #[serde(rename = "ArchiveDescription")]
    pub archive_description: Option<String>,
    /// When the upload was initiated.
    #[serde(rename = "CreationDate")]
    pub creation_date: String,
    /// The upload identifier.
    #[serde(rename = "MultipartUploadId")]
    pub multipart_upload_id: String,
    /// The declared part size.
    #[serde(rename = "PartSizeInBytes")]
    pub part_size_in_bytes: u64,
    /// The owning vault's ARN.
    #[serde(rename = "VaultARN")]
    pub vault_arn: String,
}

/// Response body for `ListMultipartUploads`. Always a single page.
#[derive(Debug, serde::Serialize)]
pub struct UploadList {
    /// Pagination marker, always `null`.
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
    /// The in-progress uploads.
    #[serde(rename = "UploadsList")]
    pub uploads: Vec<UploadEntry>,
}
