//! Vault response payloads.

/// Build the ARN for a vault, e.g.
/// `arn:aws:glacier::123456789012:vaults/my-vault`.
#[must_use]
pub fn vault_arn(account: &str, vault: &str) -> String {
    format!("arn:aws:glacier::{account}:vaults/{vault}")
}

/// A single vault in list and describe responses.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VaultDescription {
    /// When the vault's container was created.
    #[serde(rename = "CreationDate")]
    pub creation_date: String,
    /// Last inventory timestamp. The emulator reports the creation date.
    #[serde(rename = "LastInventoryDate")]
    pub last_inventory_date: Option<String>,
    /// Archive count. Not tracked by the emulator, reported as zero.
    #[serde(rename = "NumberOfArchives")]
    pub number_of_archives: u64,
    /// Total vault size. Not tracked by the emulator, reported as -1.
    #[serde(rename = "SizeInBytes")]
    pub size_in_bytes: i64,
    /// The vault's ARN.
    #[serde(rename = "VaultARN")]
    pub vault_arn: String,
    /// The vault name.
    #[serde(rename = "VaultName")]
    pub vault_name: String,
}

/// Response body for listing vaults. Always a single page.
#[derive(Debug, serde::Serialize)]
pub struct VaultList {
    /// Pagination marker, always `null`.
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
    /// The vaults.
    #[serde(rename = "VaultList")]
    pub vaults: Vec<VaultDescription>,
}
