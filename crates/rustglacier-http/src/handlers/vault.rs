//! Vault operations: list, describe, create, delete.

use http::StatusCode;
use rustglacier_blobstore::{BlobStore, ContainerInfo};
use rustglacier_core::AccountId;
use rustglacier_model::vault::{VaultDescription, VaultList, vault_arn};
use rustglacier_model::{GlacierError, format_timestamp};
use tracing::info;

use crate::body::GlacierResponseBody;
use crate::handlers::{GlacierHandler, store_error};
use crate::response::{build_response, empty_response, json_response};

/// Render a container as a vault description.
fn describe(account: &AccountId, container: &ContainerInfo) -> VaultDescription {
    let created = format_timestamp(&container.creation_date);
    VaultDescription {
        creation_date: created.clone(),
        last_inventory_date: Some(created),
        number_of_archives: 0,
        size_in_bytes: -1,
        vault_arn: vault_arn(account.as_str(), &container.name),
        vault_name: container.name.clone(),
    }
}

impl<S: BlobStore> GlacierHandler<S> {
    /// List all vaults as a single page.
    pub(crate) async fn list_vaults(
        &self,
        account: &AccountId,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let containers = self.store().list_containers().await.map_err(store_error)?;
        let vaults = containers
            .iter()
            .map(|container| describe(account, container))
            .collect();
        json_response(
            StatusCode::OK,
            &VaultList {
                marker: None,
                vaults,
            },
        )
    }

    /// Describe a single vault.
    pub(crate) async fn describe_vault(
        &self,
        account: &AccountId,
        name: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        let container = self
            .store()
            .container_metadata(name)
            .await
            .map_err(store_error)?;
        json_response(StatusCode::OK, &describe(account, &container))
    }

    /// Create a vault. Idempotent: re-creating an existing vault succeeds.
    pub(crate) async fn create_vault(
        &self,
        account: &AccountId,
        name: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        self.store()
            .create_container(name)
            .await
            .map_err(store_error)?;
        info!(vault = name, "created vault");

        let builder = http::Response::builder()
            .status(StatusCode::CREATED)
            .header(
                http::header::LOCATION,
                format!("/{}/vaults/{name}", account.as_str()),
            );
        build_response(builder, GlacierResponseBody::empty())
    }

    /// Delete a vault. Refused while archives remain in it.
    pub(crate) async fn delete_vault(
        &self,
        name: &str,
    ) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
        self.store()
            .delete_container(name)
            .await
            .map_err(store_error)?;
        info!(vault = name, "deleted vault");
        empty_response(StatusCode::NO_CONTENT)
    }
}
