//! Per-resource Glacier request handlers.
//!
//! [`GlacierHandler`] holds the two collaborators every operation needs: the
//! blob store and the shared [`GlacierState`]. Each resource's operations
//! live in their own module as inherent methods on the handler;
//! [`dispatch`] maps a routed request onto the right one.

mod archive;
mod job;
mod multipart;
mod vault;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use rustglacier_blobstore::{BlobStore, BlobStoreError};
use rustglacier_model::GlacierError;
use tracing::debug;

use crate::body::GlacierResponseBody;
use crate::router::{RequestContext, RouteTarget};
use crate::state::GlacierState;

/// The Glacier business logic layer.
///
/// Cheap to share: holds `Arc`s to the blob store and the state indices.
pub struct GlacierHandler<S: BlobStore> {
    store: Arc<S>,
    state: Arc<GlacierState>,
}

impl<S: BlobStore> GlacierHandler<S> {
    /// Create a new handler over the given store and state.
    #[must_use]
    pub fn new(store: Arc<S>, state: Arc<GlacierState>) -> Self {
        Self { store, state }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn state(&self) -> &GlacierState {
        &self.state
    }
}

impl<S: BlobStore> fmt::Debug for GlacierHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlacierHandler").finish_non_exhaustive()
    }
}

impl<S: BlobStore> Clone for GlacierHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
        }
    }
}

/// Dispatch a routed request to the matching handler operation.
///
/// Verbs with no operation on the addressed resource yield a 405 client
/// error; collection-only operations invoked without the required name or
/// id yield the protocol's 400.
pub async fn dispatch<S: BlobStore>(
    handler: &GlacierHandler<S>,
    ctx: RequestContext,
    parts: http::request::Parts,
    body: Bytes,
) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
    let account = ctx.account;
    let method = parts.method.clone();
    debug!(%method, target = ?ctx.target, account = %account, "dispatching request");

    match ctx.target {
        RouteTarget::Vaults { name } => match (method, name) {
            (Method::GET, None) => handler.list_vaults(&account).await,
            (Method::GET, Some(name)) => handler.describe_vault(&account, &name).await,
            (Method::PUT, Some(name)) => handler.create_vault(&account, &name).await,
            (Method::DELETE, Some(name)) => handler.delete_vault(&name).await,
            (Method::PUT | Method::DELETE, None) => {
                Err(GlacierError::bad_request("Vault name is required"))
            }
            (method, _) => Err(GlacierError::method_not_allowed(method)),
        },
        RouteTarget::Archives { vault, id } => match (method, id) {
            (Method::POST, None) => handler.upload_archive(&account, &vault, &parts, body).await,
            (Method::DELETE, Some(id)) => handler.delete_archive(&vault, &id).await,
            (Method::DELETE, None) => Err(GlacierError::bad_request("Archive id is required")),
            (method, _) => Err(GlacierError::method_not_allowed(method)),
        },
        RouteTarget::Jobs { vault, id, output } => match (method, id, output) {
            (Method::POST, None, false) => handler.submit_job(&account, &vault, &body).await,
            (Method::GET, None, false) => {
                handler
                    .list_jobs(&account, &vault, parts.uri.query().unwrap_or(""))
                    .await
            }
            (Method::GET, Some(id), false) => handler.describe_job(&account, &vault, &id).await,
            (Method::GET, Some(id), true) => handler.job_output(&account, &vault, &id).await,
            (method, ..) => Err(GlacierError::method_not_allowed(method)),
        },
        RouteTarget::MultipartUploads { vault, id } => match (method, id) {
            (Method::POST, None) => handler.initiate_upload(&account, &vault, &parts).await,
            (Method::GET, None) => handler.list_uploads(&account, &vault).await,
            (Method::PUT, Some(id)) => handler.upload_part(&vault, &id, &parts, body).await,
            (Method::GET, Some(id)) => handler.list_parts(&account, &vault, &id).await,
            (Method::POST, Some(id)) => handler.complete_upload(&account, &vault, &id, &parts).await,
            (Method::DELETE, Some(id)) => handler.abort_upload(&vault, &id).await,
            (method, _) => Err(GlacierError::method_not_allowed(method)),
        },
    }
}

/// Map a blob store failure to its Glacier wire form.
///
/// Missing containers and blobs become typed 404s; a refused container
/// delete becomes the vault-not-empty 400; anything else means the backing
/// store failed us and surfaces as 503.
pub(crate) fn store_error(err: BlobStoreError) -> GlacierError {
    match err {
        BlobStoreError::ContainerNotFound(name) => GlacierError::not_found("vault", name),
        BlobStoreError::BlobNotFound { blob, .. } => GlacierError::not_found("archive", blob),
        BlobStoreError::ContainerNotEmpty(_) => GlacierError::bad_request("Vault not empty"),
        other => GlacierError::unavailable(other.to_string()),
    }
}

/// Fetch a header value, or the protocol's 400 naming the header.
pub(crate) fn require_header<'a>(
    parts: &'a http::request::Parts,
    name: &str,
) -> Result<&'a str, GlacierError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| GlacierError::bad_request(format!("Missing required header: {name}")))
}

/// Fetch an optional header value.
pub(crate) fn header_value<'a>(parts: &'a http::request::Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
