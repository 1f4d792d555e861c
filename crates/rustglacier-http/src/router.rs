//! Glacier request routing.
//!
//! Maps request paths onto typed route targets using ordered, structured
//! templates (most specific first):
//!
//! - `/{account}/vaults/{vault}/jobs[/{id}[/output]]`
//! - `/{account}/vaults/{vault}/archives[/{id}]`
//! - `/{account}/vaults/{vault}/multipart-uploads[/{id}]`
//! - `/{account}/vaults[/{name}]`
//!
//! Matching is segment-wise: each capture is validated against its segment
//! grammar as it is bound, so handlers only ever see well-formed names and
//! ids. Anything that fails to match yields the protocol's generic
//! `Unknown request` client error.

use rustglacier_core::AccountId;
use rustglacier_model::GlacierError;

/// The resource a routed request addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// The vault collection or a single vault.
    Vaults {
        /// The vault name, when the path addresses a single vault.
        name: Option<String>,
    },
    /// A vault's archive collection or a single archive.
    Archives {
        /// The owning vault.
        vault: String,
        /// The archive id, when present in the path.
        id: Option<String>,
    },
    /// A vault's job collection, a single job, or a job's output.
    Jobs {
        /// The owning vault.
        vault: String,
        /// The job id, when present in the path.
        id: Option<String>,
        /// Whether the path ends in `/output`.
        output: bool,
    },
    /// A vault's multipart upload collection or a single upload.
    MultipartUploads {
        /// The owning vault.
        vault: String,
        /// The upload id, when present in the path.
        id: Option<String>,
    },
}

/// A routed request: the account from the path plus the addressed resource.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The account id segment.
    pub account: AccountId,
    /// The addressed resource.
    pub target: RouteTarget,
}

/// Whether a path segment is a well-formed vault name.
fn is_valid_vault_name(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
}

/// Whether a path segment is a well-formed archive, job, or upload id.
fn is_valid_resource_id(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_'))
}

fn unknown_request() -> GlacierError {
    GlacierError::bad_request("Unknown request")
}

/// Resolve a request path to a typed [`RequestContext`].
///
/// # Errors
/// Returns the generic `Unknown request` client error when the path does
/// not match any route template.
pub fn resolve(path: &str) -> Result<RequestContext, GlacierError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let (&account_segment, rest) = segments.split_first().ok_or_else(unknown_request)?;
    let account = AccountId::new(account_segment).map_err(|_| unknown_request())?;

    let (&collection, rest) = rest.split_first().ok_or_else(unknown_request)?;
    if collection != "vaults" {
        return Err(unknown_request());
    }

    let target = match rest {
        [] => RouteTarget::Vaults { name: None },
        [name] if is_valid_vault_name(name) => RouteTarget::Vaults {
            name: Some((*name).to_owned()),
        },
        [name, resource, rest @ ..] if is_valid_vault_name(name) => {
            let vault = (*name).to_owned();
            match (*resource, rest) {
                ("archives", []) => RouteTarget::Archives { vault, id: None },
                ("archives", [id]) if is_valid_resource_id(id) => RouteTarget::Archives {
                    vault,
                    id: Some((*id).to_owned()),
                },
                ("jobs", []) => RouteTarget::Jobs {
                    vault,
                    id: None,
                    output: false,
                },
                ("jobs", [id]) if is_valid_resource_id(id) => RouteTarget::Jobs {
                    vault,
                    id: Some((*id).to_owned()),
                    output: false,
                },
                ("jobs", [id, "output"]) if is_valid_resource_id(id) => RouteTarget::Jobs {
                    vault,
                    id: Some((*id).to_owned()),
                    output: true,
                },
                ("multipart-uploads", []) => RouteTarget::MultipartUploads { vault, id: None },
                ("multipart-uploads", [id]) if is_valid_resource_id(id) => {
                    RouteTarget::MultipartUploads {
                        vault,
                        id: Some((*id).to_owned()),
                    }
                }
                _ => return Err(unknown_request()),
            }
        }
        _ => return Err(unknown_request()),
    };

    Ok(RequestContext { account, target })
}
