//! Glacier protocol translation layer for RustGlacier.
//!
//! Takes HTTP requests speaking the Glacier REST dialect, routes them to
//! per-resource handlers (vaults, archives, jobs, multipart uploads), and
//! renders the exact wire contract back: JSON bodies, `x-amz-*` headers,
//! and `{code, message, type}` error payloads. Storage goes through the
//! [`BlobStore`](rustglacier_blobstore::BlobStore) trait; job and upload
//! bookkeeping lives in [`GlacierState`](state::GlacierState).

pub mod body;
pub mod handlers;
pub mod response;
pub mod router;
pub mod service;
pub mod state;

pub use body::GlacierResponseBody;
pub use handlers::GlacierHandler;
pub use router::{RequestContext, RouteTarget};
pub use service::{GLACIER_VERSION, GLACIER_VERSION_HEADER, GlacierHttpService, process_request};
pub use state::GlacierState;
