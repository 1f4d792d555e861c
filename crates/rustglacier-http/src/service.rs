//! The hyper service gluing routing and handlers together.
//!
//! [`GlacierHttpService`] collects the request body, then hands the
//! buffered request to [`process_request`], which performs the version
//! check, routing, and dispatch. Every response carries the emulator's
//! fixed request id header.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use rustglacier_blobstore::BlobStore;
use rustglacier_model::GlacierError;
use tracing::debug;

use crate::body::GlacierResponseBody;
use crate::handlers::{GlacierHandler, dispatch};
use crate::response::error_to_response;
use crate::router;

/// Required header naming the protocol version on every request.
pub const GLACIER_VERSION_HEADER: &str = "x-amz-glacier-version";

/// The only protocol version the emulator speaks.
pub const GLACIER_VERSION: &str = "2012-06-01";

/// Header naming the request id on every response.
const REQUEST_ID_HEADER: &str = "x-amzn-RequestId";

/// The fixed request id value. Real request tracking is out of scope.
const REQUEST_ID: &str = "glacier-proxy";

/// Hyper service serving the Glacier REST dialect.
pub struct GlacierHttpService<S: BlobStore> {
    handler: Arc<GlacierHandler<S>>,
}

impl<S: BlobStore> GlacierHttpService<S> {
    /// Create a service owning a fresh handler.
    #[must_use]
    pub fn new(handler: GlacierHandler<S>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Create a service over an already shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<GlacierHandler<S>>) -> Self {
        Self { handler }
    }
}

impl<S: BlobStore> Clone for GlacierHttpService<S> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S: BlobStore> fmt::Debug for GlacierHttpService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlacierHttpService").finish_non_exhaustive()
    }
}

impl<S: BlobStore> Service<http::Request<Incoming>> for GlacierHttpService<S> {
    type Response = http::Response<GlacierResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    let err =
                        GlacierError::internal(format!("failed to read request body: {e}"));
                    return Ok(with_request_id(error_to_response(&err)));
                }
            };

            let req = http::Request::from_parts(parts, body);
            let resp = process_request(&handler, req).await;
            Ok(with_request_id(resp))
        })
    }
}

/// Stamp the fixed request id onto a response.
fn with_request_id(
    mut resp: http::Response<GlacierResponseBody>,
) -> http::Response<GlacierResponseBody> {
    if let Ok(value) = REQUEST_ID.parse() {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

/// Process one buffered request end to end.
///
/// Requires the exact protocol version header, resolves the path to a
/// route target, and dispatches. Every failure renders as the protocol's
/// JSON error body.
pub async fn process_request<S: BlobStore>(
    handler: &GlacierHandler<S>,
    req: http::Request<Bytes>,
) -> http::Response<GlacierResponseBody> {
    let (parts, body) = req.into_parts();
    debug!(method = %parts.method, path = parts.uri.path(), "received request");

    let version = parts
        .headers
        .get(GLACIER_VERSION_HEADER)
        .and_then(|v| v.to_str().ok());
    if version != Some(GLACIER_VERSION) {
        return error_to_response(&GlacierError::bad_request(
            "Unsupported or missing API version",
        ));
    }

    let ctx = match router::resolve(parts.uri.path()) {
        Ok(ctx) => ctx,
        Err(err) => return error_to_response(&err),
    };

    dispatch(handler, ctx, parts, body)
        .await
        .unwrap_or_else(|err| error_to_response(&err))
}
