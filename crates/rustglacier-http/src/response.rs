//! Response construction helpers.
//!
//! JSON payloads are serialized from the typed structs in
//! `rustglacier-model`; errors are rendered as the protocol's
//! `{code, message, type}` body. Every JSON response carries
//! `Content-Type: application/json` and an explicit `Content-Length`.

use bytes::Bytes;
use rustglacier_model::GlacierError;

use crate::body::GlacierResponseBody;

/// Build a response from a builder, converting build errors to
/// [`GlacierError`].
pub fn build_response(
    builder: http::response::Builder,
    body: GlacierResponseBody,
) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
    builder
        .body(body)
        .map_err(|e| GlacierError::internal(format!("failed to build HTTP response: {e}")))
}

/// Build a JSON response with the given status code.
pub fn json_response<T: serde::Serialize>(
    status: http::StatusCode,
    payload: &T,
) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
    let body = serde_json::to_vec(payload)
        .map_err(|e| GlacierError::internal(format!("failed to serialize response body: {e}")))?;
    let builder = http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::CONTENT_LENGTH, body.len());
    build_response(builder, GlacierResponseBody::from_bytes(body))
}

/// Build a header-only response with the given status code.
pub fn empty_response(
    status: http::StatusCode,
) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
    build_response(
        http::Response::builder().status(status),
        GlacierResponseBody::empty(),
    )
}

/// Build a raw byte response, used for archive retrieval output.
pub fn bytes_response(
    data: Bytes,
) -> Result<http::Response<GlacierResponseBody>, GlacierError> {
    let builder = http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/octet-stream")
        .header(http::header::CONTENT_LENGTH, data.len());
    build_response(builder, GlacierResponseBody::from_bytes(data))
}

/// Convert a [`GlacierError`] into an HTTP error response with a JSON body.
#[must_use]
pub fn error_to_response(err: &GlacierError) -> http::Response<GlacierResponseBody> {
    let body = err.body_json();

    http::Response::builder()
        .status(err.status_code)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::CONTENT_LENGTH, body.len())
        .body(GlacierResponseBody::from_string(body))
        .unwrap_or_else(|_| {
            http::Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(GlacierResponseBody::empty())
                .expect("static response should be valid")
        })
}
