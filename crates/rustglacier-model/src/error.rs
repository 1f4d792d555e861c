//! The Glacier error type and its JSON wire form.
//!
//! Every non-2xx Glacier response carries a JSON body of the shape
//! `{"code": ..., "message": ..., "type": "client" | "server"}`. This module
//! provides [`GlacierError`], which pairs that body with the HTTP status
//! code to send it under.

use std::fmt;

/// Whether the fault lies with the caller or the service.
///
/// Rendered as the `type` field of the JSON error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlacierErrorKind {
    /// The request was malformed or named a missing resource.
    Client,
    /// The service failed to carry out a well-formed request.
    Server,
}

impl GlacierErrorKind {
    /// The wire form of this fault class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for GlacierErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Glacier error response.
#[derive(Debug)]
pub struct GlacierError {
    /// The error code, e.g. `BadRequest` or `ResourceNotFoundException`.
    pub code: &'static str,
    /// A human-readable error message.
    pub message: String,
    /// Whether this is a client or server fault.
    pub kind: GlacierErrorKind,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for GlacierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlacierError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for GlacierError {}

/// Serialized form of the error body.
#[derive(Debug, serde::Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

impl GlacierError {
    /// Create a 400 BadRequest client error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BadRequest",
            message: message.into(),
            kind: GlacierErrorKind::Client,
            status_code: http::StatusCode::BAD_REQUEST,
        }
    }

    /// Create a 404 ResourceNotFoundException for the named resource class
    /// (`vault`, `archive`, `job`, `upload`) and identifier.
    #[must_use]
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self {
            code: "ResourceNotFoundException",
            message: format!("The {resource} was not found: {id}"),
            kind: GlacierErrorKind::Client,
            status_code: http::StatusCode::NOT_FOUND,
        }
    }

    /// Create a 405 MethodNotAllowed client error.
    #[must_use]
    pub fn method_not_allowed(method: impl fmt::Display) -> Self {
        Self {
            code: "MethodNotAllowed",
            message: format!("The {method} method is not allowed against this resource"),
            kind: GlacierErrorKind::Client,
            status_code: http::StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Create a 503 ServiceUnavailableException server error, used when the
    /// backing object store rejects an otherwise valid request.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "ServiceUnavailableException",
            message: message.into(),
            kind: GlacierErrorKind::Server,
            status_code: http::StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Create a 500 InternalFailure server error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "InternalFailure",
            message: message.into(),
            kind: GlacierErrorKind::Server,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Serialize the JSON error body for this error.
    #[must_use]
    pub fn body_json(&self) -> String {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
            kind: self.kind.as_str(),
        };
        // Serialization of three string fields cannot fail.
        serde_json::to_string(&body).unwrap_or_else(|_| {
            r#"{"code":"InternalFailure","message":"","type":"server"}"#.to_owned()
        })
    }
}
