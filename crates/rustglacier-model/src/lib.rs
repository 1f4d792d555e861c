//! Glacier wire model for RustGlacier.
//!
//! Typed request options and response payloads for the Glacier REST API,
//! plus the error type that serializes to the protocol's
//! `{code, message, type}` JSON error body. Everything here mirrors what
//! Glacier clients put on and expect from the wire; server-side state lives
//! in `rustglacier-http`.

pub mod error;
pub mod job;
pub mod multipart;
mod time;
pub mod vault;

pub use error::{GlacierError, GlacierErrorKind};
pub use time::format_timestamp;
pub use vault::vault_arn;
