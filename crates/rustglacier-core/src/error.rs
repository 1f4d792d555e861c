//! Error types for the RustGlacier core.

/// Core error type for RustGlacier infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum GlacierCoreError {
    /// Invalid AWS account ID format.
    #[error("invalid account ID: {0} (must be a 12-digit numeric string or \"-\")")]
    InvalidAccountId(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for RustGlacier operations.
pub type GlacierCoreResult<T> = Result<T, GlacierCoreError>;
