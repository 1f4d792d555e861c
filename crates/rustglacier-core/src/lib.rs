//! Core types, configuration, and state management for RustGlacier.
//!
//! This crate provides the foundational building blocks shared across the
//! RustGlacier emulator: vault-scoped concurrent state storage, environment
//! driven configuration, and the account identifier type.

mod config;
mod error;
mod state;
mod types;

pub use config::GlacierConfig;
pub use error::{GlacierCoreError, GlacierCoreResult};
pub use state::VaultScopedStore;
pub use types::AccountId;
