//! Vault-scoped concurrent state management.
//!
//! Provides [`VaultScopedStore`], a thread-safe store that partitions records
//! by vault name. Backs the job and multipart-upload indices, which only ever
//! address records through a `(vault, id)` pair.

use std::sync::Arc;

use dashmap::DashMap;

/// Thread-safe store of records partitioned by vault name.
///
/// Each vault gets its own isolated map of id to record, created lazily and
/// atomically on first insert. Uses `DashMap` for lock-free concurrent access.
///
/// # Examples
///
/// ```
/// use rustglacier_core::VaultScopedStore;
///
/// let store = VaultScopedStore::<u64>::new();
/// store.insert("my-vault", "job-1", 42);
/// assert_eq!(store.get("my-vault", "job-1"), Some(42));
/// assert_eq!(store.get("other-vault", "job-1"), None);
/// ```
#[derive(Debug)]
pub struct VaultScopedStore<T: Clone + Send + Sync> {
    inner: DashMap<String, Arc<DashMap<String, T>>>,
}

impl<T: Clone + Send + Sync> VaultScopedStore<T> {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Get or create the per-vault record map.
    fn vault_map(&self, vault: &str) -> Arc<DashMap<String, T>> {
        self.inner
            .entry(vault.to_owned())
            .or_insert_with(|| Arc::new(DashMap::new()))
            .clone()
    }

    /// Insert a record under the given vault and id.
    pub fn insert(&self, vault: &str, id: &str, record: T) {
        self.vault_map(vault).insert(id.to_owned(), record);
    }

    /// Get a clone of the record for the given vault and id, if present.
    #[must_use]
    pub fn get(&self, vault: &str, id: &str) -> Option<T> {
        self.inner
            .get(vault)
            .and_then(|map| map.get(id).map(|r| r.clone()))
    }

    /// Apply a mutation to the record in place, returning the closure's
    /// result, or `None` if the record does not exist.
    ///
    /// The record stays locked for the duration of the closure, so
    /// concurrent mutations of the same record serialize.
    pub fn update<R>(&self, vault: &str, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let map = self.inner.get(vault)?.clone();
        let mut entry = map.get_mut(id)?;
        Some(f(entry.value_mut()))
    }

    /// Remove the record for the given vault and id, returning it if present.
    #[must_use]
    pub fn remove(&self, vault: &str, id: &str) -> Option<T> {
        self.inner
            .get(vault)
            .and_then(|map| map.remove(id).map(|(_, v)| v))
    }

    /// Collect all `(id, record)` pairs for the given vault.
    #[must_use]
    pub fn list(&self, vault: &str) -> Vec<(String, T)> {
        self.inner
            .get(vault)
            .map(|map| {
                map.iter()
                    .map(|entry| (entry.key().clone(), entry.value().clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<T: Clone + Send + Sync> Default for VaultScopedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
