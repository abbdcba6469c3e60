//! Key-value store trait.
//!
//! The platform's generic persistent key-value API: string keys, string
//! values, get/set/remove. The draft store keeps its whole collection under
//! one key of this store. Implementations live in shiftdesk-infra (SQLite)
//! and in [`super::memory`].

use shiftdesk_types::error::StoreError;

/// Trait for persistent string key-value storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Set a value for a key, replacing any previous value.
    ///
    /// Implementations with a size cap return [`StoreError::QuotaExceeded`]
    /// and leave the previous value in place.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Remove a key. No-op if the key does not exist.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
