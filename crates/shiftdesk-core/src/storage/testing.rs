//! Test doubles for the key-value store.

use std::sync::atomic::{AtomicBool, Ordering};

use shiftdesk_types::error::StoreError;

use super::kv_store::KvStore;
use super::memory::MemoryKvStore;

/// In-memory store whose next `get` can be made to fail, as a locked
/// database would.
#[derive(Debug, Default)]
pub(crate) struct FlakyKvStore {
    inner: MemoryKvStore,
    fail_get: AtomicBool,
}

impl FlakyKvStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make the next `get` return a backend error.
    pub(crate) fn fail_next_get(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }
}

impl KvStore for FlakyKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_get.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("database is locked".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }
}
