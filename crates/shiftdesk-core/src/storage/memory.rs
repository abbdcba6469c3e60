//! In-memory key-value store.
//!
//! Backs draft sessions in tests and in environments without a database.
//! Enforces the same optional value-size quota as the SQLite store.

use dashmap::DashMap;

use shiftdesk_types::error::StoreError;

use super::kv_store::KvStore;

/// `KvStore` over a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, String>,
    max_value_bytes: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses values larger than `max_value_bytes`.
    pub fn with_quota(max_value_bytes: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_value_bytes: Some(max_value_bytes),
        }
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.max_value_bytes {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
