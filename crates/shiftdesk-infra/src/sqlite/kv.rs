//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `shiftdesk-core` using sqlx with split
//! read/write pools. Values are opaque text; an optional size cap mirrors
//! the quota of browser storage.

use chrono::Utc;
use sqlx::Row;

use shiftdesk_core::storage::kv_store::KvStore;
use shiftdesk_types::error::StoreError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
pub struct SqliteKvStore {
    pool: DatabasePool,
    max_value_bytes: Option<usize>,
}

impl SqliteKvStore {
    /// Create a store with no value size limit.
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            max_value_bytes: None,
        }
    }

    /// Create a store that refuses values larger than `max_value_bytes`.
    pub fn with_quota(pool: DatabasePool, max_value_bytes: usize) -> Self {
        Self {
            pool,
            max_value_bytes: Some(max_value_bytes),
        }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(backend)?;

        row.map(|row| row.try_get::<String, _>("value").map_err(backend))
            .transpose()
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

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO kv_store (key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(backend)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;
    use shiftdesk_core::draft::{DraftLifecycle, DraftStore};
    use shiftdesk_types::report::{FormState, ShiftReport};

    async fn temp_pool(dir: &tempfile::TempDir) -> DatabasePool {
        let url = format!("{}?mode=rwc", database_url(dir.path()));
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteKvStore::new(temp_pool(&dir).await);

        assert!(store.get("report-drafts").await.unwrap().is_none());

        store.set("report-drafts", "[]").await.unwrap();
        store.set("report-drafts", "[1]").await.unwrap();
        assert_eq!(
            store.get("report-drafts").await.unwrap().as_deref(),
            Some("[1]")
        );

        store.remove("report-drafts").await.unwrap();
        assert!(store.get("report-drafts").await.unwrap().is_none());
        store.remove("report-drafts").await.unwrap();
    }

    #[tokio::test]
    async fn test_quota_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteKvStore::with_quota(temp_pool(&dir).await, 8);

        store.set("k", "12345678").await.unwrap();
        let err = store.set("k", "123456789").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 9, limit: 8 }));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("12345678"));
    }

    #[tokio::test]
    async fn test_drafts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let state = FormState::Shift(ShiftReport {
            location: "Loc-1".to_string(),
            ..ShiftReport::default()
        });

        let id = {
            let store = SqliteKvStore::new(temp_pool(&dir).await);
            let lifecycle = DraftLifecycle::new(DraftStore::new(store, "report-drafts"));
            lifecycle.maybe_save(&state, None).await.unwrap().unwrap()
        };

        let store = SqliteKvStore::new(temp_pool(&dir).await);
        let lifecycle = DraftLifecycle::new(DraftStore::new(store, "report-drafts"));
        assert_eq!(lifecycle.load(&id).await, Some(state));
    }
}
