//! Draft collection persistence.
//!
//! All drafts live in one JSON array under a single key of a [`KvStore`].
//! There is no per-record write: every mutation reads the whole collection,
//! changes it and writes it back. Mutations go through one async mutex so
//! concurrent sessions cannot interleave their read-modify-write cycles.
//!
//! Listing fails soft: a missing key, an unreadable backend or a blob that
//! is not a JSON array all read as an empty collection, and records that do
//! not parse as drafts are skipped. Mutations are stricter. A backend read
//! error aborts the write, and records this build cannot parse are carried
//! through unchanged.

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use shiftdesk_types::draft::{Draft, DraftId, DraftSummary};
use shiftdesk_types::error::StoreError;

use crate::storage::kv_store::KvStore;

/// Key-value backed store of the draft collection.
pub struct DraftStore<K> {
    kv: K,
    key: String,
    write_lock: Mutex<()>,
}

impl<K: KvStore> DraftStore<K> {
    /// Create a store keeping its collection under `key`.
    pub fn new(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All drafts as currently persisted, in stored order.
    pub async fn list(&self) -> Vec<Draft> {
        let text = match self.kv.get(&self.key).await {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read draft collection");
                return Vec::new();
            }
        };

        parse_records(&self.key, &text)
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Draft>(record) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "skipping unreadable draft record");
                    None
                }
            })
            .collect()
    }

    /// Look up one draft by id.
    pub async fn get(&self, id: &DraftId) -> Option<Draft> {
        self.list().await.into_iter().find(|d| &d.id == id)
    }

    /// Listing views, most recently updated first.
    pub async fn list_summaries(&self) -> Vec<DraftSummary> {
        let mut summaries: Vec<DraftSummary> =
            self.list().await.iter().map(Draft::summary).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    /// Insert or replace the draft with `draft.id`.
    ///
    /// Replacing keeps the stored `created_at` and refreshes `updated_at`;
    /// inserting sets both. Returns the draft as written.
    pub async fn upsert(&self, mut draft: Draft) -> Result<Draft, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_for_write().await?;
        let now = Utc::now();

        draft.updated_at = now;
        draft.created_at = now;
        let existing = records
            .iter()
            .position(|r| record_id(r) == Some(draft.id.as_str()));
        if let Some(pos) = existing {
            match serde_json::from_value::<Draft>(records[pos].clone()) {
                Ok(previous) => draft.created_at = previous.created_at,
                Err(e) => {
                    tracing::warn!(draft_id = %draft.id, error = %e, "replacing unreadable draft record");
                }
            }
        }

        let value = serde_json::to_value(&draft)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        match existing {
            Some(pos) => {
                records[pos] = value;
                // A damaged collection may repeat an id; keep only the first.
                let mut index = 0;
                records.retain(|r| {
                    let keep = index <= pos || record_id(r) != Some(draft.id.as_str());
                    index += 1;
                    keep
                });
            }
            None => records.push(value),
        }

        self.write(&records).await?;
        tracing::debug!(draft_id = %draft.id, kind = %draft.kind(), total = records.len(), "draft upserted");
        Ok(draft)
    }

    /// Remove the draft with `id`. Returns whether it existed.
    pub async fn remove(&self, id: &DraftId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_for_write().await?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id.as_str()));

        if records.len() == before {
            return Ok(false);
        }
        self.write(&records).await?;
        tracing::debug!(draft_id = %id, "draft removed");
        Ok(true)
    }

    /// Delete every draft. Returns how many records were removed.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let count = self.read_for_write().await?.len();
        self.kv.remove(&self.key).await?;
        Ok(count)
    }

    /// Read the raw collection for a mutation. Backend errors propagate.
    async fn read_for_write(&self) -> Result<Vec<Value>, StoreError> {
        Ok(match self.kv.get(&self.key).await? {
            Some(text) => parse_records(&self.key, &text),
            None => Vec::new(),
        })
    }

    async fn write(&self, records: &[Value]) -> Result<(), StoreError> {
        let text = serde_json::to_string(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.kv.set(&self.key, &text).await
    }
}

/// Split a stored blob into raw records. A blob that is not a JSON array
/// reads as empty.
fn parse_records(key: &str, text: &str) -> Vec<Value> {
    match serde_json::from_str(text) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(key, error = %e, "draft collection is corrupted, treating as empty");
            Vec::new()
        }
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}
