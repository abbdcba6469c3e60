//! Draft lifecycle: when to save, which id to save under, and how to get
//! the form back.
//!
//! The controller owns no session state. Callers hand in the current draft
//! id and receive the id to use next time; [`super::session::DraftSession`]
//! is the usual caller.

use chrono::Utc;

use shiftdesk_types::draft::{Draft, DraftId, DraftSummary, ReportKind};
use shiftdesk_types::error::{DraftError, StoreError};
use shiftdesk_types::report::FormState;

use super::attachments::{decode_payload, encode_payload};
use super::store::DraftStore;
use crate::storage::kv_store::KvStore;

/// Result of one save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The form had nothing worth saving; the store was not touched.
    Skipped,
    /// The draft was written. `created` is true when this save assigned the id.
    Saved { draft_id: DraftId, created: bool },
    /// The backend refused the write for a reason other than quota.
    Failed,
}

/// Decides when form state becomes a draft and restores drafts into forms.
pub struct DraftLifecycle<K> {
    store: DraftStore<K>,
}

impl<K: KvStore> DraftLifecycle<K> {
    pub fn new(store: DraftStore<K>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DraftStore<K> {
        &self.store
    }

    /// Save `state` as a draft if it has meaningful content.
    ///
    /// Reuses `current` when given, otherwise allocates a fresh id. Only a
    /// full store is reported as an error.
    pub async fn save(
        &self,
        state: &FormState,
        current: Option<&DraftId>,
    ) -> Result<SaveOutcome, DraftError> {
        let kind = state.kind();
        if !state.has_content() {
            tracing::trace!(%kind, "form has no content, skipping autosave");
            return Ok(SaveOutcome::Skipped);
        }

        let (draft_id, created) = match current {
            Some(id) => (id.clone(), false),
            None => (DraftId::generate(), true),
        };

        let payload = encode_payload(state).await;
        let draft = Draft::new(draft_id.clone(), payload, Utc::now());

        match self.store.upsert(draft).await {
            Ok(_) => {
                tracing::info!(draft_id = %draft_id, %kind, created, "draft saved");
                Ok(SaveOutcome::Saved { draft_id, created })
            }
            Err(StoreError::QuotaExceeded { needed, limit }) => {
                tracing::warn!(draft_id = %draft_id, %kind, needed, limit, "draft storage is full");
                Err(DraftError::StorageFull { needed, limit })
            }
            Err(e) => {
                tracing::warn!(draft_id = %draft_id, %kind, error = %e, "failed to save draft");
                Ok(SaveOutcome::Failed)
            }
        }
    }

    /// Save if there is content; return the id to carry into the next save.
    ///
    /// When nothing is written, `current` comes back unchanged.
    pub async fn maybe_save(
        &self,
        state: &FormState,
        current: Option<DraftId>,
    ) -> Result<Option<DraftId>, DraftError> {
        match self.save(state, current.as_ref()).await? {
            SaveOutcome::Saved { draft_id, .. } => Ok(Some(draft_id)),
            SaveOutcome::Skipped | SaveOutcome::Failed => Ok(current),
        }
    }

    /// Load a draft back into live form state.
    pub async fn load(&self, id: &DraftId) -> Option<FormState> {
        let Some(draft) = self.store.get(id).await else {
            tracing::debug!(draft_id = %id, "draft not found");
            return None;
        };
        tracing::debug!(draft_id = %id, kind = %draft.kind(), "draft loaded");
        Some(decode_payload(draft.payload))
    }

    /// Delete a draft. Returns whether it existed.
    ///
    /// Backend failures are logged and reported as `false`.
    pub async fn discard(&self, id: &DraftId) -> bool {
        match self.store.remove(id).await {
            Ok(removed) => {
                if removed {
                    tracing::info!(draft_id = %id, "draft discarded");
                }
                removed
            }
            Err(e) => {
                tracing::warn!(draft_id = %id, error = %e, "failed to discard draft");
                false
            }
        }
    }

    /// Full drafts, optionally narrowed to one report kind.
    pub async fn list(&self, kind: Option<ReportKind>) -> Vec<Draft> {
        self.store
            .list()
            .await
            .into_iter()
            .filter(|d| kind.is_none_or(|k| d.kind() == k))
            .collect()
    }

    /// Draft cards, most recently updated first.
    pub async fn list_summaries(&self, kind: Option<ReportKind>) -> Vec<DraftSummary> {
        self.store
            .list_summaries()
            .await
            .into_iter()
            .filter(|s| kind.is_none_or(|k| s.kind == k))
            .collect()
    }

    /// Delete every draft. Returns how many were removed.
    pub async fn purge(&self) -> Result<usize, StoreError> {
        let count = self.store.clear().await?;
        tracing::info!(count, "all drafts purged");
        Ok(count)
    }
}
