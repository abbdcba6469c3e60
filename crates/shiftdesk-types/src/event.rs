//! Event types for the autosave event bus.
//!
//! `AutosaveEvent` is broadcast by draft sessions after each save cycle.
//! All variants are Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::draft::{DraftId, ReportKind};

/// Outcome of one autosave cycle or session transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutosaveEvent {
    /// The draft was written to the store.
    Saved {
        draft_id: DraftId,
        kind: ReportKind,
        /// True when this cycle allocated the id.
        created: bool,
    },

    /// The form had nothing worth saving yet.
    Skipped { kind: ReportKind },

    /// The store refused the write because it is full. The user's latest
    /// changes are not persisted.
    StorageFull {
        kind: ReportKind,
        needed: usize,
        limit: usize,
    },

    /// The draft was deleted (submitted or cleared).
    Discarded { draft_id: DraftId },
}
