//! One form-editing session with autosave.
//!
//! A `DraftSession` owns the current draft id of an open form, feeds form
//! changes through the debounced scheduler into the lifecycle controller,
//! and publishes what happened on the event bus.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use shiftdesk_types::config::DraftsConfig;
use shiftdesk_types::draft::{DraftId, ReportKind};
use shiftdesk_types::error::DraftError;
use shiftdesk_types::event::AutosaveEvent;
use shiftdesk_types::report::FormState;

use super::lifecycle::{DraftLifecycle, SaveOutcome};
use crate::autosave::{AutosaveScheduler, SaveTarget};
use crate::event::EventBus;
use crate::focus::FocusTracker;
use crate::storage::kv_store::KvStore;

/// Shared collaborators for every session of an application.
pub struct AutosaveContext<K> {
    pub lifecycle: Arc<DraftLifecycle<K>>,
    pub focus: Option<FocusTracker>,
    pub delay: Duration,
    pub events: EventBus,
}

impl<K> AutosaveContext<K> {
    /// Context with the configured delay, no focus tracking and a fresh bus.
    pub fn new(lifecycle: Arc<DraftLifecycle<K>>, config: &DraftsConfig) -> Self {
        Self {
            lifecycle,
            focus: None,
            delay: config.autosave_delay(),
            events: EventBus::default(),
        }
    }

    pub fn with_focus(mut self, focus: FocusTracker) -> Self {
        self.focus = Some(focus);
        self
    }
}

impl<K> Clone for AutosaveContext<K> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: Arc::clone(&self.lifecycle),
            focus: self.focus.clone(),
            delay: self.delay,
            events: self.events.clone(),
        }
    }
}

/// Form state tagged with the session generation it was captured in.
struct Change {
    generation: u64,
    state: FormState,
}

/// Per-session state shared with in-flight save cycles.
struct SessionSaver<K> {
    lifecycle: Arc<DraftLifecycle<K>>,
    events: EventBus,
    /// Held for a whole save so overlapping cycles agree on one id.
    current: Mutex<Option<DraftId>>,
    /// Bumped by complete/clear; changes from an older generation are dropped.
    generation: AtomicU64,
}

impl<K: KvStore + 'static> SaveTarget<Change> for SessionSaver<K> {
    async fn save(&self, change: Change) {
        let mut current = self.current.lock().await;
        if change.generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!("dropping change captured before the draft was discarded");
            return;
        }

        let kind = change.state.kind();
        match self.lifecycle.save(&change.state, current.as_ref()).await {
            Ok(SaveOutcome::Saved { draft_id, created }) => {
                *current = Some(draft_id.clone());
                self.events.publish(AutosaveEvent::Saved {
                    draft_id,
                    kind,
                    created,
                });
            }
            Ok(SaveOutcome::Skipped) => {
                self.events.publish(AutosaveEvent::Skipped { kind });
            }
            Ok(SaveOutcome::Failed) => {}
            Err(DraftError::StorageFull { needed, limit }) => {
                self.events
                    .publish(AutosaveEvent::StorageFull { kind, needed, limit });
            }
        }
    }
}

impl<K: KvStore + 'static> SessionSaver<K> {
    /// Start a new generation and delete the current draft, if any.
    async fn discard_current(&self) -> Option<DraftId> {
        let mut current = self.current.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        let id = current.take()?;
        if self.lifecycle.discard(&id).await {
            self.events.publish(AutosaveEvent::Discarded {
                draft_id: id.clone(),
            });
        }
        Some(id)
    }
}

/// Autosave binding for one open report form.
pub struct DraftSession<K> {
    kind: ReportKind,
    saver: Arc<SessionSaver<K>>,
    scheduler: AutosaveScheduler<Change, SessionSaver<K>>,
}

impl<K: KvStore + 'static> DraftSession<K> {
    /// Start editing a new, unsaved report.
    pub fn open(ctx: &AutosaveContext<K>, kind: ReportKind) -> Self {
        Self::with_id(ctx, kind, None)
    }

    /// Reopen a saved draft. Returns the session together with the restored
    /// form state, or `None` if the draft no longer exists.
    pub async fn resume(ctx: &AutosaveContext<K>, id: &DraftId) -> Option<(Self, FormState)> {
        let state = ctx.lifecycle.load(id).await?;
        let session = Self::with_id(ctx, state.kind(), Some(id.clone()));
        tracing::info!(draft_id = %id, kind = %state.kind(), "draft session resumed");
        Some((session, state))
    }

    fn with_id(ctx: &AutosaveContext<K>, kind: ReportKind, id: Option<DraftId>) -> Self {
        let saver = Arc::new(SessionSaver {
            lifecycle: Arc::clone(&ctx.lifecycle),
            events: ctx.events.clone(),
            current: Mutex::new(id),
            generation: AtomicU64::new(0),
        });

        let mut scheduler = AutosaveScheduler::new(Arc::clone(&saver), ctx.delay);
        if let Some(focus) = &ctx.focus {
            scheduler = scheduler.with_focus(focus.clone());
        }

        Self {
            kind,
            saver,
            scheduler,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Record a change to the form. The draft is saved once changes pause.
    pub fn on_change(&self, state: FormState) {
        if state.kind() != self.kind {
            tracing::warn!(expected = %self.kind, got = %state.kind(), "ignoring change for another report kind");
            return;
        }
        self.scheduler.schedule(Change {
            generation: self.saver.generation.load(Ordering::SeqCst),
            state,
        });
    }

    /// The id the next save will write under, if one has been assigned.
    pub async fn current_draft_id(&self) -> Option<DraftId> {
        self.saver.current.lock().await.clone()
    }

    /// The report was submitted: delete its draft and start over.
    pub async fn complete(&self) -> Option<DraftId> {
        self.scheduler.cancel_pending();
        let id = self.saver.discard_current().await;
        tracing::info!(kind = %self.kind, draft_id = ?id, "report submitted, draft closed");
        id
    }

    /// The user cleared the form: delete its draft and start over.
    pub async fn clear(&self) -> Option<DraftId> {
        self.scheduler.cancel_pending();
        let id = self.saver.discard_current().await;
        tracing::info!(kind = %self.kind, draft_id = ?id, "form cleared");
        id
    }

    /// The form is going away. Pending changes are dropped; a save already
    /// running finishes first.
    pub async fn close(self) {
        self.scheduler.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::store::DraftStore;
    use crate::focus::{FieldSpec, MountedFields};
    use crate::storage::memory::MemoryKvStore;
    use shiftdesk_types::focus::SelectionRange;
    use shiftdesk_types::report::{Report, ShiftReport};

    fn context(kv: MemoryKvStore) -> AutosaveContext<MemoryKvStore> {
        let config = DraftsConfig::default();
        let store = DraftStore::new(kv, config.storage_key.clone());
        AutosaveContext::new(Arc::new(DraftLifecycle::new(store)), &config)
    }

    fn shift(location: &str, cashier: &str) -> FormState {
        FormState::Shift(ShiftReport {
            location: location.to_string(),
            cashier_name: cashier.to_string(),
            ..ShiftReport::default()
        })
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_saves_one_draft_under_one_id() {
        let ctx = context(MemoryKvStore::new());
        let mut events = ctx.events.subscribe();
        let session = DraftSession::open(&ctx, ReportKind::Shift);

        session.on_change(shift("Loc-1", "A"));
        session.on_change(shift("Loc-1", "An"));
        session.on_change(shift("Loc-1", "Anna"));
        settle().await;

        let id = session.current_draft_id().await.unwrap();
        assert!(matches!(
            events.recv().await.unwrap(),
            AutosaveEvent::Saved { created: true, .. }
        ));

        session.on_change(shift("Loc-2", "Anna"));
        settle().await;
        assert_eq!(session.current_draft_id().await, Some(id.clone()));
        assert!(matches!(
            events.recv().await.unwrap(),
            AutosaveEvent::Saved { created: false, .. }
        ));

        let drafts = ctx.lifecycle.list(None).await;
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].payload.location(), "Loc-2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_form_is_skipped() {
        let ctx = context(MemoryKvStore::new());
        let mut events = ctx.events.subscribe();
        let session = DraftSession::open(&ctx, ReportKind::Transfer);

        session.on_change(FormState::blank(ReportKind::Transfer));
        settle().await;

        assert!(session.current_draft_id().await.is_none());
        assert!(matches!(
            events.recv().await.unwrap(),
            AutosaveEvent::Skipped {
                kind: ReportKind::Transfer
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_discards_and_resets() {
        let ctx = context(MemoryKvStore::new());
        let session = DraftSession::open(&ctx, ReportKind::Shift);

        session.on_change(shift("Loc-1", "Anna"));
        settle().await;
        let id = session.current_draft_id().await.unwrap();

        // A change that never got saved is dropped along with the draft.
        session.on_change(shift("Loc-1", "Anna K"));
        assert_eq!(session.complete().await, Some(id.clone()));
        settle().await;

        assert!(session.current_draft_id().await.is_none());
        assert!(ctx.lifecycle.load(&id).await.is_none());
        assert!(ctx.lifecycle.list(None).await.is_empty());

        // Editing again starts a fresh draft.
        session.on_change(shift("Loc-3", ""));
        settle().await;
        let next = session.current_draft_id().await.unwrap();
        assert_ne!(next, id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_publishes_discarded_to_every_listener() {
        let ctx = context(MemoryKvStore::new());
        let mut form = ctx.events.subscribe();
        let mut drafts_panel = ctx.events.subscribe();
        let session = DraftSession::open(&ctx, ReportKind::Shift);

        session.on_change(shift("Loc-1", "Anna"));
        settle().await;
        let id = session.clear().await.unwrap();

        for rx in [&mut form, &mut drafts_panel] {
            assert!(matches!(rx.recv().await.unwrap(), AutosaveEvent::Saved { created: true, .. }));
            assert_eq!(
                rx.recv().await.unwrap(),
                AutosaveEvent::Discarded {
                    draft_id: id.clone()
                }
            );
        }
        // Clearing again has nothing left to announce.
        assert!(session.clear().await.is_none());
        assert!(form.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_without_draft_is_noop() {
        let ctx = context(MemoryKvStore::new());
        let session = DraftSession::open(&ctx, ReportKind::Inventory);
        assert!(session.clear().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_adopts_id() {
        let ctx = context(MemoryKvStore::new());
        let id = ctx
            .lifecycle
            .maybe_save(&shift("Loc-1", "Anna"), None)
            .await
            .unwrap()
            .unwrap();

        let (session, state) = DraftSession::resume(&ctx, &id).await.unwrap();
        assert_eq!(session.kind(), ReportKind::Shift);
        assert_eq!(state, shift("Loc-1", "Anna"));

        session.on_change(shift("Loc-1", "Anna Petrova"));
        settle().await;

        let drafts = ctx.lifecycle.list(None).await;
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, id);
        let Report::Shift(saved) = &drafts[0].payload else {
            panic!("expected shift draft");
        };
        assert_eq!(saved.cashier_name, "Anna Petrova");

        assert!(DraftSession::resume(&ctx, &DraftId::from("missing")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_full_is_published() {
        let ctx = context(MemoryKvStore::with_quota(32));
        let mut events = ctx.events.subscribe();
        let session = DraftSession::open(&ctx, ReportKind::Shift);

        session.on_change(shift("Loc-1", "Anna"));
        settle().await;

        assert!(session.current_draft_id().await.is_none());
        assert!(matches!(
            events.recv().await.unwrap(),
            AutosaveEvent::StorageFull { limit: 32, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_drops_pending_change() {
        let ctx = context(MemoryKvStore::new());
        let session = DraftSession::open(&ctx, ReportKind::Shift);

        session.on_change(shift("Loc-1", "Anna"));
        session.close().await;
        settle().await;

        assert!(ctx.lifecycle.list(None).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_survives_session_autosave() {
        let fields = Arc::new(MountedFields::new());
        fields.mount(FieldSpec::text_input().name("location"));
        let comments = fields.mount(FieldSpec::text_area().name("comments"));
        fields.focus_field(comments);
        fields.set_selection(comments, SelectionRange { start: 0, end: 5 });

        let ctx = context(MemoryKvStore::new()).with_focus(FocusTracker::new(fields.clone()));
        let session = DraftSession::open(&ctx, ReportKind::Shift);

        session.on_change(shift("Loc-1", ""));
        settle().await;

        assert!(session.current_draft_id().await.is_some());
        assert_eq!(fields.focused_handle(), Some(comments));
        assert_eq!(fields.selection(comments), Some(SelectionRange { start: 0, end: 5 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_of_other_kind_is_ignored() {
        let ctx = context(MemoryKvStore::new());
        let session = DraftSession::open(&ctx, ReportKind::Inventory);

        session.on_change(shift("Loc-1", "Anna"));
        settle().await;
        assert!(ctx.lifecycle.list(None).await.is_empty());
    }
}
