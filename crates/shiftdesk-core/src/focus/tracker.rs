//! Focus snapshot and restore around a save cycle.
//!
//! Saving a draft can make the form re-render, which may recreate the field
//! the user is typing in. The tracker records which text field had focus
//! before the save and puts focus (and the cursor) back afterwards.

use std::sync::Arc;

use shiftdesk_types::focus::{FieldHandle, FocusSnapshot};

use super::registry::FieldRegistry;

/// Snapshots and restores keyboard focus through a [`FieldRegistry`].
#[derive(Clone)]
pub struct FocusTracker {
    registry: Arc<dyn FieldRegistry>,
}

impl FocusTracker {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        Self { registry }
    }

    /// Capture the focused field if it is a text input or text area.
    pub fn snapshot(&self) -> Option<FocusSnapshot> {
        let focused = self.registry.focused()?;
        if !focused.field.kind.is_text_entry() {
            return None;
        }

        Some(FocusSnapshot {
            handle: focused.field.handle,
            class: focused.field.first_class().map(str::to_string),
            id: focused.field.id,
            name: focused.field.name,
            selection: focused.selection,
        })
    }

    /// Find the field a snapshot refers to now.
    ///
    /// Tries the original handle, then `id`, then `name`, then the first
    /// class, moving on whenever a lookup finds nothing.
    pub fn resolve(&self, snapshot: &FocusSnapshot) -> Option<FieldHandle> {
        if self.registry.is_mounted(snapshot.handle) {
            return Some(snapshot.handle);
        }
        snapshot
            .id
            .as_deref()
            .and_then(|id| self.registry.find_by_id(id))
            .or_else(|| {
                snapshot
                    .name
                    .as_deref()
                    .and_then(|name| self.registry.find_by_name(name))
            })
            .or_else(|| {
                snapshot
                    .class
                    .as_deref()
                    .and_then(|class| self.registry.find_by_class(class))
            })
    }

    /// Put focus back where `snapshot` says it was.
    ///
    /// Yields once before focusing so any re-render triggered by the save
    /// settles first. A missing target is not an error.
    pub async fn restore(&self, snapshot: Option<FocusSnapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };
        let Some(target) = self.resolve(&snapshot) else {
            tracing::trace!(handle = snapshot.handle.0, "focus target gone, not restoring");
            return;
        };

        tokio::task::yield_now().await;

        if !self.registry.focus(target, snapshot.selection) {
            tracing::trace!(handle = target.0, "focus target unmounted before restore");
        }
    }
}

impl std::fmt::Debug for FocusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusTracker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::registry::{FieldSpec, MountedFields};
    use shiftdesk_types::focus::{FieldKind, SelectionRange};

    fn tracker() -> (Arc<MountedFields>, FocusTracker) {
        let fields = Arc::new(MountedFields::new());
        let tracker = FocusTracker::new(fields.clone());
        (fields, tracker)
    }

    #[test]
    fn test_snapshot_ignores_non_text_fields() {
        let (fields, tracker) = tracker();
        assert!(tracker.snapshot().is_none());

        let select = fields.mount(FieldSpec::new(FieldKind::Select).id("location"));
        fields.focus_field(select);
        assert!(tracker.snapshot().is_none());

        let text = fields.mount(FieldSpec::text_input().id("cashier").class("input wide"));
        fields.focus_field(text);
        fields.set_selection(text, SelectionRange { start: 2, end: 4 });

        let snap = tracker.snapshot().unwrap();
        assert_eq!(snap.handle, text);
        assert_eq!(snap.id.as_deref(), Some("cashier"));
        assert_eq!(snap.class.as_deref(), Some("input"));
        assert_eq!(snap.selection, Some(SelectionRange { start: 2, end: 4 }));
    }

    #[test]
    fn test_resolve_fallback_chain() {
        let (fields, tracker) = tracker();
        let by_name = fields.mount(FieldSpec::text_input().name("factCash"));
        let by_class = fields.mount(FieldSpec::text_input().class("qty"));

        let snapshot = FocusSnapshot {
            handle: FieldHandle(999),
            id: Some("gone".to_string()),
            name: Some("factCash".to_string()),
            class: Some("qty".to_string()),
            selection: None,
        };
        // Missing id falls through to name.
        assert_eq!(tracker.resolve(&snapshot), Some(by_name));

        let snapshot = FocusSnapshot {
            name: None,
            ..snapshot
        };
        assert_eq!(tracker.resolve(&snapshot), Some(by_class));

        let snapshot = FocusSnapshot {
            class: Some("nothing".to_string()),
            ..snapshot
        };
        assert_eq!(tracker.resolve(&snapshot), None);
    }

    #[tokio::test]
    async fn test_restore_none_and_missing_target_are_noops() {
        let (fields, tracker) = tracker();
        tracker.restore(None).await;

        let snapshot = FocusSnapshot {
            handle: FieldHandle(7),
            id: None,
            name: None,
            class: None,
            selection: None,
        };
        tracker.restore(Some(snapshot)).await;
        assert!(fields.focused_handle().is_none());
    }

    #[tokio::test]
    async fn test_restore_after_remount_reapplies_selection() {
        let (fields, tracker) = tracker();
        let cash = fields.mount(FieldSpec::text_input().id("factCash"));
        fields.focus_field(cash);
        fields.set_selection(cash, SelectionRange::cursor(3));

        let snapshot = tracker.snapshot();
        let fresh = fields.remount(cash).unwrap();
        assert!(fields.focused_handle().is_none());

        tracker.restore(snapshot).await;
        assert_eq!(fields.focused_handle(), Some(fresh));
        assert_eq!(fields.selection(fresh), Some(SelectionRange::cursor(3)));
    }
}
