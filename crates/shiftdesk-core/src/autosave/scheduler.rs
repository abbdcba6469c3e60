//! Trailing-edge debounce for autosave.
//!
//! Every call to [`AutosaveScheduler::schedule`] replaces the pending timer.
//! When a timer runs out uncancelled, its cycle runs to completion even if
//! newer changes arrive meanwhile; those start their own timer, so cycles
//! may overlap and the save target must tolerate that.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, info_span};

use crate::focus::FocusTracker;

/// Quiet period after the last change before a save cycle runs.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(300);

/// Where a fired autosave cycle sends the form state.
pub trait SaveTarget<S>: Send + Sync + 'static {
    fn save(&self, state: S) -> impl Future<Output = ()> + Send;
}

/// Debounces form changes into save cycles.
pub struct AutosaveScheduler<S, T> {
    target: Arc<T>,
    focus: Option<FocusTracker>,
    delay: Duration,
    /// Cancelled when the form session ends.
    session: CancellationToken,
    /// Timer of the most recent `schedule` call, child of `session`.
    pending: Mutex<Option<CancellationToken>>,
    cycles: TaskTracker,
    _state: PhantomData<fn(S)>,
}

impl<S, T> AutosaveScheduler<S, T>
where
    S: Send + 'static,
    T: SaveTarget<S>,
{
    pub fn new(target: Arc<T>, delay: Duration) -> Self {
        Self {
            target,
            focus: None,
            delay,
            session: CancellationToken::new(),
            pending: Mutex::new(None),
            cycles: TaskTracker::new(),
            _state: PhantomData,
        }
    }

    /// Preserve keyboard focus around each save.
    pub fn with_focus(mut self, focus: FocusTracker) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the debounce timer with `state` as the state to save.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, state: S) {
        if self.session.is_cancelled() {
            tracing::debug!("autosave session closed, ignoring change");
            return;
        }

        let timer = self.session.child_token();
        let previous = self
            .pending
            .lock()
            .expect("autosave pending lock poisoned")
            .replace(timer.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let target = Arc::clone(&self.target);
        let focus = self.focus.clone();
        let delay = self.delay;
        let span = info_span!("autosave.cycle", delay_ms = delay.as_millis() as u64);

        self.cycles.spawn(
            async move {
                tokio::select! {
                    _ = timer.cancelled() => {
                        tracing::trace!("autosave timer superseded");
                        return;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }

                let snapshot = focus.as_ref().and_then(FocusTracker::snapshot);
                target.save(state).await;
                if let Some(focus) = focus {
                    focus.restore(snapshot).await;
                }
            }
            .instrument(span),
        );
    }

    /// Cancel the pending timer, if any. A cycle already running is left alone.
    pub fn cancel_pending(&self) {
        if let Some(timer) = self
            .pending
            .lock()
            .expect("autosave pending lock poisoned")
            .take()
        {
            timer.cancel();
        }
    }

    /// End the session: cancel the pending timer and wait for running
    /// cycles to finish.
    pub async fn shutdown(&self) {
        self.session.cancel();
        self.cycles.close();
        self.cycles.wait().await;
    }
}

impl<S, T> Drop for AutosaveScheduler<S, T> {
    fn drop(&mut self) {
        self.session.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{FieldRegistry, FieldSpec, MountedFields};
    use shiftdesk_types::focus::{FieldHandle, SelectionRange};

    #[derive(Default)]
    struct Recorder {
        saved: Mutex<Vec<u32>>,
        work: Duration,
    }

    impl Recorder {
        fn slow(work: Duration) -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                work,
            }
        }

        fn saved(&self) -> Vec<u32> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl SaveTarget<u32> for Recorder {
        async fn save(&self, state: u32) {
            if !self.work.is_zero() {
                tokio::time::sleep(self.work).await;
            }
            self.saved.lock().unwrap().push(state);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_coalesce_into_last_state() {
        let target = Arc::new(Recorder::default());
        let scheduler = AutosaveScheduler::new(target.clone(), DEFAULT_AUTOSAVE_DELAY);

        for state in 1..=5 {
            scheduler.schedule(state);
            tokio::time::sleep(ms(100)).await;
        }
        assert!(target.saved().is_empty());

        tokio::time::sleep(ms(300)).await;
        assert_eq!(target.saved(), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_save_separately() {
        let target = Arc::new(Recorder::default());
        let scheduler = AutosaveScheduler::new(target.clone(), ms(300));

        scheduler.schedule(1);
        tokio::time::sleep(ms(400)).await;
        scheduler.schedule(2);
        tokio::time::sleep(ms(400)).await;

        assert_eq!(target.saved(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_during_save_does_not_cancel_it() {
        let target = Arc::new(Recorder::slow(ms(200)));
        let scheduler = AutosaveScheduler::new(target.clone(), ms(300));

        scheduler.schedule(1);
        // Timer fired at 300ms; save is running until 500ms.
        tokio::time::sleep(ms(350)).await;
        scheduler.schedule(2);

        tokio::time::sleep(ms(1_000)).await;
        assert_eq!(target.saved(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_drops_change() {
        let target = Arc::new(Recorder::default());
        let scheduler = AutosaveScheduler::new(target.clone(), ms(300));

        scheduler.schedule(1);
        scheduler.cancel_pending();
        tokio::time::sleep(ms(500)).await;
        assert!(target.saved().is_empty());

        scheduler.schedule(2);
        tokio::time::sleep(ms(500)).await;
        assert_eq!(target.saved(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timer_but_finishes_running_cycle() {
        let target = Arc::new(Recorder::slow(ms(200)));
        let scheduler = AutosaveScheduler::new(target.clone(), ms(300));

        scheduler.schedule(1);
        tokio::time::sleep(ms(350)).await;
        scheduler.schedule(2);

        scheduler.shutdown().await;
        assert_eq!(target.saved(), vec![1]);

        scheduler.schedule(3);
        tokio::time::sleep(ms(500)).await;
        assert_eq!(target.saved(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let target = Arc::new(Recorder::default());
        let scheduler = AutosaveScheduler::new(target.clone(), ms(300));

        scheduler.schedule(1);
        drop(scheduler);
        tokio::time::sleep(ms(500)).await;
        assert!(target.saved().is_empty());
    }

    /// Save target that re-renders the form while saving, recreating the
    /// field that had focus.
    struct Rerender {
        fields: Arc<MountedFields>,
    }

    impl SaveTarget<u32> for Rerender {
        async fn save(&self, _state: u32) {
            if let Some(focused) = self.fields.focused() {
                self.fields.remount(focused.field.handle);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_preserved_across_autosave() {
        let fields = Arc::new(MountedFields::new());
        let _location = fields.mount(FieldSpec::text_input().id("location"));
        let cashier = fields.mount(FieldSpec::text_input().id("cashierName").class("input"));
        fields.focus_field(cashier);
        fields.set_selection(cashier, SelectionRange::cursor(4));

        let target = Arc::new(Rerender {
            fields: fields.clone(),
        });
        let scheduler = AutosaveScheduler::new(target, ms(300))
            .with_focus(FocusTracker::new(fields.clone()));

        scheduler.schedule(1);
        tokio::time::sleep(ms(400)).await;

        let focused: FieldHandle = fields.focused_handle().unwrap();
        assert_ne!(focused, cashier);
        assert_eq!(fields.find_by_id("cashierName"), Some(focused));
        assert_eq!(fields.selection(focused), Some(SelectionRange::cursor(4)));
    }
}
