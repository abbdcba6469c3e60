//! Fan-out of autosave outcomes.
//!
//! Every open form session publishes what its save cycles did; the form's
//! status line and the draft list both listen. Nobody listening is normal
//! (a form without a status line), so publishing never fails.

use shiftdesk_types::event::AutosaveEvent;
use tokio::sync::broadcast;

/// Outcomes buffered per listener before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 64;

/// Broadcast channel of [`AutosaveEvent`]s. Clones publish into the same
/// channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AutosaveEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Listen for outcomes published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AutosaveEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: AutosaveEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("no autosave listeners");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.sender.receiver_count())
            .finish()
    }
}
