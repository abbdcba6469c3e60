//! Drafts: persistence, lifecycle and autosave sessions.

pub mod attachments;
pub mod lifecycle;
pub mod session;
pub mod store;

pub use lifecycle::{DraftLifecycle, SaveOutcome};
pub use session::{AutosaveContext, DraftSession};
pub use store::DraftStore;
