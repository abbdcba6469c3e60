//! Focus preservation across autosave.
//!
//! `FieldRegistry` is the port a form implements (or the bundled
//! `MountedFields`); `FocusTracker` snapshots and restores focus through it.

pub mod registry;
pub mod tracker;

pub use registry::{FieldRegistry, FieldSpec, MountedFields};
pub use tracker::FocusTracker;
