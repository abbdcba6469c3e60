//! Debounced autosave.
//!
//! Rapid form changes collapse into one save cycle that runs after a quiet
//! period. Each cycle is: snapshot focus, save, restore focus.

pub mod scheduler;

pub use scheduler::{AutosaveScheduler, DEFAULT_AUTOSAVE_DELAY, SaveTarget};
