//! Event bus for autosave outcomes.
//!
//! Provides an `EventBus` that distributes `AutosaveEvent` messages to all
//! subscribers via a `tokio::sync::broadcast` channel.

pub mod bus;

pub use bus::EventBus;
