//! Shared domain types for ShiftDesk report drafts.
//!
//! Report payloads, draft records, attachments and their at-rest
//! placeholders, focus snapshots, autosave events, configuration and error
//! types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod attachment;
pub mod config;
pub mod draft;
pub mod error;
pub mod event;
pub mod focus;
pub mod report;
