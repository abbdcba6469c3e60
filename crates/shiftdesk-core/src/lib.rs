//! Draft autosave and recovery for ShiftDesk report forms.
//!
//! This crate defines the ports (`KvStore`, `FieldRegistry`) that the
//! infrastructure and UI layers implement, plus everything that runs on top
//! of them: the attachment codec, the draft store, the lifecycle controller
//! and the debounced autosave session. It depends only on `shiftdesk-types`
//! and never on `shiftdesk-infra` or any database crate.

pub mod autosave;
pub mod codec;
pub mod draft;
pub mod event;
pub mod focus;
pub mod storage;
