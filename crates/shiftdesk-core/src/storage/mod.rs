//! Storage abstractions for ShiftDesk.
//!
//! Defines the key-value store trait and an in-memory implementation.
//! The SQLite implementation lives in shiftdesk-infra.

pub mod kv_store;
pub mod memory;

#[cfg(test)]
pub(crate) mod testing;
