//! Infrastructure layer for ShiftDesk.
//!
//! Contains implementations of the ports defined in `shiftdesk-core`:
//! SQLite key-value storage, the `config.toml` loader, and filesystem
//! helpers for the data directory and attachment export.

pub mod config;
pub mod filesystem;
pub mod sqlite;
