//! Observability setup for ShiftDesk binaries.

pub mod tracing_setup;
