//! Crate-internal helpers.

pub mod tracing_targets;
