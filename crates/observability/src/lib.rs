//! Observability concerns: logging/tracing wiring for shopledger processes.

pub mod tracing;

pub use tracing::init;
