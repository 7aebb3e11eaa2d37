//! Observability setup for gemtalk: structured logging through `tracing`,
//! with an optional OpenTelemetry span pipeline.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
