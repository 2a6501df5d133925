//! Observability for the EmailLabs transport.
//!
//! Send outcomes go to a [`Logger`] sink; counters are kept in
//! [`SendMetrics`]. Spans and internal events use `tracing` directly.

mod logging;
mod metrics;

pub use logging::{init_tracing, LogFormat, LogLevel, Logger, NoopLogger, TracingLogger};
pub use metrics::{MetricsSnapshot, SendMetrics};
