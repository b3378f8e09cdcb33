//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Index code never touches counters directly; see [`sink`].

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, TypeCounters, TypeEventSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
