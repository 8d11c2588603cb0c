//! Observability boundary for the planner.
//!
//! Planner logic never touches metrics state directly: every measurement
//! flows through a [`sink::MetricsSink`], and the process-wide counters in
//! [`metrics`] are only one (default) destination.

pub mod metrics;
pub mod sink;

pub use metrics::{MetricsReport, metrics_report, metrics_reset};
pub use sink::{MetricsEvent, MetricsSink, PlanKind};
