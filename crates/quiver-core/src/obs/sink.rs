//! Metrics sink boundary.
//!
//! The planner records through an injected [`MetricsSink`]; the default
//! sink writes into the process-wide counters in [`super::metrics`]. Tests
//! inject their own sink and observe events without global state.

use crate::obs::metrics;
use quiver_schema::ProjectId;

///
/// PlanKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanKind {
    Create,
    Update,
    Upsert,
    Delete,
    Cascade,
}

///
/// MetricsEvent
///

#[derive(Clone, Debug, PartialEq)]
pub enum MetricsEvent {
    /// A public planner entry was invoked.
    PlanStart {
        kind: PlanKind,
        project_id: ProjectId,
    },

    /// A plan completed; `count` is the returned vector's exact length.
    MutactionsPlanned {
        project_id: ProjectId,
        count: u64,
    },

    /// A standalone cascading-delete resolution finished.
    CascadePathsResolved {
        project_id: ProjectId,
        paths: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
///
/// Default sink writing into the process-wide counter state.
///

pub(crate) struct GlobalMetricsSink;

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::PlanStart { kind, project_id } => {
                metrics::with_state_mut(|state| {
                    let ops = &mut state.ops;
                    let counter = match kind {
                        PlanKind::Create => &mut ops.plan_create_calls,
                        PlanKind::Update => &mut ops.plan_update_calls,
                        PlanKind::Upsert => &mut ops.plan_upsert_calls,
                        PlanKind::Delete => &mut ops.plan_delete_calls,
                        PlanKind::Cascade => &mut ops.cascade_calls,
                    };
                    *counter = counter.saturating_add(1);

                    let entry = state
                        .projects
                        .entry(project_id.to_string())
                        .or_default();
                    entry.plan_calls = entry.plan_calls.saturating_add(1);
                });
            }

            MetricsEvent::MutactionsPlanned { project_id, count } => {
                metrics::with_state_mut(|state| {
                    state.ops.mutactions_planned =
                        state.ops.mutactions_planned.saturating_add(count);

                    let entry = state
                        .projects
                        .entry(project_id.to_string())
                        .or_default();
                    entry.mutactions_planned = entry.mutactions_planned.saturating_add(count);
                });
            }

            MetricsEvent::CascadePathsResolved { paths, .. } => {
                metrics::with_state_mut(|state| {
                    state.ops.cascade_paths_resolved =
                        state.ops.cascade_paths_resolved.saturating_add(paths);
                });
            }
        }
    }
}

///
/// TESTS
///
