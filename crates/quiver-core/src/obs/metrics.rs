//! Process-wide planner counters. Update-only; readers get snapshots.

use serde::Serialize;
use std::{
    collections::BTreeMap,
    sync::{LazyLock, Mutex},
};

///
/// PlanOps
///
/// Call counters are planning attempts; failed plans still increment them.
/// `mutactions_planned` advances by the exact length of each returned
/// vector, never for a failed plan.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct PlanOps {
    pub plan_create_calls: u64,
    pub plan_update_calls: u64,
    pub plan_upsert_calls: u64,
    pub plan_delete_calls: u64,
    pub cascade_calls: u64,

    pub mutactions_planned: u64,
    pub cascade_paths_resolved: u64,
}

///
/// ProjectCounters
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ProjectCounters {
    pub plan_calls: u64,
    pub mutactions_planned: u64,
}

///
/// MetricsState
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsState {
    pub ops: PlanOps,
    pub projects: BTreeMap<String, ProjectCounters>,
}

static STATE: LazyLock<Mutex<MetricsState>> = LazyLock::new(|| Mutex::new(MetricsState::default()));

/// Serializes tests that touch the process-wide counters.
#[cfg(test)]
pub(crate) static TEST_STATE_LOCK: Mutex<()> = Mutex::new(());

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&MetricsState) -> R) -> R {
    let state = STATE.lock().expect("metrics mutex poisoned");

    f(&state)
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsState) -> R) -> R {
    let mut state = STATE.lock().expect("metrics mutex poisoned");

    f(&mut state)
}

/// Reset all counters (useful in tests).
pub fn metrics_reset() {
    with_state_mut(|state| *state = MetricsState::default());
}

///
/// MetricsReport
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsReport {
    pub counters: MetricsState,
}

/// Snapshot the current counters.
#[must_use]
pub fn metrics_report() -> MetricsReport {
    MetricsReport {
        counters: with_state(Clone::clone),
    }
}

///
/// TESTS
///
