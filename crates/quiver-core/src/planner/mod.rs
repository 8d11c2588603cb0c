//! The mutation planner: a pure function from (project, root path, typed
//! input tree, operation kind) to a totally ordered mutaction vector.
//!
//! Determinism: equal inputs and an equally seeded id generator produce
//! identical vectors. The planner performs no I/O and holds no state
//! across invocations; the only side effect is metric emission through the
//! injected sink.

mod cascade;
mod nested;

#[cfg(test)]
mod tests;

use crate::{
    args::{UpsertArgs, WriteArgs, normalize_create_args},
    error::PlanError,
    id::IdGenerator,
    mutaction::{Mutaction, PreviousValues},
    obs::sink::{GLOBAL_METRICS_SINK, MetricsEvent, MetricsSink, PlanKind},
    path::{NodeSelector, Path},
};
use quiver_schema::Project;
use std::sync::Arc;

///
/// MutationPlanner
///
/// One planner per project. Holds only read-only collaborators, so a
/// single instance may serve concurrent callers; every planning call is
/// synchronous and allocation-only.
///

pub struct MutationPlanner<'a> {
    project: Arc<Project>,
    id_gen: &'a dyn IdGenerator,
    sink: &'a dyn MetricsSink,
}

impl<'a> MutationPlanner<'a> {
    #[must_use]
    pub fn new(project: Arc<Project>, id_gen: &'a dyn IdGenerator) -> Self {
        Self::with_sink(project, id_gen, &GLOBAL_METRICS_SINK)
    }

    /// Construct with an injected metrics sink; tests observe events
    /// without touching process-wide counters.
    #[must_use]
    pub fn with_sink(
        project: Arc<Project>,
        id_gen: &'a dyn IdGenerator,
        sink: &'a dyn MetricsSink,
    ) -> Self {
        Self {
            project,
            id_gen,
            sink,
        }
    }

    #[must_use]
    pub const fn project(&self) -> &Arc<Project> {
        &self.project
    }

    pub(crate) const fn id_gen(&self) -> &dyn IdGenerator {
        self.id_gen
    }

    // ─────────────────────────────────────────────
    // Public surface
    // ─────────────────────────────────────────────

    /// Plan a top-level create: the row write first, then the nested
    /// expansion as a create context.
    pub fn for_create(&self, path: &Path, args: &WriteArgs) -> Result<Vec<Mutaction>, PlanError> {
        self.instrumented(PlanKind::Create, || {
            let model = path.last_model();
            let (non_list, list) = args.create_args();

            let mut out = vec![Mutaction::CreateDataItem {
                project: Arc::clone(&self.project),
                path: path.clone(),
                non_list_args: normalize_create_args(model, non_list)?,
                list_args: list,
            }];
            out.extend(nested::expand(self, args, path, true)?);

            Ok(out)
        })
    }

    /// Plan a top-level update. Nested expansion descends from the
    /// post-update root identity, so deeper node edges stay addressable
    /// when the update changes the selecting field itself.
    pub fn for_update(
        &self,
        path: &Path,
        args: &WriteArgs,
        previous_values: PreviousValues,
    ) -> Result<Vec<Mutaction>, PlanError> {
        self.instrumented(PlanKind::Update, || {
            let (non_list, list) = args.update_args();

            let mut out = vec![Mutaction::UpdateDataItem {
                project: Arc::clone(&self.project),
                path: path.clone(),
                non_list_args: non_list,
                list_args: list,
                previous_values,
            }];
            out.extend(nested::expand(self, args, &path.updated_root(args), false)?);

            Ok(out)
        })
    }

    /// Plan a top-level upsert: exactly one mutaction carrying both arg
    /// branches. Nested payloads under either branch are intentionally not
    /// expanded; this is a known limitation until both-branch semantics
    /// are settled, not an optimization.
    pub fn for_upsert(
        &self,
        path: &Path,
        create_where: NodeSelector,
        updated_where: NodeSelector,
        args: &UpsertArgs,
    ) -> Result<Vec<Mutaction>, PlanError> {
        self.instrumented(PlanKind::Upsert, || {
            let model = path.last_model();
            let (create_non_list, create_list) = args.create.create_args();
            let (update_non_list, update_list) = args.update.update_args();

            Ok(vec![Mutaction::UpsertDataItem {
                project: Arc::clone(&self.project),
                path: path.clone(),
                create_where,
                updated_where,
                create_non_list_args: normalize_create_args(model, create_non_list)?,
                create_list_args: create_list,
                update_non_list_args: update_non_list,
                update_list_args: update_list,
            }])
        })
    }

    /// Plan a top-level delete: verify the root resolves, clean every
    /// cascading relation deepest-first, check required relations, then
    /// delete the row.
    pub fn for_delete(
        &self,
        path: &Path,
        previous_values: PreviousValues,
    ) -> Result<Vec<Mutaction>, PlanError> {
        self.instrumented(PlanKind::Delete, || {
            let mut out = vec![Mutaction::VerifyWhere {
                project: Arc::clone(&self.project),
                selector: path.root().clone(),
            }];
            out.extend(cascade::expand(&self.project, path)?);
            out.push(Mutaction::DeleteRelationCheck {
                project: Arc::clone(&self.project),
                path: path.clone(),
            });
            out.push(Mutaction::DeleteDataItem {
                project: Arc::clone(&self.project),
                path: path.clone(),
                previous_values,
            });

            Ok(out)
        })
    }

    /// Resolve the cascading-delete cleanup for `start` alone, without the
    /// surrounding delete mutactions. Empty iff no relation edge at or
    /// beyond `start` cascades.
    pub fn cascading_delete(&self, start: &Path) -> Result<Vec<Mutaction>, PlanError> {
        let out = self.instrumented(PlanKind::Cascade, || {
            cascade::expand(&self.project, start).map_err(PlanError::from)
        })?;

        self.sink.record(MetricsEvent::CascadePathsResolved {
            project_id: self.project.id.clone(),
            // Counter saturates on overflow; diagnostics only.
            paths: u64::try_from(out.len()).unwrap_or(u64::MAX),
        });

        Ok(out)
    }

    /// Record the entry, run the expansion, and advance the mutaction
    /// counter by the returned vector's exact length. Failed plans record
    /// the attempt only; no partial vector escapes.
    fn instrumented(
        &self,
        kind: PlanKind,
        f: impl FnOnce() -> Result<Vec<Mutaction>, PlanError>,
    ) -> Result<Vec<Mutaction>, PlanError> {
        self.sink.record(MetricsEvent::PlanStart {
            kind,
            project_id: self.project.id.clone(),
        });

        let out = f()?;

        self.sink.record(MetricsEvent::MutactionsPlanned {
            project_id: self.project.id.clone(),
            // Counter saturates on overflow; diagnostics only.
            count: u64::try_from(out.len()).unwrap_or(u64::MAX),
        });

        Ok(out)
    }
}
