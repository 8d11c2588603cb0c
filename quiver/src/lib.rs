//! Quiver: a mutation planner for GraphQL-shaped writes over relational
//! storage.
//!
//! This is the public meta-crate. Downstream users depend on **quiver**
//! only. It re-exports the stable public API from:
//!   - `quiver-schema` (projects, models, fields, relations, values)
//!   - `quiver-core`   (path algebra, write args, mutactions, the planner)

pub use quiver_core as core;
pub use quiver_schema as schema;

pub use quiver_core::{
    IdGenerator, MonotonicIdGenerator, Mutaction, MutationPlanner, NodeId, NodeSelector, Path,
    PlanError, PreviousValues, UpsertArgs, WriteArgs,
};
pub use quiver_schema::{Model, Project, ProjectId, Schema, Value};

///
/// Prelude
///

pub mod prelude {
    pub use quiver_core::prelude::*;
    pub use quiver_schema::prelude::*;
}
