//! Schema vocabulary for the quiver data layer.
//!
//! This crate carries the read-only entities handed to the mutation planner:
//! a [`Project`] wrapping a [`Schema`] of [`Model`]s, their scalar and
//! relation fields, the per-side [`OnDelete`] policy, and the typed scalar
//! [`Value`] vocabulary shared by arguments, selectors, and defaults.
//!
//! Everything here is a value; nothing mutates after [`SchemaBuilder::build`].

pub mod error;
pub mod field;
pub mod model;
pub mod project;
pub mod relation;
pub mod value;

pub use error::SchemaError;
pub use field::{RelationField, ScalarField, TypeIdent};
pub use model::{Model, ModelBuilder, Schema, SchemaBuilder};
pub use project::{Project, ProjectId};
pub use relation::{OnDelete, Relation};
pub use value::Value;

///
/// Prelude
///
/// Domain vocabulary only; builders and errors stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        field::{RelationField, ScalarField, TypeIdent},
        model::{Model, Schema},
        project::{Project, ProjectId},
        relation::{OnDelete, Relation},
        value::Value,
    };
}
