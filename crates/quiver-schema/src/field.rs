use crate::{relation::Relation, value::Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

///
/// TypeIdent
///
/// Scalar type surface consumed by argument normalization. Intentionally
/// lossy: it encodes only what the planner needs to inject defaults and
/// normalize enum members.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TypeIdent {
    Id,
    String,
    Int,
    Float,
    Boolean,
    Enum,
    DateTime,
    Json,
}

///
/// ScalarField
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScalarField {
    pub name: String,
    pub type_ident: TypeIdent,
    pub is_required: bool,
    pub is_list: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ScalarField {
    #[must_use]
    pub fn new(name: impl Into<String>, type_ident: TypeIdent) -> Self {
        Self {
            name: name.into(),
            type_ident,
            is_required: false,
            is_list: false,
            default: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    #[must_use]
    pub const fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(self.type_ident, TypeIdent::Id)
    }
}

///
/// RelationField
///
/// One side of a relation as declared on its owning model. The far side is
/// addressed by model name; the shared [`Relation`] carries the per-side
/// delete policy.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RelationField {
    pub name: String,
    /// Owning model name.
    pub model: String,
    /// Far-side model name.
    pub related_model: String,
    pub is_required: bool,
    pub is_list: bool,
    pub relation: Arc<Relation>,
}

impl RelationField {
    /// Does deleting a node of the owning model cascade across this field?
    #[must_use]
    pub fn cascades(&self) -> bool {
        self.relation.cascades_from(&self.model)
    }

    /// Is `other` the inverse of this field (same relation, opposite end)?
    ///
    /// Relation identity is the relation name, which is unique within a
    /// schema. Self-relations distinguish the two ends by field name.
    #[must_use]
    pub fn is_inverse_of(&self, other: &Self) -> bool {
        self.relation.name == other.relation.name
            && !(self.model == other.model && self.name == other.name)
    }
}

///
/// TESTS
///
