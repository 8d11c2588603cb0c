use crate::model::Schema;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

///
/// ProjectId
///
/// Stable external identifier for one tenant project; tags metrics and
/// diagnostics.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[from(forward)]
pub struct ProjectId(String);

impl ProjectId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// Project
///
/// A project is an identifier plus its schema. Handed to the planner
/// read-only; must not mutate during a planning call.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub schema: Schema,
}

impl Project {
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, schema: Schema) -> Self {
        Self {
            id: id.into(),
            schema,
        }
    }
}

///
/// TESTS
///
