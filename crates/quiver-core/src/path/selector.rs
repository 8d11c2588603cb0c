use crate::{args::WriteArgs, id::NodeId};
use quiver_schema::{Model, Value};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// NodeSelector
///
/// A unique-key identifier for at most one node of one model: the model,
/// the selecting field, and its value. Whether the selector actually
/// resolves against live data is the executor's problem; the planner only
/// threads selectors through paths and probes.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSelector {
    pub model: Arc<Model>,
    pub field: String,
    pub value: Value,
}

impl NodeSelector {
    #[must_use]
    pub fn new(model: Arc<Model>, field: impl Into<String>, value: Value) -> Self {
        Self {
            model,
            field: field.into(),
            value,
        }
    }

    /// The canonical identity selector for a freshly minted node.
    #[must_use]
    pub fn for_id(model: Arc<Model>, id: &NodeId) -> Self {
        let field = model.id_field_name().to_string();

        Self {
            model,
            field,
            value: id.into(),
        }
    }

    /// Reflect an identity change the enclosing update performs: when
    /// `args` carries a new value for the selecting field, the returned
    /// selector points at the post-update node.
    #[must_use]
    pub fn updated_by(&self, args: &WriteArgs) -> Self {
        match args.scalar(&self.field) {
            Some(value) => Self {
                model: Arc::clone(&self.model),
                field: self.field.clone(),
                value: value.clone(),
            },
            None => self.clone(),
        }
    }
}

impl fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.model.name, self.field, self.value)
    }
}
