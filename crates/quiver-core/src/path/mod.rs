//! The path algebra: an immutable traversal from a root node through
//! relation edges. Extenders clone; a path is never mutated in place.

mod selector;

pub use selector::NodeSelector;

use crate::{
    args::WriteArgs,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use quiver_schema::{Model, Relation, RelationField, Schema};
use serde::Serialize;
use std::{fmt, sync::Arc};

///
/// Edge
///
/// One traversal step across a relation field. A `Node` edge pins the far
/// end to a specific identified node; a `Model` edge targets some yet
/// unidentified node of the related model. The far model is resolved once
/// at extension time so that walking a path never touches the schema again.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Edge {
    Node {
        field: Arc<RelationField>,
        related: Arc<Model>,
        selector: NodeSelector,
    },
    Model {
        field: Arc<RelationField>,
        related: Arc<Model>,
    },
}

impl Edge {
    #[must_use]
    pub fn field(&self) -> &Arc<RelationField> {
        match self {
            Self::Node { field, .. } | Self::Model { field, .. } => field,
        }
    }

    #[must_use]
    pub fn related(&self) -> &Arc<Model> {
        match self {
            Self::Node { related, .. } | Self::Model { related, .. } => related,
        }
    }

    #[must_use]
    pub const fn selector(&self) -> Option<&NodeSelector> {
        match self {
            Self::Node { selector, .. } => Some(selector),
            Self::Model { .. } => None,
        }
    }
}

///
/// Path
///
/// An ordered edge sequence rooted at a node selector. Consecutive edges
/// connect through a shared model: each edge's field is declared on the
/// model the previous edge (or the root) arrives at.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Path {
    root: NodeSelector,
    edges: Vec<Edge>,
}

impl Path {
    #[must_use]
    pub const fn new(root: NodeSelector) -> Self {
        Self {
            root,
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub const fn root(&self) -> &NodeSelector {
        &self.root
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The model the path currently stands on: the far model of the last
    /// edge, or the root model for an empty path.
    #[must_use]
    pub fn last_model(&self) -> &Arc<Model> {
        self.edges
            .last()
            .map_or(&self.root.model, |edge| edge.related())
    }

    #[must_use]
    pub fn last_field(&self) -> Option<&Arc<RelationField>> {
        self.edges.last().map(Edge::field)
    }

    /// Append one edge. `selector` pins the far end (`Node` edge); without
    /// one the far end stays unidentified (`Model` edge).
    pub fn extend(
        &self,
        schema: &Schema,
        field: &Arc<RelationField>,
        selector: Option<NodeSelector>,
    ) -> Result<Self, InternalError> {
        let here = self.last_model();
        if field.model != here.name {
            return Err(InternalError::new(
                ErrorClass::InvariantViolation,
                ErrorOrigin::Planner,
                format!(
                    "path extension must connect through the current model: at={} field={}.{}",
                    here.name, field.model, field.name
                ),
            ));
        }
        let related = schema.related_model(field)?;

        let edge = match selector {
            Some(selector) => Edge::Node {
                field: Arc::clone(field),
                related,
                selector,
            },
            None => Edge::Model {
                field: Arc::clone(field),
                related,
            },
        };

        let mut edges = self.edges.clone();
        edges.push(edge);

        Ok(Self {
            root: self.root.clone(),
            edges,
        })
    }

    /// Pin the trailing edge to an identified node, replacing whatever
    /// selector it carried.
    pub fn last_edge_to_node_edge(&self, selector: NodeSelector) -> Result<Self, InternalError> {
        let Some(last) = self.edges.last() else {
            return Err(InternalError::new(
                ErrorClass::InvariantViolation,
                ErrorOrigin::Planner,
                format!(
                    "cannot pin the last edge of an empty path: root={}",
                    self.root
                ),
            ));
        };

        let pinned = Edge::Node {
            field: Arc::clone(last.field()),
            related: Arc::clone(last.related()),
            selector,
        };

        let mut edges = self.edges.clone();
        *edges.last_mut().expect("checked non-empty above") = pinned;

        Ok(Self {
            root: self.root.clone(),
            edges,
        })
    }

    /// Drop the trailing edge; no-op on an empty path.
    #[must_use]
    pub fn remove_last_edge(&self) -> Self {
        let mut edges = self.edges.clone();
        edges.pop();

        Self {
            root: self.root.clone(),
            edges,
        }
    }

    /// Replace the root selector's value when `args` update the selecting
    /// field, so subsequent edges refer to the post-update identity.
    #[must_use]
    pub fn updated_root(&self, args: &WriteArgs) -> Self {
        Self {
            root: self.root.updated_by(args),
            edges: self.edges.clone(),
        }
    }

    /// Relation fields of the current model, excluding the inverse of the
    /// edge the path arrived through.
    #[must_use]
    pub fn relation_fields_not_on_path_on_last_model(
        &self,
        schema: &Schema,
    ) -> Vec<Arc<RelationField>> {
        let inverse = self
            .last_field()
            .and_then(|field| schema.related_field(field));

        self.last_model()
            .relation_fields
            .iter()
            .filter(|field| {
                inverse
                    .as_ref()
                    .is_none_or(|back| !(back.model == field.model && back.name == field.name))
            })
            .cloned()
            .collect()
    }

    /// Does any edge of this path cross `relation`?
    #[must_use]
    pub fn traverses_relation(&self, relation: &Relation) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.field().relation.name == relation.name)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for edge in &self.edges {
            match edge {
                Edge::Node { field, selector, .. } => write!(f, " -{}-> {selector}", field.name)?,
                Edge::Model { field, related } => write!(f, " -{}-> {}", field.name, related.name)?,
            }
        }

        Ok(())
    }
}

///
/// TESTS
///
