use crate::{args::WriteArgs, path::NodeSelector};
use serde::Serialize;

///
/// NestedMutations
///
/// The per-relation-field grouping of nested write fragments under one
/// parent mutation. Each child addresses its target either *by where*
/// (a node selector) or *by relation* (the single node already linked
/// through the parent's relation field).
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NestedMutations {
    pub creates: Vec<NestedCreate>,
    pub connects: Vec<NestedConnect>,
    pub disconnects: Vec<NestedDisconnect>,
    pub deletes: Vec<NestedDelete>,
    pub updates: Vec<NestedUpdate>,
    pub upserts: Vec<NestedUpsert>,
}

impl NestedMutations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty()
            && self.connects.is_empty()
            && self.disconnects.is_empty()
            && self.deletes.is_empty()
            && self.updates.is_empty()
            && self.upserts.is_empty()
    }

    /// Does this grouping carry anything a parent create can link against?
    #[must_use]
    pub fn has_create_like(&self) -> bool {
        !self.creates.is_empty() || !self.connects.is_empty()
    }
}

///
/// NestedCreate
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NestedCreate {
    pub data: WriteArgs,
}

///
/// NestedConnect
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NestedConnect {
    pub selector: NodeSelector,
}

///
/// NestedDisconnect
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NestedDisconnect {
    ByWhere { selector: NodeSelector },
    ByRelation,
}

impl NestedDisconnect {
    #[must_use]
    pub const fn selector(&self) -> Option<&NodeSelector> {
        match self {
            Self::ByWhere { selector } => Some(selector),
            Self::ByRelation => None,
        }
    }
}

///
/// NestedDelete
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NestedDelete {
    ByWhere { selector: NodeSelector },
    ByRelation,
}

impl NestedDelete {
    #[must_use]
    pub const fn selector(&self) -> Option<&NodeSelector> {
        match self {
            Self::ByWhere { selector } => Some(selector),
            Self::ByRelation => None,
        }
    }
}

///
/// NestedUpdate
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NestedUpdate {
    ByWhere {
        selector: NodeSelector,
        data: WriteArgs,
    },
    ByRelation {
        data: WriteArgs,
    },
}

impl NestedUpdate {
    #[must_use]
    pub const fn selector(&self) -> Option<&NodeSelector> {
        match self {
            Self::ByWhere { selector, .. } => Some(selector),
            Self::ByRelation { .. } => None,
        }
    }

    #[must_use]
    pub const fn data(&self) -> &WriteArgs {
        match self {
            Self::ByWhere { data, .. } | Self::ByRelation { data } => data,
        }
    }
}

///
/// NestedUpsert
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NestedUpsert {
    ByWhere {
        selector: NodeSelector,
        create: WriteArgs,
        update: WriteArgs,
    },
    ByRelation {
        create: WriteArgs,
        update: WriteArgs,
    },
}

impl NestedUpsert {
    #[must_use]
    pub const fn selector(&self) -> Option<&NodeSelector> {
        match self {
            Self::ByWhere { selector, .. } => Some(selector),
            Self::ByRelation { .. } => None,
        }
    }

    #[must_use]
    pub const fn create(&self) -> &WriteArgs {
        match self {
            Self::ByWhere { create, .. } | Self::ByRelation { create, .. } => create,
        }
    }

    #[must_use]
    pub const fn update(&self) -> &WriteArgs {
        match self {
            Self::ByWhere { update, .. } | Self::ByRelation { update, .. } => update,
        }
    }
}
