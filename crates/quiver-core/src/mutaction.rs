//! The output alphabet: primitive, executor-level writes and checks. The
//! planner hands the executor one totally ordered vector of these; the
//! executor runs them inside a single transaction and aborts on any failed
//! verification.

use crate::{
    args::{NonListArgs, NormalizedArgs, ScalarListArgs},
    path::{NodeSelector, Path},
};
use quiver_schema::{Project, Value};
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};

///
/// PreviousValues
///
/// Scalar snapshot of a node before a top-level update or delete. Carried
/// opaquely for the executor's returning-clause and audit needs.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PreviousValues(pub BTreeMap<String, Value>);

///
/// Mutaction
///
/// Every variant carries the project it belongs to plus the path (or
/// selector) addressing its target. Probes (`VerifyWhere`,
/// `VerifyConnection`, `DeleteRelationCheck`) resolve against live data on
/// the executor side; the planner makes no assumption about their outcome.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Mutaction {
    /// Abort the transaction unless the selector resolves to a node.
    VerifyWhere {
        project: Arc<Project>,
        selector: NodeSelector,
    },

    /// Abort the transaction unless the path's tail node is actually
    /// connected along the path's relations.
    VerifyConnection {
        project: Arc<Project>,
        path: Path,
    },

    CreateDataItem {
        project: Arc<Project>,
        path: Path,
        non_list_args: NormalizedArgs,
        list_args: ScalarListArgs,
    },

    UpdateDataItem {
        project: Arc<Project>,
        path: Path,
        non_list_args: NonListArgs,
        list_args: ScalarListArgs,
        previous_values: PreviousValues,
    },

    UpsertDataItem {
        project: Arc<Project>,
        path: Path,
        create_where: NodeSelector,
        updated_where: NodeSelector,
        create_non_list_args: NormalizedArgs,
        create_list_args: ScalarListArgs,
        update_non_list_args: NonListArgs,
        update_list_args: ScalarListArgs,
    },

    UpsertDataItemIfInRelationWith {
        project: Arc<Project>,
        path: Path,
        create_where: NodeSelector,
        create_non_list_args: NormalizedArgs,
        create_list_args: ScalarListArgs,
        update_non_list_args: NonListArgs,
        update_list_args: ScalarListArgs,
        /// The update branch addresses the node through this path, which
        /// reflects any identity change the update itself performs.
        path_for_update_branch: Path,
    },

    DeleteDataItem {
        project: Arc<Project>,
        path: Path,
        previous_values: PreviousValues,
    },

    DeleteDataItemNested {
        project: Arc<Project>,
        path: Path,
    },

    /// Abort when a required relation would dangle after the delete.
    DeleteRelationCheck {
        project: Arc<Project>,
        path: Path,
    },

    NestedCreateRelation {
        project: Arc<Project>,
        path: Path,
        top_is_create: bool,
    },

    NestedConnectRelation {
        project: Arc<Project>,
        path: Path,
        top_is_create: bool,
    },

    NestedDisconnectRelation {
        project: Arc<Project>,
        path: Path,
    },

    NestedUpdateDataItem {
        project: Arc<Project>,
        path: Path,
        non_list_args: NonListArgs,
        list_args: ScalarListArgs,
    },

    /// Relation cleanup for one cascading path; expanded by the executor
    /// into the unlink/delete work for every node along the tail edge.
    CascadingDeleteRelationMutactions {
        project: Arc<Project>,
        path: Path,
    },
}

impl Mutaction {
    /// Stable variant label for diagnostics and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::VerifyWhere { .. } => "verify_where",
            Self::VerifyConnection { .. } => "verify_connection",
            Self::CreateDataItem { .. } => "create_data_item",
            Self::UpdateDataItem { .. } => "update_data_item",
            Self::UpsertDataItem { .. } => "upsert_data_item",
            Self::UpsertDataItemIfInRelationWith { .. } => "upsert_data_item_if_in_relation_with",
            Self::DeleteDataItem { .. } => "delete_data_item",
            Self::DeleteDataItemNested { .. } => "delete_data_item_nested",
            Self::DeleteRelationCheck { .. } => "delete_relation_check",
            Self::NestedCreateRelation { .. } => "nested_create_relation",
            Self::NestedConnectRelation { .. } => "nested_connect_relation",
            Self::NestedDisconnectRelation { .. } => "nested_disconnect_relation",
            Self::NestedUpdateDataItem { .. } => "nested_update_data_item",
            Self::CascadingDeleteRelationMutactions { .. } => "cascading_delete_relation",
        }
    }

    /// Is this a verification probe rather than a write?
    #[must_use]
    pub const fn is_probe(&self) -> bool {
        matches!(
            self,
            Self::VerifyWhere { .. } | Self::VerifyConnection { .. } | Self::DeleteRelationCheck { .. }
        )
    }

    /// The path this mutaction addresses. Only `VerifyWhere` carries a
    /// bare selector instead.
    #[must_use]
    pub const fn path(&self) -> Option<&Path> {
        match self {
            Self::VerifyWhere { .. } => None,
            Self::VerifyConnection { path, .. }
            | Self::CreateDataItem { path, .. }
            | Self::UpdateDataItem { path, .. }
            | Self::UpsertDataItem { path, .. }
            | Self::UpsertDataItemIfInRelationWith { path, .. }
            | Self::DeleteDataItem { path, .. }
            | Self::DeleteDataItemNested { path, .. }
            | Self::DeleteRelationCheck { path, .. }
            | Self::NestedCreateRelation { path, .. }
            | Self::NestedConnectRelation { path, .. }
            | Self::NestedDisconnectRelation { path, .. }
            | Self::NestedUpdateDataItem { path, .. }
            | Self::CascadingDeleteRelationMutactions { path, .. } => Some(path),
        }
    }
}

///
/// TESTS
///
