//! The nested expander: one pass over every relation field visible from
//! the current path, emitting probes first, then create-like children,
//! then the remaining groups, in the order the executor contract fixes.

use crate::{
    args::{
        NestedCreate, NestedMutations, NestedUpdate, NestedUpsert, WriteArgs, normalize_create_args,
    },
    error::PlanError,
    mutaction::Mutaction,
    path::{NodeSelector, Path},
    planner::{MutationPlanner, cascade},
};
use quiver_schema::RelationField;
use std::sync::Arc;

/// Expand every nested mutation reachable from `path` into primitive
/// mutactions, in the contract order: where-probes, connection-probes,
/// creates, connects, disconnects, deletes, updates, upserts. Recursion
/// into a child's own payload lands immediately after that child's
/// primitives.
pub(crate) fn expand(
    planner: &MutationPlanner<'_>,
    args: &WriteArgs,
    path: &Path,
    triggered_from_create: bool,
) -> Result<Vec<Mutaction>, PlanError> {
    let project = planner.project();
    let schema = &project.schema;
    let mut out = Vec::new();

    for field in path.relation_fields_not_on_path_on_last_model(schema) {
        let sub = args.sub_nested_mutation(&field);

        // A freshly created node must satisfy every mandatory outbound
        // relation through a nested create or connect.
        let has_create_like = sub.is_some_and(NestedMutations::has_create_like);
        if triggered_from_create && field.is_required && !has_create_like {
            return Err(PlanError::relation_is_required(
                field.name.clone(),
                path.last_model().name.clone(),
            ));
        }

        let Some(sub) = sub else { continue };
        if sub.is_empty() {
            continue;
        }

        // Where-probes: every by-where child that a write below will
        // address. Duplicate selectors are emitted as-is.
        let where_probes = sub
            .updates
            .iter()
            .filter_map(NestedUpdate::selector)
            .chain(sub.deletes.iter().filter_map(|d| d.selector()))
            .chain(sub.connects.iter().map(|c| &c.selector))
            .chain(sub.disconnects.iter().filter_map(|d| d.selector()));
        for selector in where_probes {
            out.push(Mutaction::VerifyWhere {
                project: Arc::clone(project),
                selector: selector.clone(),
            });
        }

        // Connection-probes: the child must already be linked through this
        // relation field before it can be updated, deleted, or detached.
        let connection_probes = sub
            .updates
            .iter()
            .map(NestedUpdate::selector)
            .chain(sub.deletes.iter().map(|d| d.selector()))
            .chain(sub.disconnects.iter().map(|d| d.selector()));
        for selector in connection_probes {
            out.push(Mutaction::VerifyConnection {
                project: Arc::clone(project),
                path: path.extend(schema, &field, selector.cloned())?,
            });
        }

        for create in &sub.creates {
            expand_create(planner, &mut out, path, &field, create, triggered_from_create)?;
        }

        for connect in &sub.connects {
            out.push(Mutaction::NestedConnectRelation {
                project: Arc::clone(project),
                path: path.extend(schema, &field, Some(connect.selector.clone()))?,
                top_is_create: triggered_from_create,
            });
        }

        for disconnect in &sub.disconnects {
            out.push(Mutaction::NestedDisconnectRelation {
                project: Arc::clone(project),
                path: path.extend(schema, &field, disconnect.selector().cloned())?,
            });
        }

        for delete in &sub.deletes {
            let extended = path.extend(schema, &field, delete.selector().cloned())?;
            out.extend(cascade::expand(project, &extended)?);
            out.push(Mutaction::DeleteRelationCheck {
                project: Arc::clone(project),
                path: extended.clone(),
            });
            out.push(Mutaction::DeleteDataItemNested {
                project: Arc::clone(project),
                path: extended,
            });
        }

        for update in &sub.updates {
            expand_update(planner, &mut out, path, &field, update)?;
        }

        for upsert in &sub.upserts {
            expand_upsert(planner, &mut out, path, &field, upsert)?;
        }
    }

    Ok(out)
}

/// One nested create: mint the identity, pin the new edge to it, persist
/// the row with the identity merged in, link the relation, then recurse as
/// a create context.
fn expand_create(
    planner: &MutationPlanner<'_>,
    out: &mut Vec<Mutaction>,
    path: &Path,
    field: &Arc<RelationField>,
    create: &NestedCreate,
    triggered_from_create: bool,
) -> Result<(), PlanError> {
    let project = planner.project();
    let schema = &project.schema;

    let new_id = planner.id_gen().generate();
    let related = schema.related_model(field)?;
    let create_where = NodeSelector::for_id(Arc::clone(&related), &new_id);

    let extended = path
        .extend(schema, field, None)?
        .last_edge_to_node_edge(create_where.clone())?;

    let non_list = create.data.generate_non_list_create_args(&create_where);
    let list = create.data.scalar_list_args();

    out.push(Mutaction::CreateDataItem {
        project: Arc::clone(project),
        path: extended.clone(),
        non_list_args: normalize_create_args(&related, non_list)?,
        list_args: list,
    });
    out.push(Mutaction::NestedCreateRelation {
        project: Arc::clone(project),
        path: extended.clone(),
        top_is_create: triggered_from_create,
    });

    out.extend(expand(planner, &create.data, &extended, true)?);

    Ok(())
}

/// One nested update. A by-where child repins the tail to the post-update
/// identity before recursing, so deeper edges address the node it will
/// have become.
fn expand_update(
    planner: &MutationPlanner<'_>,
    out: &mut Vec<Mutaction>,
    path: &Path,
    field: &Arc<RelationField>,
    update: &NestedUpdate,
) -> Result<(), PlanError> {
    let project = planner.project();
    let schema = &project.schema;

    let extended = path.extend(schema, field, update.selector().cloned())?;
    let updated_path = match update {
        NestedUpdate::ByWhere { selector, data } => {
            extended.last_edge_to_node_edge(selector.updated_by(data))?
        }
        NestedUpdate::ByRelation { .. } => extended.clone(),
    };

    let (non_list, list) = update.data().update_args();
    out.push(Mutaction::NestedUpdateDataItem {
        project: Arc::clone(project),
        path: extended,
        non_list_args: non_list,
        list_args: list,
    });

    out.extend(expand(planner, update.data(), &updated_path, false)?);

    Ok(())
}

/// One nested upsert: a single conditional mutaction carrying both arg
/// branches. Nested payloads under either branch are intentionally not
/// expanded; until both-branch semantics are settled, only the outer
/// upsert executes.
fn expand_upsert(
    planner: &MutationPlanner<'_>,
    out: &mut Vec<Mutaction>,
    path: &Path,
    field: &Arc<RelationField>,
    upsert: &NestedUpsert,
) -> Result<(), PlanError> {
    let project = planner.project();
    let schema = &project.schema;

    let extended = path.extend(schema, field, upsert.selector().cloned())?;

    let new_id = planner.id_gen().generate();
    let related = Arc::clone(extended.last_model());
    let create_where = NodeSelector::for_id(Arc::clone(&related), &new_id);
    let create_args_with_id = upsert.create().generate_non_list_create_args(&create_where);

    let path_for_update_branch = match upsert {
        NestedUpsert::ByWhere {
            selector, update, ..
        } => extended.last_edge_to_node_edge(selector.updated_by(update))?,
        NestedUpsert::ByRelation { .. } => extended.clone(),
    };

    let (update_non_list, update_list) = upsert.update().update_args();

    out.push(Mutaction::UpsertDataItemIfInRelationWith {
        project: Arc::clone(project),
        path: extended,
        create_where,
        create_non_list_args: normalize_create_args(&related, create_args_with_id)?,
        create_list_args: upsert.create().scalar_list_args(),
        update_non_list_args: update_non_list,
        update_list_args: update_list,
        path_for_update_branch,
    });

    Ok(())
}
