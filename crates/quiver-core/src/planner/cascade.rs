//! Cascading delete resolution: enumerate every relation path reachable
//! from a deletion start point whose edges cascade on the traversed side,
//! then emit one relation-cleanup mutaction per edge, deepest first.

use crate::{error::InternalError, mutaction::Mutaction, path::Path};
use quiver_schema::{Project, Schema};
use std::sync::Arc;

/// All paths formed by extending `start` along chains of cascading relation
/// edges: the transitive closure, `start` included, in depth-first
/// discovery order. A path never crosses the same relation twice, which
/// bounds the walk on cyclic schemas.
pub(crate) fn collect_cascading_paths(
    schema: &Schema,
    start: &Path,
) -> Result<Vec<Path>, InternalError> {
    let mut paths = vec![start.clone()];
    collect_from(schema, start, &mut paths)?;

    Ok(paths)
}

fn collect_from(schema: &Schema, current: &Path, acc: &mut Vec<Path>) -> Result<(), InternalError> {
    for field in current.relation_fields_not_on_path_on_last_model(schema) {
        if !field.cascades() {
            continue;
        }
        if current.traverses_relation(&field.relation) {
            continue;
        }

        let next = current.extend(schema, &field, None)?;
        acc.push(next.clone());
        collect_from(schema, &next, acc)?;
    }

    Ok(())
}

/// Emit relation-cleanup mutactions for every cascading path beyond
/// `start`, deepest first. Trimmed prefixes re-enter the worklist with set
/// semantics, so every edge contributes exactly one cleanup and deeper
/// edges are cleaned before the shallower edges they depend on. Ties within
/// one depth keep discovery order.
pub(crate) fn expand(project: &Arc<Project>, start: &Path) -> Result<Vec<Mutaction>, InternalError> {
    let paths = collect_cascading_paths(&project.schema, start)?;

    let mut queue: Vec<Path> = paths
        .into_iter()
        .filter(|path| path.len() > start.len())
        .collect();
    let mut out = Vec::new();

    while let Some(deepest) = queue.iter().map(Path::len).max() {
        let (longest, mut rest): (Vec<Path>, Vec<Path>) =
            queue.into_iter().partition(|path| path.len() == deepest);

        for path in &longest {
            out.push(Mutaction::CascadingDeleteRelationMutactions {
                project: Arc::clone(project),
                path: path.clone(),
            });
        }
        for path in longest {
            let trimmed = path.remove_last_edge();
            if trimmed.len() > start.len() && !rest.contains(&trimmed) {
                rest.push(trimmed);
            }
        }

        queue = rest;
    }

    Ok(out)
}

///
/// TESTS
///
