use super::*;
use crate::{
    args::{
        NestedConnect, NestedCreate, NestedDelete, NestedDisconnect, NestedMutations,
        NestedUpdate, NestedUpsert,
    },
    error::PlanError,
    id::SequenceIdGenerator,
    obs::sink::{MetricsEvent, MetricsSink, PlanKind},
    test_fixtures::{blog_project, library_project, node_selector, path_for, user_path},
};
use proptest::prelude::*;
use quiver_schema::Value;
use std::sync::Mutex;

///
/// RecordingSink
///

#[derive(Default)]
struct RecordingSink(Mutex<Vec<MetricsEvent>>);

impl RecordingSink {
    fn events(&self) -> Vec<MetricsEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricsEvent) {
        self.0.lock().unwrap().push(event);
    }
}

///
/// NoopSink
///
/// Keeps planner tests off the process-wide counters so they can run in
/// parallel with the metrics tests.
///

struct NoopSink;

const NOOP_SINK: NoopSink = NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _: MetricsEvent) {}
}

fn planner_for<'a>(project: &Arc<Project>, id_gen: &'a dyn IdGenerator) -> MutationPlanner<'a> {
    MutationPlanner::with_sink(Arc::clone(project), id_gen, &NOOP_SINK)
}

fn kinds(out: &[Mutaction]) -> Vec<&'static str> {
    out.iter().map(Mutaction::kind).collect()
}

fn post_selector(project: &Project, id: &str) -> NodeSelector {
    node_selector(&project.schema, "Post", "id", Value::Id(id.to_string()))
}

fn prev(entries: &[(&str, &str)]) -> PreviousValues {
    PreviousValues(
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::from(*v)))
            .collect(),
    )
}

// ─────────────────────────────────────────────
// Top-level create
// ─────────────────────────────────────────────

#[test]
fn create_without_nested_payload_is_a_single_row_write() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new().set_scalar("name", Value::from("A"));
    let out = planner.for_create(&user_path(&project, "user-1"), &args).unwrap();

    assert_eq!(kinds(&out), ["create_data_item"]);
    let Mutaction::CreateDataItem {
        non_list_args,
        list_args,
        ..
    } = &out[0]
    else {
        panic!("expected a create");
    };
    assert_eq!(non_list_args["name"], Value::from("A"));
    assert!(list_args.is_empty());
}

#[test]
fn create_with_nested_create_mints_an_identity_and_links() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new()
        .set_scalar("name", Value::from("A"))
        .set_nested(
            "posts",
            NestedMutations {
                creates: vec![NestedCreate {
                    data: WriteArgs::new().set_scalar("title", Value::from("T")),
                }],
                ..NestedMutations::default()
            },
        );
    let out = planner.for_create(&user_path(&project, "user-1"), &args).unwrap();

    assert_eq!(
        kinds(&out),
        ["create_data_item", "create_data_item", "nested_create_relation"]
    );

    let Mutaction::CreateDataItem {
        path, non_list_args, ..
    } = &out[1]
    else {
        panic!("expected the nested create");
    };
    // The freshly minted identity is injected into the row and pins the edge.
    let minted = non_list_args["id"].clone();
    assert!(matches!(minted, Value::Id(_)));
    assert_eq!(non_list_args["title"], Value::from("T"));
    assert_eq!(path.edges()[0].selector().unwrap().value, minted);

    let Mutaction::NestedCreateRelation {
        path: link_path,
        top_is_create,
        ..
    } = &out[2]
    else {
        panic!("expected the relation link");
    };
    assert!(*top_is_create);
    assert_eq!(link_path, path);
}

#[test]
fn create_missing_a_required_relation_fails() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new().set_scalar("bio", Value::from("x"));
    let err = planner
        .for_create(&path_for(&project, "Profile", "prof-1"), &args)
        .unwrap_err();

    assert_eq!(
        err,
        PlanError::RelationIsRequired {
            field: "user".to_string(),
            model: "Profile".to_string(),
        }
    );
}

#[test]
fn create_satisfies_a_required_relation_through_connect() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let user = node_selector(&project.schema, "User", "id", Value::Id("u1".into()));
    let args = WriteArgs::new().set_scalar("bio", Value::from("x")).set_nested(
        "user",
        NestedMutations {
            connects: vec![NestedConnect {
                selector: user.clone(),
            }],
            ..NestedMutations::default()
        },
    );
    let out = planner
        .for_create(&path_for(&project, "Profile", "prof-1"), &args)
        .unwrap();

    assert_eq!(
        kinds(&out),
        ["create_data_item", "verify_where", "nested_connect_relation"]
    );
    let Mutaction::NestedConnectRelation { top_is_create, .. } = &out[2] else {
        panic!("expected the connect");
    };
    assert!(*top_is_create);
}

#[test]
fn nested_create_descends_as_a_create_context() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    // Post -> tags is optional, so the nested create below plans clean; the
    // grand-child create under it gets its own identity.
    let args = WriteArgs::new()
        .set_scalar("name", Value::from("A"))
        .set_nested(
            "posts",
            NestedMutations {
                creates: vec![NestedCreate {
                    data: WriteArgs::new().set_scalar("title", Value::from("T")).set_nested(
                        "tags",
                        NestedMutations {
                            creates: vec![NestedCreate {
                                data: WriteArgs::new().set_scalar("name", Value::from("t")),
                            }],
                            ..NestedMutations::default()
                        },
                    ),
                }],
                ..NestedMutations::default()
            },
        );
    let out = planner.for_create(&user_path(&project, "user-1"), &args).unwrap();

    assert_eq!(
        kinds(&out),
        [
            "create_data_item",
            "create_data_item",
            "nested_create_relation",
            "create_data_item",
            "nested_create_relation",
        ]
    );

    // The grand-child path is a two-edge prefix-extension of the root.
    let Mutaction::CreateDataItem { path, .. } = &out[3] else {
        panic!("expected the tag create");
    };
    assert_eq!(path.len(), 2);
    assert_eq!(path.last_model().name, "Tag");
    assert_eq!(path.root(), out[0].path().unwrap().root());
}

// ─────────────────────────────────────────────
// Top-level update
// ─────────────────────────────────────────────

#[test]
fn update_with_nested_delete_probes_before_writing() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new().set_nested(
        "posts",
        NestedMutations {
            deletes: vec![NestedDelete::ByWhere {
                selector: post_selector(&project, "p1"),
            }],
            ..NestedMutations::default()
        },
    );
    let out = planner
        .for_update(&user_path(&project, "user-1"), &args, prev(&[("name", "old")]))
        .unwrap();

    assert_eq!(
        kinds(&out),
        [
            "update_data_item",
            "verify_where",
            "verify_connection",
            "delete_relation_check",
            "delete_data_item_nested",
        ]
    );

    let Mutaction::VerifyConnection { path, .. } = &out[2] else {
        panic!("expected the connection probe");
    };
    assert_eq!(path.len(), 1);
    assert_eq!(
        path.edges()[0].selector().unwrap().value,
        Value::Id("p1".into())
    );
}

#[test]
fn update_expands_nested_payload_under_the_updated_root() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new()
        .set_scalar("id", Value::Id("user-2".into()))
        .set_nested(
            "posts",
            NestedMutations {
                connects: vec![NestedConnect {
                    selector: post_selector(&project, "p1"),
                }],
                ..NestedMutations::default()
            },
        );
    let out = planner
        .for_update(&user_path(&project, "user-1"), &args, PreviousValues::default())
        .unwrap();

    // The row write addresses the pre-update identity ...
    let Mutaction::UpdateDataItem { path, .. } = &out[0] else {
        panic!("expected the update");
    };
    assert_eq!(path.root().value, Value::Id("user-1".into()));

    // ... while nested paths address the node it will have become.
    let Mutaction::NestedConnectRelation { path, .. } = &out[2] else {
        panic!("expected the connect");
    };
    assert_eq!(path.root().value, Value::Id("user-2".into()));
}

#[test]
fn nested_update_by_where_repins_to_the_post_update_identity() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let tag = node_selector(&project.schema, "Tag", "id", Value::Id("t1".into()));
    let args = WriteArgs::new().set_nested(
        "posts",
        NestedMutations {
            updates: vec![NestedUpdate::ByWhere {
                selector: post_selector(&project, "p1"),
                data: WriteArgs::new()
                    .set_scalar("id", Value::Id("p1-renamed".into()))
                    .set_nested(
                        "tags",
                        NestedMutations {
                            connects: vec![NestedConnect { selector: tag }],
                            ..NestedMutations::default()
                        },
                    ),
            }],
            ..NestedMutations::default()
        },
    );
    let out = planner
        .for_update(&user_path(&project, "user-1"), &args, PreviousValues::default())
        .unwrap();

    assert_eq!(
        kinds(&out),
        [
            "update_data_item",
            "verify_where",
            "verify_connection",
            "nested_update_data_item",
            "verify_where",
            "nested_connect_relation",
        ]
    );

    // The row write still addresses the pre-update post ...
    let Mutaction::NestedUpdateDataItem { path, .. } = &out[3] else {
        panic!("expected the nested update");
    };
    assert_eq!(
        path.edges()[0].selector().unwrap().value,
        Value::Id("p1".into())
    );

    // ... and the recursion under it addresses the renamed post.
    let Mutaction::NestedConnectRelation { path, .. } = &out[5] else {
        panic!("expected the tag connect");
    };
    assert_eq!(
        path.edges()[0].selector().unwrap().value,
        Value::Id("p1-renamed".into())
    );
    assert_eq!(path.last_model().name, "Tag");
}

#[test]
fn empty_nested_payload_contributes_nothing() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new().set_nested("posts", NestedMutations::default());
    let out = planner
        .for_update(&user_path(&project, "user-1"), &args, PreviousValues::default())
        .unwrap();

    assert_eq!(kinds(&out), ["update_data_item"]);
}

// ─────────────────────────────────────────────
// Ordering contract
// ─────────────────────────────────────────────

#[test]
fn nested_groups_emit_in_contract_order() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new().set_nested(
        "posts",
        NestedMutations {
            creates: vec![NestedCreate {
                data: WriteArgs::new().set_scalar("title", Value::from("new")),
            }],
            connects: vec![NestedConnect {
                selector: post_selector(&project, "p-connect"),
            }],
            disconnects: vec![NestedDisconnect::ByWhere {
                selector: post_selector(&project, "p-disconnect"),
            }],
            deletes: vec![NestedDelete::ByWhere {
                selector: post_selector(&project, "p-delete"),
            }],
            updates: vec![NestedUpdate::ByWhere {
                selector: post_selector(&project, "p-update"),
                data: WriteArgs::new().set_scalar("title", Value::from("renamed")),
            }],
            upserts: vec![NestedUpsert::ByWhere {
                selector: post_selector(&project, "p-upsert"),
                create: WriteArgs::new().set_scalar("title", Value::from("c")),
                update: WriteArgs::new().set_scalar("title", Value::from("u")),
            }],
        },
    );
    let out = planner
        .for_update(&user_path(&project, "user-1"), &args, PreviousValues::default())
        .unwrap();

    assert_eq!(
        kinds(&out),
        [
            "update_data_item",
            // where-probes: updates, deletes, connects, disconnects
            "verify_where",
            "verify_where",
            "verify_where",
            "verify_where",
            // connection-probes: updates, deletes, disconnects
            "verify_connection",
            "verify_connection",
            "verify_connection",
            // create-like group
            "create_data_item",
            "nested_create_relation",
            "nested_connect_relation",
            // the rest
            "nested_disconnect_relation",
            "delete_relation_check",
            "delete_data_item_nested",
            "nested_update_data_item",
            "upsert_data_item_if_in_relation_with",
        ]
    );

    // Probe targets keep child order within each probe block.
    let where_targets: Vec<_> = out[1..5]
        .iter()
        .map(|m| match m {
            Mutaction::VerifyWhere { selector, .. } => selector.value.clone(),
            other => panic!("expected a where-probe, got {}", other.kind()),
        })
        .collect();
    assert_eq!(
        where_targets,
        [
            Value::Id("p-update".into()),
            Value::Id("p-delete".into()),
            Value::Id("p-connect".into()),
            Value::Id("p-disconnect".into()),
        ]
    );
}

#[test]
fn every_emitted_path_extends_the_root() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let root = user_path(&project, "user-1");
    let args = WriteArgs::new()
        .set_scalar("name", Value::from("A"))
        .set_nested(
            "posts",
            NestedMutations {
                creates: vec![
                    NestedCreate {
                        data: WriteArgs::new().set_scalar("title", Value::from("one")),
                    },
                    NestedCreate {
                        data: WriteArgs::new().set_scalar("title", Value::from("two")),
                    },
                ],
                ..NestedMutations::default()
            },
        );
    let out = planner.for_create(&root, &args).unwrap();

    for mutaction in &out {
        if let Some(path) = mutaction.path() {
            assert_eq!(path.root(), root.root(), "in {}", mutaction.kind());
        }
    }
}

// ─────────────────────────────────────────────
// Top-level upsert
// ─────────────────────────────────────────────

#[test]
fn upsert_is_exactly_one_mutaction_with_both_branches() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    // Nested payloads under either branch must not expand.
    let nested = NestedMutations {
        creates: vec![NestedCreate {
            data: WriteArgs::new().set_scalar("title", Value::from("T")),
        }],
        ..NestedMutations::default()
    };
    let args = UpsertArgs {
        create: WriteArgs::new()
            .set_scalar("name", Value::from("A"))
            .set_nested("posts", nested.clone()),
        update: WriteArgs::new()
            .set_scalar("name", Value::from("B"))
            .set_nested("posts", nested),
    };

    let path = user_path(&project, "user-1");
    let create_where = node_selector(&project.schema, "User", "id", Value::Id("u-new".into()));
    let updated_where = node_selector(&project.schema, "User", "id", Value::Id("user-1".into()));
    let out = planner
        .for_upsert(&path, create_where.clone(), updated_where.clone(), &args)
        .unwrap();

    assert_eq!(kinds(&out), ["upsert_data_item"]);
    let Mutaction::UpsertDataItem {
        create_where: cw,
        updated_where: uw,
        create_non_list_args,
        update_non_list_args,
        ..
    } = &out[0]
    else {
        panic!("expected the upsert");
    };
    assert_eq!(cw, &create_where);
    assert_eq!(uw, &updated_where);
    assert_eq!(create_non_list_args["name"], Value::from("A"));
    assert_eq!(update_non_list_args["name"], Value::from("B"));
}

#[test]
fn nested_upsert_is_one_conditional_mutaction() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(7);
    let planner = planner_for(&project, &id_gen);

    let args = WriteArgs::new().set_nested(
        "posts",
        NestedMutations {
            upserts: vec![NestedUpsert::ByWhere {
                selector: post_selector(&project, "p1"),
                create: WriteArgs::new().set_scalar("title", Value::from("fresh")),
                update: WriteArgs::new().set_scalar("id", Value::Id("p1-moved".into())),
            }],
            ..NestedMutations::default()
        },
    );
    let out = planner
        .for_update(&user_path(&project, "user-1"), &args, PreviousValues::default())
        .unwrap();

    assert_eq!(kinds(&out), ["update_data_item", "upsert_data_item_if_in_relation_with"]);

    let Mutaction::UpsertDataItemIfInRelationWith {
        path,
        create_where,
        create_non_list_args,
        path_for_update_branch,
        ..
    } = &out[1]
    else {
        panic!("expected the nested upsert");
    };
    // The create branch persists the minted identity.
    assert_eq!(
        create_non_list_args["id"],
        create_where.value.clone()
    );
    assert_eq!(create_non_list_args["title"], Value::from("fresh"));
    // The outer path still addresses the existing node; the update branch
    // addresses the identity the update itself installs.
    assert_eq!(
        path.edges()[0].selector().unwrap().value,
        Value::Id("p1".into())
    );
    assert_eq!(
        path_for_update_branch.edges()[0].selector().unwrap().value,
        Value::Id("p1-moved".into())
    );
}

// ─────────────────────────────────────────────
// Top-level delete and cascading deletes
// ─────────────────────────────────────────────

#[test]
fn delete_verifies_then_cascades_deepest_first_then_deletes() {
    let project = library_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let path = path_for(&project, "Author", "author-1");
    let out = planner.for_delete(&path, prev(&[("name", "gone")])).unwrap();

    assert_eq!(
        kinds(&out),
        [
            "verify_where",
            "cascading_delete_relation",
            "cascading_delete_relation",
            "delete_relation_check",
            "delete_data_item",
        ]
    );

    // Deepest first: Author -> books -> chapters before Author -> books.
    let depths: Vec<usize> = out[1..3]
        .iter()
        .map(|m| m.path().unwrap().len())
        .collect();
    assert_eq!(depths, [2, 1]);

    let Mutaction::VerifyWhere { selector, .. } = &out[0] else {
        panic!("expected the root probe");
    };
    assert_eq!(selector, path.root());
}

#[test]
fn delete_without_cascades_is_probe_check_delete() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let out = planner
        .for_delete(&user_path(&project, "user-1"), PreviousValues::default())
        .unwrap();

    assert_eq!(
        kinds(&out),
        ["verify_where", "delete_relation_check", "delete_data_item"]
    );
}

#[test]
fn nested_delete_cascades_from_the_extended_path() {
    let project = library_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = planner_for(&project, &id_gen);

    let book = node_selector(&project.schema, "Book", "id", Value::Id("b1".into()));
    let args = WriteArgs::new().set_nested(
        "books",
        NestedMutations {
            deletes: vec![NestedDelete::ByWhere { selector: book }],
            ..NestedMutations::default()
        },
    );
    let out = planner
        .for_update(&path_for(&project, "Author", "author-1"), &args, PreviousValues::default())
        .unwrap();

    assert_eq!(
        kinds(&out),
        [
            "update_data_item",
            "verify_where",
            "verify_connection",
            "cascading_delete_relation",
            "delete_relation_check",
            "delete_data_item_nested",
        ]
    );

    // The cascade cleans Author -> books#b1 -> chapters.
    let Mutaction::CascadingDeleteRelationMutactions { path, .. } = &out[3] else {
        panic!("expected the cascade cleanup");
    };
    assert_eq!(path.len(), 2);
    assert_eq!(path.last_model().name, "Chapter");
}

#[test]
fn cascading_delete_alone_is_empty_without_cascades() {
    let blog = blog_project();
    let library = library_project();
    let id_gen = SequenceIdGenerator::new(0);

    let planner = planner_for(&blog, &id_gen);
    assert!(planner
        .cascading_delete(&user_path(&blog, "user-1"))
        .unwrap()
        .is_empty());

    let planner = planner_for(&library, &id_gen);
    assert_eq!(
        planner
            .cascading_delete(&path_for(&library, "Author", "author-1"))
            .unwrap()
            .len(),
        2
    );
}

// ─────────────────────────────────────────────
// Metrics
// ─────────────────────────────────────────────

#[test]
fn the_counter_advances_by_the_emitted_length() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let sink = RecordingSink::default();
    let planner = MutationPlanner::with_sink(Arc::clone(&project), &id_gen, &sink);

    let args = WriteArgs::new()
        .set_scalar("name", Value::from("A"))
        .set_nested(
            "posts",
            NestedMutations {
                creates: vec![NestedCreate {
                    data: WriteArgs::new().set_scalar("title", Value::from("T")),
                }],
                ..NestedMutations::default()
            },
        );
    let out = planner.for_create(&user_path(&project, "user-1"), &args).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        MetricsEvent::PlanStart {
            kind: PlanKind::Create,
            ..
        }
    ));
    let MetricsEvent::MutactionsPlanned { count, ref project_id } = events[1] else {
        panic!("expected the planned count");
    };
    assert_eq!(count, out.len() as u64);
    assert_eq!(project_id.as_str(), "blog-project");
}

#[test]
fn failed_plans_record_the_attempt_only() {
    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let sink = RecordingSink::default();
    let planner = MutationPlanner::with_sink(Arc::clone(&project), &id_gen, &sink);

    let args = WriteArgs::new().set_scalar("bio", Value::from("x"));
    planner
        .for_create(&path_for(&project, "Profile", "prof-1"), &args)
        .unwrap_err();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], MetricsEvent::PlanStart { .. }));
}

#[test]
fn cascading_delete_reports_resolved_paths() {
    let project = library_project();
    let id_gen = SequenceIdGenerator::new(0);
    let sink = RecordingSink::default();
    let planner = MutationPlanner::with_sink(Arc::clone(&project), &id_gen, &sink);

    planner
        .cascading_delete(&path_for(&project, "Author", "author-1"))
        .unwrap();

    let events = sink.events();
    assert!(matches!(
        events[0],
        MetricsEvent::PlanStart {
            kind: PlanKind::Cascade,
            ..
        }
    ));
    assert!(matches!(events[1], MetricsEvent::MutactionsPlanned { count: 2, .. }));
    assert!(matches!(events[2], MetricsEvent::CascadePathsResolved { paths: 2, .. }));
}

#[test]
fn the_default_sink_feeds_process_counters() {
    let _guard = crate::obs::metrics::TEST_STATE_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    crate::obs::metrics_reset();

    let project = blog_project();
    let id_gen = SequenceIdGenerator::new(0);
    let planner = MutationPlanner::new(Arc::clone(&project), &id_gen);

    let args = WriteArgs::new().set_scalar("name", Value::from("A"));
    let out = planner.for_create(&user_path(&project, "user-1"), &args).unwrap();

    let counters = crate::obs::metrics_report().counters;
    assert_eq!(counters.ops.plan_create_calls, 1);
    assert_eq!(counters.ops.mutactions_planned, out.len() as u64);
    assert_eq!(counters.projects["blog-project"].plan_calls, 1);
}

// ─────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────

fn nested_create_tree(posts: &[(String, Vec<String>)]) -> WriteArgs {
    let creates = posts
        .iter()
        .map(|(title, tags)| {
            let tag_creates = tags
                .iter()
                .map(|name| NestedCreate {
                    data: WriteArgs::new().set_scalar("name", Value::from(name.as_str())),
                })
                .collect::<Vec<_>>();

            let mut data = WriteArgs::new().set_scalar("title", Value::from(title.as_str()));
            if !tag_creates.is_empty() {
                data = data.set_nested(
                    "tags",
                    NestedMutations {
                        creates: tag_creates,
                        ..NestedMutations::default()
                    },
                );
            }

            NestedCreate { data }
        })
        .collect::<Vec<_>>();

    let mut args = WriteArgs::new().set_scalar("name", Value::from("root"));
    if !creates.is_empty() {
        args = args.set_nested(
            "posts",
            NestedMutations {
                creates,
                ..NestedMutations::default()
            },
        );
    }

    args
}

proptest! {
    #[test]
    fn equal_inputs_and_seed_produce_identical_vectors(
        posts in proptest::collection::vec(
            ("[a-z]{1,8}", proptest::collection::vec("[a-z]{1,8}", 0..3)),
            0..3,
        ),
        seed in 0u64..1_000,
    ) {
        let project = blog_project();
        let path = user_path(&project, "user-1");
        let args = nested_create_tree(&posts);

        let first_ids = SequenceIdGenerator::new(seed);
        let first = planner_for(&project, &first_ids)
            .for_create(&path, &args)
            .unwrap();

        let second_ids = SequenceIdGenerator::new(seed);
        let second = planner_for(&project, &second_ids)
            .for_create(&path, &args)
            .unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn create_trees_emit_two_mutactions_per_nested_create(
        posts in proptest::collection::vec(
            ("[a-z]{1,8}", proptest::collection::vec("[a-z]{1,8}", 0..3)),
            0..3,
        ),
    ) {
        let project = blog_project();
        let path = user_path(&project, "user-1");
        let args = nested_create_tree(&posts);
        let id_gen = SequenceIdGenerator::new(0);

        let out = planner_for(&project, &id_gen)
            .for_create(&path, &args)
            .unwrap();

        let nested_creates: usize =
            posts.iter().map(|(_, tags)| 1 + tags.len()).sum();
        prop_assert_eq!(out.len(), 1 + 2 * nested_creates);

        // Every nested row write is immediately followed by its relation link.
        for (i, mutaction) in out.iter().enumerate().skip(1) {
            if matches!(mutaction, Mutaction::CreateDataItem { .. }) {
                prop_assert!(
                    matches!(out[i + 1], Mutaction::NestedCreateRelation { .. }),
                    "expected NestedCreateRelation after CreateDataItem at index {i}"
                );
            }
        }
    }
}
