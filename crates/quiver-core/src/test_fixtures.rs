//! Shared schema fixtures for planner, path, and cascade tests.

use crate::path::{NodeSelector, Path};
use quiver_schema::{ModelBuilder, Project, Relation, ScalarField, Schema, TypeIdent, Value};
use std::sync::Arc;

/// Blog schema: no cascading relations.
///
/// - `User`: `posts: [Post]`, `profile: Profile?`
/// - `Post`: `user: User!` (inverse of posts), `tags: [Tag]`
/// - `Profile`: `user: User!` (required outbound, exercises the
///   required-relation check)
/// - `Tag`: no outbound relations
pub(crate) fn blog_project() -> Arc<Project> {
    let schema = Schema::builder()
        .relation(Relation::new("PostToUser", "Post", "User"))
        .relation(Relation::new("ProfileToUser", "Profile", "User"))
        .relation(Relation::new("TagToPost", "Tag", "Post"))
        .model(
            ModelBuilder::new("User")
                .id("id")
                .scalar(ScalarField::new("name", TypeIdent::String).required())
                .relation_list("posts", "Post", "PostToUser")
                .relation("profile", "Profile", "ProfileToUser"),
        )
        .model(
            ModelBuilder::new("Post")
                .id("id")
                .scalar(ScalarField::new("title", TypeIdent::String))
                .required_relation("user", "User", "PostToUser")
                .relation_list("tags", "Tag", "TagToPost"),
        )
        .model(
            ModelBuilder::new("Profile")
                .id("id")
                .scalar(ScalarField::new("bio", TypeIdent::String))
                .required_relation("user", "User", "ProfileToUser"),
        )
        .model(
            ModelBuilder::new("Tag")
                .id("id")
                .scalar(ScalarField::new("name", TypeIdent::String)),
        )
        .build()
        .expect("blog schema should build");

    Arc::new(Project::new("blog-project", schema))
}

/// Library schema: `Author -books-> Book -chapters-> Chapter`, both hops
/// cascading from the parent side.
pub(crate) fn library_project() -> Arc<Project> {
    let schema = Schema::builder()
        .relation(Relation::new("BookToAuthor", "Author", "Book").cascade_from_a())
        .relation(Relation::new("ChapterToBook", "Book", "Chapter").cascade_from_a())
        .model(
            ModelBuilder::new("Author")
                .id("id")
                .scalar(ScalarField::new("name", TypeIdent::String))
                .relation_list("books", "Book", "BookToAuthor"),
        )
        .model(
            ModelBuilder::new("Book")
                .id("id")
                .scalar(ScalarField::new("title", TypeIdent::String))
                .relation("author", "Author", "BookToAuthor")
                .relation_list("chapters", "Chapter", "ChapterToBook"),
        )
        .model(
            ModelBuilder::new("Chapter")
                .id("id")
                .scalar(ScalarField::new("title", TypeIdent::String))
                .relation("book", "Book", "ChapterToBook"),
        )
        .build()
        .expect("library schema should build");

    Arc::new(Project::new("library-project", schema))
}

/// Two models cascading into each other through two distinct relations;
/// exercises cascade termination on cyclic schemas.
pub(crate) fn tangle_project() -> Arc<Project> {
    let schema = Schema::builder()
        .relation(Relation::new("YinToYang", "Yin", "Yang").cascade_from_a())
        .relation(Relation::new("YangToYin", "Yang", "Yin").cascade_from_a())
        .model(
            ModelBuilder::new("Yin")
                .id("id")
                .relation("yang", "Yang", "YinToYang"),
        )
        .model(
            ModelBuilder::new("Yang")
                .id("id")
                .relation("yin", "Yin", "YangToYin"),
        )
        .build()
        .expect("tangle schema should build");

    Arc::new(Project::new("tangle-project", schema))
}

pub(crate) fn node_selector(
    schema: &Schema,
    model_name: &str,
    field: &str,
    value: Value,
) -> NodeSelector {
    let model = schema
        .try_model(model_name)
        .expect("fixture model should exist");

    NodeSelector::new(model, field, value)
}

/// A root path standing on `model_name`, selected by id.
pub(crate) fn path_for(project: &Project, model_name: &str, id: &str) -> Path {
    Path::new(node_selector(
        &project.schema,
        model_name,
        "id",
        Value::Id(id.to_string()),
    ))
}

pub(crate) fn user_path(project: &Project, id: &str) -> Path {
    path_for(project, "User", id)
}
