//! Typed write arguments for one model: the already-coerced input tree the
//! planner walks. Scalar entries feed row writes; nested entries fan out
//! into per-relation-field mutation groupings.

mod nested;
mod normalize;

pub use nested::{
    NestedConnect, NestedCreate, NestedDelete, NestedDisconnect, NestedMutations, NestedUpdate,
    NestedUpsert,
};
pub use normalize::{NormalizedArgs, normalize_create_args};

use crate::path::NodeSelector;
use quiver_schema::{RelationField, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Non-list scalar arguments, keyed by field name.
pub type NonListArgs = BTreeMap<String, Value>;

/// Scalar-list arguments, keyed by field name.
pub type ScalarListArgs = BTreeMap<String, Vec<Value>>;

///
/// ArgValue
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ArgValue {
    Scalar(Value),
    ScalarList(Vec<Value>),
    Nested(NestedMutations),
}

///
/// WriteArgs
///
/// The typed input map for one model. Ordered by field name so that every
/// split and iteration below is deterministic.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WriteArgs {
    args: BTreeMap<String, ArgValue>,
}

impl WriteArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    #[must_use]
    pub fn set_scalar(mut self, field: impl Into<String>, value: Value) -> Self {
        self.args.insert(field.into(), ArgValue::Scalar(value));
        self
    }

    #[must_use]
    pub fn set_scalar_list(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.args.insert(field.into(), ArgValue::ScalarList(values));
        self
    }

    #[must_use]
    pub fn set_nested(mut self, field: impl Into<String>, nested: NestedMutations) -> Self {
        self.args.insert(field.into(), ArgValue::Nested(nested));
        self
    }

    /// The non-list scalar value for `field`, if present.
    #[must_use]
    pub fn scalar(&self, field: &str) -> Option<&Value> {
        match self.args.get(field) {
            Some(ArgValue::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Split into (non-list, list) scalar arguments in create mode.
    ///
    /// Defaults are injected later by [`normalize_create_args`]; the split
    /// itself only separates shapes.
    #[must_use]
    pub fn create_args(&self) -> (NonListArgs, ScalarListArgs) {
        self.split_scalars()
    }

    /// Split into (non-list, list) scalar arguments in update mode.
    /// No defaults apply; absent fields stay untouched.
    #[must_use]
    pub fn update_args(&self) -> (NonListArgs, ScalarListArgs) {
        self.split_scalars()
    }

    /// Non-list create arguments with the selector key merged in, so a
    /// freshly minted identity becomes part of the persisted row.
    #[must_use]
    pub fn generate_non_list_create_args(&self, selector: &NodeSelector) -> NonListArgs {
        let (mut non_list, _) = self.create_args();
        non_list.insert(selector.field.clone(), selector.value.clone());

        non_list
    }

    /// Only the scalar-list arguments.
    #[must_use]
    pub fn scalar_list_args(&self) -> ScalarListArgs {
        let (_, list) = self.split_scalars();

        list
    }

    /// The nested-mutation payload under one relation field, if any.
    #[must_use]
    pub fn sub_nested_mutation(&self, field: &RelationField) -> Option<&NestedMutations> {
        match self.args.get(&field.name) {
            Some(ArgValue::Nested(nested)) => Some(nested),
            _ => None,
        }
    }

    fn split_scalars(&self) -> (NonListArgs, ScalarListArgs) {
        let mut non_list = NonListArgs::new();
        let mut list = ScalarListArgs::new();

        for (name, value) in &self.args {
            match value {
                ArgValue::Scalar(value) => {
                    non_list.insert(name.clone(), value.clone());
                }
                ArgValue::ScalarList(values) => {
                    list.insert(name.clone(), values.clone());
                }
                ArgValue::Nested(_) => {}
            }
        }

        (non_list, list)
    }
}

///
/// UpsertArgs
///
/// The two argument branches of an upsert. Only the outer upsert mutaction
/// consumes them; neither branch expands its nested payload.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UpsertArgs {
    pub create: WriteArgs,
    pub update: WriteArgs,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{blog_project, node_selector};

    fn sample_args() -> WriteArgs {
        WriteArgs::new()
            .set_scalar("name", Value::from("A"))
            .set_scalar_list("aliases", vec![Value::from("a1"), Value::from("a2")])
            .set_nested("posts", NestedMutations::default())
    }

    #[test]
    fn split_separates_shapes_and_skips_nested() {
        let (non_list, list) = sample_args().create_args();

        assert_eq!(non_list.len(), 1);
        assert_eq!(non_list["name"], Value::from("A"));
        assert_eq!(list.len(), 1);
        assert_eq!(list["aliases"].len(), 2);
    }

    #[test]
    fn generate_non_list_create_args_merges_the_selector_key() {
        let project = blog_project();
        let selector = node_selector(&project.schema, "User", "id", Value::Id("01X".into()));

        let non_list = sample_args().generate_non_list_create_args(&selector);

        assert_eq!(non_list["id"], Value::Id("01X".into()));
        assert_eq!(non_list["name"], Value::from("A"));
    }

    #[test]
    fn selector_key_overrides_a_colliding_argument() {
        let project = blog_project();
        let selector = node_selector(&project.schema, "User", "id", Value::Id("01Y".into()));
        let args = WriteArgs::new().set_scalar("id", Value::from("stale"));

        let non_list = args.generate_non_list_create_args(&selector);

        assert_eq!(non_list["id"], Value::Id("01Y".into()));
    }

    #[test]
    fn sub_nested_mutation_resolves_only_nested_entries() {
        let project = blog_project();
        let user = project.schema.try_model("User").unwrap();
        let posts = user.relation_field("posts").unwrap();
        let profile = user.relation_field("profile").unwrap();

        let args = sample_args();

        assert!(args.sub_nested_mutation(posts).is_some());
        assert!(args.sub_nested_mutation(profile).is_none());
    }

    #[test]
    fn scalar_reads_only_non_list_entries() {
        let args = sample_args();

        assert_eq!(args.scalar("name"), Some(&Value::from("A")));
        assert_eq!(args.scalar("aliases"), None);
        assert_eq!(args.scalar("posts"), None);
    }
}
