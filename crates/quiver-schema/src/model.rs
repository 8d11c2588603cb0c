use crate::{
    error::SchemaError,
    field::{RelationField, ScalarField, TypeIdent},
    relation::Relation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

///
/// Model
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Model {
    pub name: String,
    pub scalar_fields: Vec<ScalarField>,
    pub relation_fields: Vec<Arc<RelationField>>,
}

impl Model {
    #[must_use]
    pub fn scalar_field(&self, name: &str) -> Option<&ScalarField> {
        self.scalar_fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn relation_field(&self, name: &str) -> Option<&Arc<RelationField>> {
        self.relation_fields.iter().find(|f| f.name == name)
    }

    /// The identity scalar of this model.
    #[must_use]
    pub fn id_field(&self) -> Option<&ScalarField> {
        self.scalar_fields.iter().find(|f| f.is_id())
    }

    /// Name of the identity scalar.
    ///
    /// Validated schemas always carry one; the conventional `id` name is
    /// used for models constructed outside [`SchemaBuilder::build`].
    #[must_use]
    pub fn id_field_name(&self) -> &str {
        self.id_field().map_or("id", |f| f.name.as_str())
    }
}

///
/// Schema
///
/// The read-only model graph. Built once via [`SchemaBuilder`], then shared
/// behind `Arc`s; every lookup the planner performs goes through here.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Schema {
    models: Vec<Arc<Model>>,
    relations: Vec<Arc<Relation>>,
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    #[must_use]
    pub fn models(&self) -> &[Arc<Model>] {
        &self.models
    }

    #[must_use]
    pub fn relations(&self) -> &[Arc<Relation>] {
        &self.relations
    }

    #[must_use]
    pub fn model(&self, name: &str) -> Option<Arc<Model>> {
        self.models.iter().find(|m| m.name == name).cloned()
    }

    pub fn try_model(&self, name: &str) -> Result<Arc<Model>, SchemaError> {
        self.model(name).ok_or_else(|| SchemaError::UnknownModel {
            model: name.to_string(),
        })
    }

    /// Resolve the model on the far side of a relation field.
    pub fn related_model(&self, field: &RelationField) -> Result<Arc<Model>, SchemaError> {
        self.try_model(&field.related_model)
    }

    /// Resolve the inverse field of `field`, when the far model declares one.
    #[must_use]
    pub fn related_field(&self, field: &RelationField) -> Option<Arc<RelationField>> {
        let related = self.model(&field.related_model)?;

        related
            .relation_fields
            .iter()
            .find(|candidate| field.is_inverse_of(candidate))
            .cloned()
    }
}

///
/// SchemaBuilder
///
/// Declare relations once, reference them from model fields by name, then
/// `build()` resolves the graph and validates referential closure: every
/// related model exists, every relation name resolves, the owning model is
/// a side of its relation, and every model has an identity field.
///

#[derive(Default)]
pub struct SchemaBuilder {
    models: Vec<ModelBuilder>,
    relations: Vec<Relation>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    #[must_use]
    pub fn model(mut self, model: ModelBuilder) -> Self {
        self.models.push(model);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let relations: Vec<Arc<Relation>> = self.relations.into_iter().map(Arc::new).collect();
        let model_names: Vec<String> = self.models.iter().map(|m| m.name.clone()).collect();

        let mut models = Vec::with_capacity(self.models.len());
        for builder in self.models {
            if !builder.scalars.iter().any(ScalarField::is_id) {
                return Err(SchemaError::MissingIdField {
                    model: builder.name,
                });
            }

            let mut relation_fields = Vec::with_capacity(builder.relations.len());
            for decl in builder.relations {
                if !model_names.iter().any(|name| *name == decl.related_model) {
                    return Err(SchemaError::UnknownModel {
                        model: decl.related_model,
                    });
                }
                let relation = relations
                    .iter()
                    .find(|r| r.name == decl.relation_name)
                    .cloned()
                    .ok_or_else(|| SchemaError::UnknownRelation {
                        relation: decl.relation_name.clone(),
                    })?;
                if !relation.is_side(&builder.name) {
                    return Err(SchemaError::RelationModelMismatch {
                        relation: relation.name.clone(),
                        model: builder.name,
                    });
                }

                relation_fields.push(Arc::new(RelationField {
                    name: decl.name,
                    model: builder.name.clone(),
                    related_model: decl.related_model,
                    is_required: decl.is_required,
                    is_list: decl.is_list,
                    relation,
                }));
            }

            models.push(Arc::new(Model {
                name: builder.name,
                scalar_fields: builder.scalars,
                relation_fields,
            }));
        }

        Ok(Schema { models, relations })
    }
}

///
/// ModelBuilder
///

pub struct ModelBuilder {
    name: String,
    scalars: Vec<ScalarField>,
    relations: Vec<RelationFieldDecl>,
}

struct RelationFieldDecl {
    name: String,
    related_model: String,
    relation_name: String,
    is_required: bool,
    is_list: bool,
}

impl ModelBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scalars: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Add the identity scalar.
    #[must_use]
    pub fn id(mut self, name: impl Into<String>) -> Self {
        self.scalars
            .push(ScalarField::new(name, TypeIdent::Id).required());
        self
    }

    #[must_use]
    pub fn scalar(mut self, field: ScalarField) -> Self {
        self.scalars.push(field);
        self
    }

    #[must_use]
    pub fn relation(
        mut self,
        name: impl Into<String>,
        related_model: impl Into<String>,
        relation_name: impl Into<String>,
    ) -> Self {
        self.relations.push(RelationFieldDecl {
            name: name.into(),
            related_model: related_model.into(),
            relation_name: relation_name.into(),
            is_required: false,
            is_list: false,
        });
        self
    }

    #[must_use]
    pub fn required_relation(
        self,
        name: impl Into<String>,
        related_model: impl Into<String>,
        relation_name: impl Into<String>,
    ) -> Self {
        let mut this = self.relation(name, related_model, relation_name);
        this.relations
            .last_mut()
            .expect("relation was just pushed")
            .is_required = true;
        this
    }

    #[must_use]
    pub fn relation_list(
        self,
        name: impl Into<String>,
        related_model: impl Into<String>,
        relation_name: impl Into<String>,
    ) -> Self {
        let mut this = self.relation(name, related_model, relation_name);
        this.relations
            .last_mut()
            .expect("relation was just pushed")
            .is_list = true;
        this
    }
}

///
/// TESTS
///
