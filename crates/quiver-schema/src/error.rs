use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Structural precondition failures raised while building or reading a
/// schema. The planner treats these as opaque: they surface unchanged to
/// the caller and never produce a partial plan.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("unknown model: {model}")]
    UnknownModel { model: String },

    #[error("unknown relation: {relation}")]
    UnknownRelation { relation: String },

    #[error("model {model} declares no identity field")]
    MissingIdField { model: String },

    #[error("model {model} is not a side of relation {relation}")]
    RelationModelMismatch { relation: String, model: String },
}
