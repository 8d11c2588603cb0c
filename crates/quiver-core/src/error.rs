use quiver_schema::SchemaError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structural precondition failure with a stable internal classification.
/// These come from collaborators (schema lookups, malformed argument maps)
/// and propagate opaquely; the planner never recovers from one.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        let class = match err {
            SchemaError::UnknownModel { .. } | SchemaError::UnknownRelation { .. } => {
                ErrorClass::NotFound
            }
            SchemaError::MissingIdField { .. } | SchemaError::RelationModelMismatch { .. } => {
                ErrorClass::InvariantViolation
            }
        };

        Self::new(class, ErrorOrigin::Schema, err.to_string())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Schema,
    Args,
    Planner,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Schema => "schema",
            Self::Args => "args",
            Self::Planner => "planner",
        };
        write!(f, "{label}")
    }
}

///
/// PlanError
///
/// The planner's caller-facing error. `RelationIsRequired` is the only
/// schema-violation raised at planning time; everything live-data-dependent
/// is deferred to the executor through verification mutactions.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error(
        "the change you are trying to make would violate the required relation '{field}' between {model} and its related type"
    )]
    RelationIsRequired { field: String, model: String },

    #[error("{0}")]
    Internal(Box<InternalError>),
}

impl PlanError {
    pub fn relation_is_required(field: impl Into<String>, model: impl Into<String>) -> Self {
        Self::RelationIsRequired {
            field: field.into(),
            model: model.into(),
        }
    }
}

impl From<InternalError> for PlanError {
    fn from(err: InternalError) -> Self {
        Self::Internal(Box::new(err))
    }
}

impl From<SchemaError> for PlanError {
    fn from(err: SchemaError) -> Self {
        Self::Internal(Box::new(err.into()))
    }
}

///
/// TESTS
///
