use crate::{
    args::NonListArgs,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use derive_more::Deref;
use quiver_schema::{Model, TypeIdent, Value};
use serde::Serialize;

///
/// NormalizedArgs
///
/// The executor-canonical form of non-list create arguments: model defaults
/// injected, enum members normalized, singleton lists flattened. Produced
/// once at plan time; the executor persists the map verbatim.
///

#[derive(Clone, Debug, Default, Deref, PartialEq, Serialize)]
pub struct NormalizedArgs(NonListArgs);

impl NormalizedArgs {
    #[must_use]
    pub fn into_inner(self) -> NonListArgs {
        self.0
    }
}

/// Convert a coerced non-list create arg map into the executor's canonical
/// form against `model`.
///
/// Unknown field names and list-shaped values for non-list fields are
/// malformed input from the coercion layer and surface as internal errors.
pub fn normalize_create_args(
    model: &Model,
    args: NonListArgs,
) -> Result<NormalizedArgs, InternalError> {
    let mut normalized = NonListArgs::new();

    for (name, value) in args {
        let Some(field) = model.scalar_field(&name) else {
            return Err(InternalError::new(
                ErrorClass::NotFound,
                ErrorOrigin::Args,
                format!(
                    "create argument targets unknown scalar field: {}.{name}",
                    model.name
                ),
            ));
        };

        let value = flatten_singleton(model, field.is_list, &name, value)?;
        let value = normalize_enum(field.type_ident, value);
        normalized.insert(name, value);
    }

    // Defaults fill only the gaps; explicit arguments always win.
    for field in &model.scalar_fields {
        if let Some(default) = &field.default
            && !normalized.contains_key(&field.name)
        {
            let value = normalize_enum(field.type_ident, default.clone());
            normalized.insert(field.name.clone(), value);
        }
    }

    Ok(NormalizedArgs(normalized))
}

// Coercion residue: a non-list field may arrive wrapped in a one-element list.
fn flatten_singleton(
    model: &Model,
    field_is_list: bool,
    name: &str,
    value: Value,
) -> Result<Value, InternalError> {
    if field_is_list {
        return Ok(value);
    }

    match value {
        Value::List(mut items) if items.len() == 1 => Ok(items.remove(0)),
        Value::List(items) => Err(InternalError::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Args,
            format!(
                "non-list field received a {}-element list: {}.{name}",
                items.len(),
                model.name
            ),
        )),
        value => Ok(value),
    }
}

fn normalize_enum(type_ident: TypeIdent, value: Value) -> Value {
    match (type_ident, value) {
        (TypeIdent::Enum, Value::String(member)) => Value::Enum(member),
        (_, value) => value,
    }
}

///
/// TESTS
///
