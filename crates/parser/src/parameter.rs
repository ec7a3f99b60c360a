//! Parameter merging and normalization
//!
//! One normalizer serves both dialects: `type` / `format` come from the
//! Swagger 2.0 inline fields first and fall back to the OpenAPI 3.x schema.

use crate::document::RawParameter;
use crate::reference::resolve_node;
use apinorm_common::{ApiNormError, Parameter, ParameterLocation, Result};
use serde::Deserialize;
use serde_json::Value;

/// Resolve and merge path-level and operation-level parameters.
///
/// Path-level entries come first, then operation-level entries, in declared
/// order. Body and form parameters are kept here so the request body
/// normalizer can find them.
pub fn merge_parameters(
    path_level: &[Value],
    operation_level: &[Value],
    root: &Value,
) -> Result<Vec<RawParameter>> {
    path_level
        .iter()
        .chain(operation_level)
        .map(|raw| {
            let resolved = resolve_node(raw, root)?;
            RawParameter::deserialize(resolved)
                .map_err(|e| ApiNormError::InvalidDocument(format!("malformed parameter: {}", e)))
        })
        .collect()
}

/// Normalize the non-body parameters; `body` / `formData` entries are dropped
pub fn normalize_parameters(parameters: &[RawParameter]) -> Result<Vec<Parameter>> {
    parameters
        .iter()
        .filter(|p| !p.is_body() && !p.is_form_data())
        .map(normalize_parameter)
        .collect()
}

fn normalize_parameter(raw: &RawParameter) -> Result<Parameter> {
    let location: ParameterLocation = raw.location.parse().map_err(|_| {
        ApiNormError::InvalidDocument(format!(
            "parameter '{}' has unknown location '{}'",
            raw.name, raw.location
        ))
    })?;

    let schema_field = |field: &str| raw.schema.as_ref().and_then(|s| s.get(field));

    let param_type = raw
        .param_type
        .clone()
        .or_else(|| schema_field("type").and_then(schema_type_name));
    let format = raw
        .format
        .clone()
        .or_else(|| schema_field("format").and_then(Value::as_str).map(String::from));
    let enum_values = raw.enum_values.clone().or_else(|| {
        schema_field("enum")
            .and_then(Value::as_array)
            .cloned()
    });
    let default = raw.default.clone().or_else(|| schema_field("default").cloned());

    Ok(Parameter {
        name: raw.name.clone(),
        location,
        description: raw.description.clone(),
        required: raw.required,
        param_type,
        format,
        schema: raw.schema.clone(),
        example: raw.example.clone(),
        default,
        enum_values,
    })
}

/// `"string"`, or the first non-null entry of a 3.1 type list
fn schema_type_name(value: &Value) -> Option<String> {
    match value {
        Value::String(ty) => Some(ty.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null")
            .map(String::from),
        _ => None,
    }
}
