//! Request body normalization for both dialects

use crate::document::{RawMediaType, RawParameter, RawRequestBody};
use crate::example::ExampleGenerator;
use crate::reference::resolve_node;
use apinorm_common::{ApiNormError, ContentVariant, RequestBody, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const JSON_CONTENT_TYPE: &str = "application/json";
const URLENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// OpenAPI 3.x `requestBody`: one variant per content type, in order.
///
/// A variant gets a synthesized example only when it has a schema and no
/// literal example.
pub fn normalize_openapi3_body(
    raw: &Value,
    root: &Value,
    examples: &ExampleGenerator<'_>,
) -> Result<RequestBody> {
    let resolved = resolve_node(raw, root)?;
    let body = RawRequestBody::deserialize(resolved)
        .map_err(|e| ApiNormError::InvalidDocument(format!("malformed requestBody: {}", e)))?;

    let content = body
        .content
        .iter()
        .map(|(content_type, media)| media_variant(content_type, media, Some(examples)))
        .collect();

    Ok(RequestBody {
        description: body.description,
        required: body.required,
        content,
    })
}

/// Content variant for one media type; `examples` enables synthesis
pub(crate) fn media_variant(
    content_type: &str,
    media: &RawMediaType,
    examples: Option<&ExampleGenerator<'_>>,
) -> ContentVariant {
    let example = media.literal_example();
    let generated_example = match (&media.schema, &example, examples) {
        (Some(schema), None, Some(generator)) => Some(generator.generate(schema, 0)),
        _ => None,
    };

    ContentVariant {
        content_type: content_type.to_string(),
        schema: media.schema.clone(),
        example,
        generated_example,
    }
}

/// Swagger 2.0 body: the first `in: body` parameter becomes one
/// `application/json` variant. Without a body parameter, `formData`
/// parameters are folded into one form variant.
///
/// `examples` is `None` unless 2.0 synthesis was enabled in the options.
pub fn normalize_swagger2_body(
    parameters: &[RawParameter],
    consumes: &[String],
    examples: Option<&ExampleGenerator<'_>>,
) -> Option<RequestBody> {
    if let Some(body) = parameters.iter().find(|p| p.is_body()) {
        let mut variant = ContentVariant::new(JSON_CONTENT_TYPE);
        variant.schema = body.schema.clone();
        variant.generated_example = match (&body.schema, examples) {
            (Some(schema), Some(generator)) => Some(generator.generate(schema, 0)),
            _ => None,
        };

        return Some(RequestBody {
            description: body.description.clone(),
            required: Some(body.required),
            content: vec![variant],
        });
    }

    let form_fields: Vec<&RawParameter> = parameters.iter().filter(|p| p.is_form_data()).collect();
    if form_fields.is_empty() {
        return None;
    }

    let content_type = consumes
        .iter()
        .find(|c| c.as_str() == MULTIPART_CONTENT_TYPE || c.as_str() == URLENCODED_CONTENT_TYPE)
        .map(String::as_str)
        .unwrap_or(URLENCODED_CONTENT_TYPE);

    let schema = form_schema(&form_fields);
    let mut variant = ContentVariant::new(content_type);
    variant.generated_example = examples.map(|generator| generator.generate(&schema, 0));
    variant.schema = Some(schema);

    Some(RequestBody {
        description: None,
        required: Some(form_fields.iter().any(|f| f.required)),
        content: vec![variant],
    })
}

/// Object schema describing a set of `formData` fields
fn form_schema(fields: &[&RawParameter]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        let mut property = Map::new();
        match field.param_type.as_deref() {
            Some("file") => {
                property.insert("type".to_string(), json!("string"));
                property.insert("format".to_string(), json!("binary"));
            }
            Some(ty) => {
                property.insert("type".to_string(), json!(ty));
            }
            None => {}
        }
        if let (Some(format), false) = (&field.format, property.contains_key("format")) {
            property.insert("format".to_string(), json!(format));
        }
        if let Some(description) = &field.description {
            property.insert("description".to_string(), json!(description));
        }
        if let Some(values) = &field.enum_values {
            property.insert("enum".to_string(), Value::Array(values.clone()));
        }
        if let Some(default) = &field.default {
            property.insert("default".to_string(), default.clone());
        }

        if field.required {
            required.push(json!(field.name));
        }
        properties.insert(field.name.clone(), Value::Object(property));
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(schema)
}
