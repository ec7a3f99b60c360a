//! Response map normalization

use crate::document::RawResponse;
use crate::reference::resolve_node;
use crate::request_body::media_variant;
use apinorm_common::{ApiNormError, ContentVariant, ResponseEntry, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

const JSON_CONTENT_TYPE: &str = "application/json";

/// One entry per status code, in document order.
///
/// OpenAPI 3.x `content` maps become variants without synthesized examples.
/// When `content` is absent, a Swagger 2.0 `schema` is wrapped as a single
/// `application/json` variant.
pub fn normalize_responses(
    responses: &IndexMap<String, Value>,
    root: &Value,
) -> Result<Vec<ResponseEntry>> {
    responses
        .iter()
        .filter(|(status, _)| !status.starts_with("x-"))
        .map(|(status, raw)| normalize_response(status, raw, root))
        .collect()
}

fn normalize_response(status: &str, raw: &Value, root: &Value) -> Result<ResponseEntry> {
    let resolved = resolve_node(raw, root)?;
    let response = RawResponse::deserialize(resolved).map_err(|e| {
        ApiNormError::InvalidDocument(format!("malformed response '{}': {}", status, e))
    })?;

    let content = match (&response.content, &response.schema) {
        (Some(content), _) => Some(
            content
                .iter()
                .map(|(content_type, media)| media_variant(content_type, media, None))
                .collect(),
        ),
        (None, Some(schema)) => {
            let mut variant = ContentVariant::new(JSON_CONTENT_TYPE);
            variant.schema = Some(schema.clone());
            variant.example = response
                .examples
                .as_ref()
                .and_then(|examples| examples.get(JSON_CONTENT_TYPE))
                .cloned();
            Some(vec![variant])
        }
        (None, None) => None,
    };

    Ok(ResponseEntry {
        status_code: status.to_string(),
        description: response.description,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn responses(value: Value) -> IndexMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_openapi3_content_without_synthesis() {
        let entries = normalize_responses(
            &responses(json!({
                "200": {
                    "description": "OK",
                    "content": {
                        "application/json": {"schema": {"type": "object"}, "example": {"id": 1}},
                        "text/csv": {"schema": {"type": "string"}}
                    }
                },
                "default": {"description": "Error"}
            })),
            &json!({}),
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status_code, "200");
        let content = entries[0].content.as_ref().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].example, Some(json!({"id": 1})));
        assert!(content.iter().all(|c| c.generated_example.is_none()));

        assert_eq!(entries[1].status_code, "default");
        assert_eq!(entries[1].description.as_deref(), Some("Error"));
        assert!(entries[1].content.is_none());
    }

    #[test]
    fn test_swagger2_schema_wrapped_as_json() {
        let entries = normalize_responses(
            &responses(json!({
                "201": {
                    "description": "Created",
                    "schema": {"$ref": "#/definitions/Pet"},
                    "examples": {"application/json": {"name": "Rex"}}
                }
            })),
            &json!({}),
        )
        .unwrap();

        let content = entries[0].content.as_ref().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].content_type, "application/json");
        assert_eq!(content[0].schema, Some(json!({"$ref": "#/definitions/Pet"})));
        assert_eq!(content[0].example, Some(json!({"name": "Rex"})));
    }

    #[test]
    fn test_response_refs_and_extensions() {
        let root = json!({"responses": {"NotFound": {"description": "Not found"}}});
        let entries = normalize_responses(
            &responses(json!({
                "404": {"$ref": "#/responses/NotFound"},
                "x-internal": {"description": "ignored"}
            })),
            &root,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description.as_deref(), Some("Not found"));
    }

    #[test]
    fn test_malformed_response_fails() {
        assert!(normalize_responses(&responses(json!({"200": "OK"})), &json!({})).is_err());
        assert!(
            normalize_responses(&responses(json!({"200": {"$ref": "#/nowhere"}})), &json!({}))
                .is_err()
        );
    }
}
