//! Normalized document model
//!
//! Every value here is produced fresh by a parse call and never mutated
//! afterwards. Field names serialize in camelCase so the output can be handed
//! to a UI layer as-is.

use crate::{HttpMethod, ParameterLocation, SourceDescriptor, SpecVersion};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of normalizing one API document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub source: SourceDescriptor,

    /// Absent only when the document failed before version detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<SpecVersion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ApiInfo>,

    #[serde(default)]
    pub endpoints: Vec<Endpoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<IndexMap<String, SecurityScheme>>,

    /// `components` (3.x) or `definitions` (2.0), passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Value>,
}

impl ParsedDocument {
    /// Build a failed result that still echoes the source back
    pub fn failure(source: SourceDescriptor, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            source,
            spec_version: None,
            info: None,
            endpoints: Vec::new(),
            tags: None,
            security_schemes: None,
            components: None,
        }
    }

    /// Find an endpoint by path template and method
    pub fn endpoint(&self, path: &str, method: HttpMethod) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.path == path && e.method == method)
    }
}

/// Dialect-independent API metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub title: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,

    /// OpenAPI 3.x only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,

    /// Swagger 2.0 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Swagger 2.0 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

/// Server entry (document-level or per-operation override)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One operation: a path template paired with an HTTP method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,

    pub method: HttpMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    #[serde(default)]
    pub responses: Vec<ResponseEntry>,

    /// Operation-level security requirements, unmerged with document defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,
}

/// Query, header, path, or cookie parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

/// The single request body of an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default)]
    pub content: Vec<ContentVariant>,
}

/// One representation of a body: content type, schema, examples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVariant {
    pub content_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Only populated for request bodies with a schema and no literal example
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_example: Option<Value>,
}

impl ContentVariant {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            schema: None,
            example: None,
            generated_example: None,
        }
    }
}

/// One entry of an operation's response map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    /// Status code as written in the document, including "default"
    pub status_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentVariant>>,
}

/// Union of the OpenAPI 3.x and Swagger 2.0 security scheme shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,

    /// OpenAPI 3.x OAuth2 flows object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,

    /// Swagger 2.0 OAuth2 flow name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Value>,
}

/// Document-level tag metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_echoes_source() {
        let doc = ParsedDocument::failure(SourceDescriptor::file("api.yaml"), "boom");
        assert!(!doc.success);
        assert_eq!(doc.error.as_deref(), Some("boom"));
        assert_eq!(doc.source.location, "api.yaml");
        assert!(doc.endpoints.is_empty());
    }

    #[test]
    fn test_parameter_serializes_with_wire_names() {
        let param = Parameter {
            name: "limit".to_string(),
            location: ParameterLocation::Query,
            description: None,
            required: false,
            param_type: Some("integer".to_string()),
            format: Some("int32".to_string()),
            schema: None,
            example: None,
            default: Some(json!(20)),
            enum_values: None,
        };

        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "limit",
                "in": "query",
                "required": false,
                "type": "integer",
                "format": "int32",
                "default": 20
            })
        );
    }

    #[test]
    fn test_content_variant_omits_missing_examples() {
        let mut variant = ContentVariant::new("application/json");
        variant.generated_example = Some(json!({"id": 0}));

        let value = serde_json::to_value(&variant).unwrap();
        assert_eq!(
            value,
            json!({"contentType": "application/json", "generatedExample": {"id": 0}})
        );
    }
}
