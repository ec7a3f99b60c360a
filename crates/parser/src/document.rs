//! Dialect detection and raw document types
//!
//! A loaded document is parsed into [`ApiDocument`], a tagged union over the
//! two dialects, right after version detection. Normalizers match on the
//! variant instead of probing optional fields.
//!
//! Paths and operations stay as raw JSON here: each operation is deserialized
//! on its own so that one malformed operation cannot fail the whole document.

use apinorm_common::{ApiNormError, Result, Server, SpecVersion};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

const OPENAPI_FIELD: &str = "openapi";
const SECURITY_SCHEMES_FIELD: &str = "securitySchemes";

/// A Swagger 2.0 or OpenAPI 3.x document together with its raw root
#[derive(Debug, Clone)]
pub enum ApiDocument {
    Swagger2 {
        document: SwaggerV2Document,
        root: Value,
    },
    OpenApi3 {
        version: SpecVersion,
        document: OpenApiV3Document,
        root: Value,
    },
}

impl ApiDocument {
    /// Detect the dialect and parse the document-level fields
    pub fn from_value(root: Value) -> Result<Self> {
        if !root.is_object() {
            return Err(ApiNormError::InvalidDocument(
                "document root must be an object".to_string(),
            ));
        }

        let version = SpecVersion::detect(root.get(OPENAPI_FIELD).and_then(Value::as_str));
        log::debug!("Detected document version {}", version);

        match version {
            SpecVersion::Swagger2 => {
                let document = SwaggerV2Document::deserialize(&root).map_err(|e| {
                    ApiNormError::InvalidDocument(format!("invalid Swagger 2.0 document: {}", e))
                })?;
                Ok(ApiDocument::Swagger2 { document, root })
            }
            SpecVersion::OpenApi30 | SpecVersion::OpenApi31 => {
                let document = OpenApiV3Document::deserialize(&root).map_err(|e| {
                    ApiNormError::InvalidDocument(format!("invalid OpenAPI 3.x document: {}", e))
                })?;
                Ok(ApiDocument::OpenApi3 {
                    version,
                    document,
                    root,
                })
            }
        }
    }

    pub fn version(&self) -> SpecVersion {
        match self {
            ApiDocument::Swagger2 { .. } => SpecVersion::Swagger2,
            ApiDocument::OpenApi3 { version, .. } => *version,
        }
    }

    /// Raw root, used for `$ref` resolution
    pub fn root(&self) -> &Value {
        match self {
            ApiDocument::Swagger2 { root, .. } | ApiDocument::OpenApi3 { root, .. } => root,
        }
    }

    pub fn paths(&self) -> &IndexMap<String, Value> {
        match self {
            ApiDocument::Swagger2 { document, .. } => &document.paths,
            ApiDocument::OpenApi3 { document, .. } => &document.paths,
        }
    }

    pub fn info(&self) -> &RawInfo {
        match self {
            ApiDocument::Swagger2 { document, .. } => &document.info,
            ApiDocument::OpenApi3 { document, .. } => &document.info,
        }
    }

    pub fn tags(&self) -> Option<&[Value]> {
        match self {
            ApiDocument::Swagger2 { document, .. } => document.tags.as_deref(),
            ApiDocument::OpenApi3 { document, .. } => document.tags.as_deref(),
        }
    }

    /// Opaque reusable-definitions blob: `components` (3.x) or `definitions` (2.0)
    pub fn components(&self) -> Option<&Value> {
        match self {
            ApiDocument::Swagger2 { document, .. } => document.definitions.as_ref(),
            ApiDocument::OpenApi3 { document, .. } => document.components.as_ref(),
        }
    }

    /// OpenAPI 3.x `components.securitySchemes`, wherever it appears
    pub fn security_schemes(&self) -> Option<&Map<String, Value>> {
        let components = match self {
            ApiDocument::Swagger2 { document, .. } => document.stray_components.as_ref(),
            ApiDocument::OpenApi3 { document, .. } => document.components.as_ref(),
        };
        components
            .and_then(|components| components.get(SECURITY_SCHEMES_FIELD))
            .and_then(Value::as_object)
    }

    /// Swagger 2.0 `securityDefinitions`, wherever it appears
    pub fn security_definitions(&self) -> Option<&Map<String, Value>> {
        match self {
            ApiDocument::Swagger2 { document, .. } => document.security_definitions.as_ref(),
            ApiDocument::OpenApi3 { document, .. } => {
                document.stray_security_definitions.as_ref()
            }
        }
    }

    /// Document-level `consumes` (Swagger 2.0 only)
    pub fn consumes(&self) -> &[String] {
        match self {
            ApiDocument::Swagger2 { document, .. } => &document.consumes,
            ApiDocument::OpenApi3 { .. } => &[],
        }
    }
}

/// `info` object of either dialect
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub contact: Option<Value>,

    #[serde(default)]
    pub license: Option<Value>,
}

/// Swagger 2.0 document root
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerV2Document {
    #[serde(default)]
    pub swagger: Option<String>,

    #[serde(default)]
    pub info: RawInfo,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub base_path: Option<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub paths: IndexMap<String, Value>,

    #[serde(default)]
    pub definitions: Option<Value>,

    #[serde(default)]
    pub security_definitions: Option<Map<String, Value>>,

    #[serde(default)]
    pub tags: Option<Vec<Value>>,

    /// 3.x-style `components` in a mixed document
    #[serde(default, rename = "components")]
    pub stray_components: Option<Value>,
}

/// OpenAPI 3.0 / 3.1 document root
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiV3Document {
    pub openapi: String,

    #[serde(default)]
    pub info: RawInfo,

    #[serde(default)]
    pub servers: Option<Vec<Server>>,

    #[serde(default)]
    pub paths: IndexMap<String, Value>,

    #[serde(default)]
    pub components: Option<Value>,

    #[serde(default)]
    pub tags: Option<Vec<Value>>,

    /// 2.0-style `securityDefinitions` in a mixed document
    #[serde(default, rename = "securityDefinitions")]
    pub stray_security_definitions: Option<Map<String, Value>>,
}

/// One operation under a path item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(default)]
    pub request_body: Option<Value>,

    #[serde(default)]
    pub responses: IndexMap<String, Value>,

    #[serde(default)]
    pub security: Option<Value>,

    #[serde(default)]
    pub servers: Option<Vec<Server>>,

    /// Swagger 2.0 only
    #[serde(default)]
    pub consumes: Vec<String>,
}

/// A parameter of either dialect, after `$ref` resolution
#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Swagger 2.0 inline type
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    /// OpenAPI 3.x schema, or the Swagger 2.0 body schema
    #[serde(default)]
    pub schema: Option<Value>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<Value>>,
}

impl RawParameter {
    pub fn is_body(&self) -> bool {
        self.location == "body"
    }

    pub fn is_form_data(&self) -> bool {
        self.location == "formData"
    }
}

/// OpenAPI 3.x request body object
#[derive(Debug, Clone, Deserialize)]
pub struct RawRequestBody {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub content: IndexMap<String, RawMediaType>,
}

/// OpenAPI 3.x media type object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMediaType {
    #[serde(default)]
    pub schema: Option<Value>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(default)]
    pub examples: Option<IndexMap<String, Value>>,
}

impl RawMediaType {
    /// Literal `example`, else the `value` of the first `examples` entry
    pub fn literal_example(&self) -> Option<Value> {
        if let Some(example) = &self.example {
            return Some(example.clone());
        }
        self.examples
            .as_ref()
            .and_then(|examples| examples.values().next())
            .and_then(|first| first.get("value"))
            .cloned()
    }
}

/// Response object of either dialect
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub description: Option<String>,

    /// OpenAPI 3.x
    #[serde(default)]
    pub content: Option<IndexMap<String, RawMediaType>>,

    /// Swagger 2.0
    #[serde(default)]
    pub schema: Option<Value>,

    /// Swagger 2.0: mime type -> example
    #[serde(default)]
    pub examples: Option<IndexMap<String, Value>>,
}

/// Security scheme of either dialect
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in", default)]
    pub location: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(default)]
    pub bearer_format: Option<String>,

    #[serde(default)]
    pub flows: Option<Value>,

    #[serde(default)]
    pub open_id_connect_url: Option<String>,

    #[serde(default)]
    pub flow: Option<String>,

    #[serde(default)]
    pub authorization_url: Option<String>,

    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub scopes: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_swagger2() {
        let doc = ApiDocument::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "Legacy", "version": "2"},
            "host": "api.example.com",
            "basePath": "/v1",
            "paths": {}
        }))
        .unwrap();

        assert_eq!(doc.version(), SpecVersion::Swagger2);
        match doc {
            ApiDocument::Swagger2 { document, .. } => {
                assert_eq!(document.host.as_deref(), Some("api.example.com"));
                assert_eq!(document.base_path.as_deref(), Some("/v1"));
            }
            ApiDocument::OpenApi3 { .. } => panic!("expected Swagger 2.0"),
        }
    }

    #[test]
    fn test_detects_openapi_versions() {
        let v30 = ApiDocument::from_value(json!({"openapi": "3.0.3", "paths": {}})).unwrap();
        assert_eq!(v30.version(), SpecVersion::OpenApi30);

        let v31 = ApiDocument::from_value(json!({"openapi": "3.1.0", "paths": {}})).unwrap();
        assert_eq!(v31.version(), SpecVersion::OpenApi31);

        // An `openapi` field that is not 3.x falls back to 2.0
        let other = ApiDocument::from_value(json!({"openapi": "2.5", "paths": {}})).unwrap();
        assert_eq!(other.version(), SpecVersion::Swagger2);
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(matches!(
            ApiDocument::from_value(json!(["openapi"])),
            Err(ApiNormError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_paths() {
        let result = ApiDocument::from_value(json!({"openapi": "3.0.0", "paths": "nope"}));
        assert!(matches!(result, Err(ApiNormError::InvalidDocument(_))));
    }

    #[test]
    fn test_paths_keep_document_order() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.0.0",
            "paths": {"/zebra": {}, "/apple": {}, "/mango": {}}
        }))
        .unwrap();
        let keys: Vec<&String> = doc.paths().keys().collect();
        assert_eq!(keys, vec!["/zebra", "/apple", "/mango"]);
    }

    #[test]
    fn test_security_maps_from_either_dialect() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.0.0",
            "components": {"securitySchemes": {"bearer": {"type": "http"}}},
            "securityDefinitions": {"key": {"type": "apiKey"}}
        }))
        .unwrap();
        assert!(doc.security_schemes().unwrap().contains_key("bearer"));
        assert!(doc.security_definitions().unwrap().contains_key("key"));
    }

    #[test]
    fn test_media_type_literal_example() {
        let media: RawMediaType = serde_json::from_value(json!({
            "examples": {"first": {"value": {"id": 1}}, "second": {"value": {"id": 2}}}
        }))
        .unwrap();
        assert_eq!(media.literal_example(), Some(json!({"id": 1})));

        let media: RawMediaType =
            serde_json::from_value(json!({"example": "x", "examples": {"a": {"value": "y"}}}))
                .unwrap();
        assert_eq!(media.literal_example(), Some(json!("x")));
    }
}
