//! Common types and utilities for apinorm
//!
//! This crate contains the normalized document model, the error type, and the
//! parser options shared by the parser and CLI components.

mod model;
mod options;

pub use model::*;
pub use options::{ParserOptions, SecurityConflictPolicy};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while loading or normalizing an API document
#[derive(Error, Debug)]
pub enum ApiNormError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Malformed operation {method} {path}: {reason}")]
    MalformedOperation {
        path: String,
        method: String,
        reason: String,
    },

    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for apinorm operations
pub type Result<T> = std::result::Result<T, ApiNormError>;

/// Detected dialect of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecVersion {
    #[serde(rename = "2.0")]
    Swagger2,
    #[serde(rename = "3.0")]
    OpenApi30,
    #[serde(rename = "3.1")]
    OpenApi31,
}

impl SpecVersion {
    /// Detect the dialect from the value of a document's `openapi` field.
    ///
    /// Anything that is not a string starting with `"3"` is Swagger 2.0.
    ///
    /// # Examples
    /// ```
    /// use apinorm_common::SpecVersion;
    ///
    /// assert_eq!(SpecVersion::detect(Some("3.1.0")), SpecVersion::OpenApi31);
    /// assert_eq!(SpecVersion::detect(Some("3.0.3")), SpecVersion::OpenApi30);
    /// assert_eq!(SpecVersion::detect(None), SpecVersion::Swagger2);
    /// ```
    pub fn detect(openapi_field: Option<&str>) -> Self {
        match openapi_field {
            Some(v) if v.starts_with("3.1") => SpecVersion::OpenApi31,
            Some(v) if v.starts_with('3') => SpecVersion::OpenApi30,
            _ => SpecVersion::Swagger2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::Swagger2 => "2.0",
            SpecVersion::OpenApi30 => "3.0",
            SpecVersion::OpenApi31 => "3.1",
        }
    }

    pub fn is_openapi3(&self) -> bool {
        !matches!(self, SpecVersion::Swagger2)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verbs that may appear under a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Traversal order used when walking a path item
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// Key of this method inside a path item object
    pub fn path_item_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a non-body parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl FromStr for ParameterLocation {
    type Err = ApiNormError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "query" => Ok(ParameterLocation::Query),
            "header" => Ok(ParameterLocation::Header),
            "path" => Ok(ParameterLocation::Path),
            "cookie" => Ok(ParameterLocation::Cookie),
            other => Err(ApiNormError::InvalidDocument(format!(
                "unknown parameter location '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        })
    }
}

/// Where a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Url,
    File,
    Literal,
}

/// Diagnostic description of a document's origin, echoed back in results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub location: String,
}

impl SourceDescriptor {
    pub fn url(location: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Url,
            location: location.into(),
        }
    }

    pub fn file(location: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::File,
            location: location.into(),
        }
    }

    pub fn literal() -> Self {
        Self {
            kind: SourceKind::Literal,
            location: "<literal>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_version_detection() {
        assert_eq!(SpecVersion::detect(Some("3.0.0")), SpecVersion::OpenApi30);
        assert_eq!(SpecVersion::detect(Some("3.0.3")), SpecVersion::OpenApi30);
        assert_eq!(SpecVersion::detect(Some("3.1.0")), SpecVersion::OpenApi31);
        assert_eq!(SpecVersion::detect(Some("3")), SpecVersion::OpenApi30);
        assert_eq!(SpecVersion::detect(Some("2.0")), SpecVersion::Swagger2);
        assert_eq!(SpecVersion::detect(None), SpecVersion::Swagger2);
    }

    #[test]
    fn test_spec_version_serializes_as_version_string() {
        let json = serde_json::to_string(&SpecVersion::OpenApi31).unwrap();
        assert_eq!(json, "\"3.1\"");
        let json = serde_json::to_string(&SpecVersion::Swagger2).unwrap();
        assert_eq!(json, "\"2.0\"");
    }

    #[test]
    fn test_http_method_order_and_case() {
        let keys: Vec<&str> = HttpMethod::ALL.iter().map(|m| m.path_item_key()).collect();
        assert_eq!(
            keys,
            vec!["get", "post", "put", "delete", "patch", "head", "options", "trace"]
        );
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(
            serde_json::to_string(&HttpMethod::Options).unwrap(),
            "\"OPTIONS\""
        );
    }

    #[test]
    fn test_parameter_location_rejects_body() {
        assert_eq!(
            "cookie".parse::<ParameterLocation>().unwrap(),
            ParameterLocation::Cookie
        );
        assert!("body".parse::<ParameterLocation>().is_err());
        assert!("formData".parse::<ParameterLocation>().is_err());
    }
}
