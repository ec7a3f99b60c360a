//! Document loading and structural validation
//!
//! Reads a JSON or YAML document from a file or string into a raw
//! `serde_json::Value`. Fetching documents over HTTP is left to the caller,
//! which can pass the fetched value straight to the parser.

use apinorm_common::{ApiNormError, Result};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

/// Loads raw API documents
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load and validate a document from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Value> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ApiNormError::Load(format!(
                "Failed to read API document {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_content(&content)
    }

    /// Load and validate a document from a JSON or YAML string.
    ///
    /// # Examples
    /// ```
    /// use apinorm_parser::DocumentLoader;
    ///
    /// let doc = DocumentLoader::from_content("openapi: 3.0.0\npaths: {}\n").unwrap();
    /// assert_eq!(doc["openapi"], "3.0.0");
    /// ```
    pub fn from_content(content: &str) -> Result<Value> {
        let document = Self::parse_content(content)?;
        Self::validate(&document)?;
        Ok(document)
    }

    fn parse_content(content: &str) -> Result<Value> {
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return Err(ApiNormError::Load("API document is empty".to_string()));
        }

        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed)
                .map_err(|e| ApiNormError::Load(format!("Failed to parse JSON: {}", e)));
        }

        let yaml: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ApiNormError::Load(format!("Failed to parse YAML: {}", e)))?;
        yaml_to_json(yaml)
    }

    /// Structural checks that hold for both dialects
    pub fn validate(document: &Value) -> Result<()> {
        let root = document.as_object().ok_or_else(|| {
            ApiNormError::InvalidDocument("document root must be an object".to_string())
        })?;

        match (root.get("openapi"), root.get("swagger")) {
            (Some(Value::String(version)), _) if version.starts_with('3') => {}
            (_, Some(Value::String(version))) if version.starts_with('2') => {}
            (Some(Value::String(version)), _) => {
                return Err(ApiNormError::InvalidDocument(format!(
                    "unsupported OpenAPI version '{}'",
                    version
                )))
            }
            (Some(_), _) => {
                return Err(ApiNormError::InvalidDocument(
                    "'openapi' must be a version string".to_string(),
                ))
            }
            (None, Some(version)) => {
                return Err(ApiNormError::InvalidDocument(format!(
                    "unsupported Swagger version {}",
                    version
                )))
            }
            (None, None) => {
                return Err(ApiNormError::InvalidDocument(
                    "document declares neither 'openapi' nor 'swagger'".to_string(),
                ))
            }
        }

        for field in ["info", "paths"] {
            if let Some(value) = root.get(field) {
                if !value.is_object() {
                    return Err(ApiNormError::InvalidDocument(format!(
                        "'{}' must be an object",
                        field
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Convert YAML into JSON, stringifying non-string mapping keys.
///
/// Status codes are usually written as bare integers (`200:`), which
/// `serde_json::Value` cannot hold as keys.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                match Number::from_f64(f) {
                    Some(number) => Value::Number(number),
                    None => {
                        log::warn!("Non-finite YAML number {} replaced with null", n);
                        Value::Null
                    }
                }
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(ApiNormError::Load(format!(
            "unsupported YAML mapping key {:?}",
            other
        ))),
    }
}
