//! Parser options loaded from YAML files
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock behavior.

use crate::{ApiNormError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How to treat a security scheme name declared by both dialect maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityConflictPolicy {
    /// The first entry seen (OpenAPI 3.x `securitySchemes`) is kept
    #[default]
    KeepFirst,
    /// A later Swagger 2.0 `securityDefinitions` entry replaces it
    LastWins,
}

/// Tunables for normalization and example synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserOptions {
    /// Depth past which synthesis returns `{}`
    pub max_example_depth: usize,

    /// Optional object properties are only expanded below this depth
    pub optional_property_depth: usize,

    /// Title used when `info.title` is absent
    pub default_title: String,

    /// Version used when `info.version` is absent
    pub default_version: String,

    pub security_conflict: SecurityConflictPolicy,

    /// Synthesize examples for Swagger 2.0 body parameters as well
    pub synthesize_swagger2_examples: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_example_depth: 10,
            optional_property_depth: 2,
            default_title: "Unknown API".to_string(),
            default_version: "1.0.0".to_string(),
            security_conflict: SecurityConflictPolicy::KeepFirst,
            synthesize_swagger2_examples: false,
        }
    }
}

impl ParserOptions {
    /// Load options from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ApiNormError::Load(format!("Failed to read options file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            ApiNormError::Load(format!(
                "Failed to parse options YAML from {:?}: {}",
                path, e
            ))
        })
    }

    /// Parse options from a YAML string; missing keys take their defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
