//! Example payload synthesis from schema fragments
//!
//! Walks a JSON-Schema-like fragment and produces one representative value.
//! Recursion carries an explicit depth counter; past the configured bound the
//! synthesizer returns `{}`, so cyclic `$ref` graphs always terminate.

use crate::reference::{resolve_ref, REF_FIELD};
use apinorm_common::{ApiNormError, ParserOptions, Result};
use serde_json::{json, Map, Number, Value};

/// Key used for the single synthesized `additionalProperties` entry
pub const ADDITIONAL_PROPERTY_KEY: &str = "additionalProp1";

/// Prefix for placeholder strings built from a schema description
const DESCRIPTION_PREFIX: &str = "示例: ";

/// Schema-driven example generator bound to one document root
#[derive(Debug, Clone, Copy)]
pub struct ExampleGenerator<'a> {
    root: &'a Value,
    max_depth: usize,
    optional_property_depth: usize,
}

impl<'a> ExampleGenerator<'a> {
    /// Create a generator that resolves `$ref`s against `root`
    pub fn new(root: &'a Value, options: &ParserOptions) -> Self {
        Self {
            root,
            max_depth: options.max_example_depth,
            optional_property_depth: options.optional_property_depth,
        }
    }

    /// Synthesize an example for `schema`, starting at `depth` (normally 0).
    ///
    /// Never fails: a node that cannot be synthesized is logged and becomes
    /// `null`, an unresolvable `$ref` becomes `{}`.
    ///
    /// # Examples
    /// ```
    /// use apinorm_common::ParserOptions;
    /// use apinorm_parser::ExampleGenerator;
    /// use serde_json::json;
    ///
    /// let root = json!({});
    /// let options = ParserOptions::default();
    /// let generator = ExampleGenerator::new(&root, &options);
    ///
    /// let schema = json!({"type": "string", "format": "email"});
    /// assert_eq!(generator.generate(&schema, 0), json!("user@example.com"));
    /// ```
    pub fn generate(&self, schema: &Value, depth: usize) -> Value {
        match self.synthesize(schema, depth) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Example synthesis failed at depth {}: {}", depth, e);
                Value::Null
            }
        }
    }

    fn synthesize(&self, schema: &Value, depth: usize) -> Result<Value> {
        if depth > self.max_depth {
            return Ok(empty_object());
        }

        let schema = schema.as_object().ok_or_else(|| {
            ApiNormError::MalformedSchema(format!(
                "expected a schema object, found {}",
                json_kind(schema)
            ))
        })?;

        if let Some(reference) = schema.get(REF_FIELD) {
            let reference = reference.as_str().ok_or_else(|| {
                ApiNormError::MalformedSchema("$ref must be a string".to_string())
            })?;
            return Ok(match resolve_ref(reference, self.root) {
                Some(resolved) => self.generate(resolved, depth + 1),
                None => empty_object(),
            });
        }

        if let Some(example) = schema.get("example") {
            return Ok(example.clone());
        }

        if let Some(default) = schema.get("default") {
            return Ok(default.clone());
        }

        match primary_type(schema)? {
            Some("string") => Ok(string_example(schema)),
            Some(ty @ ("number" | "integer")) => number_example(schema, ty),
            Some("boolean") => Ok(Value::Bool(false)),
            Some("array") => Ok(self.array_example(schema, depth)),
            Some("object") => self.object_example(schema, depth),
            Some(_) => Ok(Value::Null),
            None if schema.contains_key("properties") => self.object_example(schema, depth),
            None => self.composition_example(schema, depth),
        }
    }

    fn array_example(&self, schema: &Map<String, Value>, depth: usize) -> Value {
        match schema.get("items") {
            Some(items) => Value::Array(vec![self.generate(items, depth + 1)]),
            None => Value::Array(Vec::new()),
        }
    }

    fn object_example(&self, schema: &Map<String, Value>, depth: usize) -> Result<Value> {
        let required: Vec<&str> = match schema.get("required") {
            Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };

        let properties = match schema.get("properties") {
            None | Some(Value::Null) => None,
            Some(Value::Object(properties)) => Some(properties),
            Some(other) => {
                return Err(ApiNormError::MalformedSchema(format!(
                    "properties must be an object, found {}",
                    json_kind(other)
                )))
            }
        };

        let mut example = Map::new();
        match properties {
            Some(properties) => {
                for (name, property) in properties {
                    if required.contains(&name.as_str()) || depth < self.optional_property_depth {
                        example.insert(name.clone(), self.generate(property, depth + 1));
                    }
                }
            }
            None => {
                if let Some(additional @ Value::Object(_)) = schema.get("additionalProperties") {
                    example.insert(
                        ADDITIONAL_PROPERTY_KEY.to_string(),
                        self.generate(additional, depth + 1),
                    );
                }
            }
        }

        Ok(Value::Object(example))
    }

    /// Untyped `allOf` / `oneOf` / `anyOf`; anything else is `null`
    fn composition_example(&self, schema: &Map<String, Value>, depth: usize) -> Result<Value> {
        if let Some(members) = schema.get("allOf") {
            let members = members.as_array().ok_or_else(|| {
                ApiNormError::MalformedSchema("allOf must be an array".to_string())
            })?;

            let mut merged = Map::new();
            let mut first = None;
            for member in members {
                match self.generate(member, depth + 1) {
                    Value::Object(fields) => merged.extend(fields),
                    other => {
                        first.get_or_insert(other);
                    }
                }
            }

            return Ok(match first {
                Some(value) if merged.is_empty() => value,
                _ => Value::Object(merged),
            });
        }

        for keyword in ["oneOf", "anyOf"] {
            if let Some(alternatives) = schema.get(keyword) {
                let alternatives = alternatives.as_array().ok_or_else(|| {
                    ApiNormError::MalformedSchema(format!("{} must be an array", keyword))
                })?;
                return Ok(alternatives
                    .first()
                    .map(|first| self.generate(first, depth + 1))
                    .unwrap_or(Value::Null));
            }
        }

        Ok(Value::Null)
    }
}

/// The declared type of a schema.
///
/// OpenAPI 3.1 allows a list of types; the first non-`"null"` entry wins.
pub(crate) fn primary_type(schema: &Map<String, Value>) -> Result<Option<&str>> {
    match schema.get("type") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(ty)) => Ok(Some(ty.as_str())),
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            Ok(names
                .iter()
                .find(|ty| **ty != "null")
                .or_else(|| names.first())
                .copied())
        }
        Some(other) => Err(ApiNormError::MalformedSchema(format!(
            "type must be a string or an array, found {}",
            json_kind(other)
        ))),
    }
}

fn first_enum_value(schema: &Map<String, Value>) -> Option<Value> {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .cloned()
}

fn string_example(schema: &Map<String, Value>) -> Value {
    if let Some(value) = first_enum_value(schema) {
        return value;
    }

    let canned = match schema.get("format").and_then(Value::as_str) {
        Some("date") => Some("2024-01-01"),
        Some("date-time") => Some("2024-01-01T00:00:00Z"),
        Some("time") => Some("00:00:00"),
        Some("email") => Some("user@example.com"),
        Some("uri" | "url") => Some("https://example.com"),
        Some("hostname") => Some("example.com"),
        Some("ipv4") => Some("192.168.0.1"),
        Some("uuid") => Some("00000000-0000-0000-0000-000000000000"),
        Some("password") => Some("********"),
        Some("byte") => Some("ZXhhbXBsZQ=="),
        Some("binary") => Some("binary"),
        _ => None,
    };
    if let Some(canned) = canned {
        return Value::String(canned.to_string());
    }

    match schema.get("description").and_then(Value::as_str) {
        Some(description) => Value::String(format!("{}{}", DESCRIPTION_PREFIX, description)),
        None => Value::String("string".to_string()),
    }
}

/// `minimum + 1`, clamped to `maximum` when both are declared; else `0`
fn number_example(schema: &Map<String, Value>, ty: &str) -> Result<Value> {
    if let Some(value) = first_enum_value(schema) {
        return Ok(value);
    }

    let Some(minimum) = schema.get("minimum") else {
        return Ok(json!(0));
    };
    let minimum = minimum.as_number().ok_or_else(|| {
        ApiNormError::MalformedSchema(format!(
            "minimum must be a number, found {}",
            json_kind(minimum)
        ))
    })?;
    let maximum = schema.get("maximum").and_then(Value::as_number);

    let integral_bounds =
        minimum.as_i64().is_some() && maximum.map_or(true, |max| max.as_i64().is_some());
    if ty == "integer" || integral_bounds {
        if let Some(min) = minimum.as_i64() {
            let candidate = min.saturating_add(1);
            return Ok(match maximum {
                Some(max) if (candidate as f64) > max.as_f64().unwrap_or(f64::INFINITY) => {
                    clamp_integer(min, max)
                }
                _ => json!(candidate),
            });
        }
    }

    let min = minimum.as_f64().unwrap_or_default();
    let candidate = min + 1.0;
    let clamped = match maximum.and_then(Number::as_f64) {
        Some(max) if candidate > max => max,
        _ => candidate,
    };
    Number::from_f64(clamped)
        .map(Value::Number)
        .ok_or_else(|| ApiNormError::MalformedSchema(format!("non-finite bound {}", clamped)))
}

/// Largest integer not above `max`, or `max` itself when that would fall
/// below `min`
fn clamp_integer(min: i64, max: &Number) -> Value {
    if let Some(max) = max.as_i64() {
        return json!(max);
    }
    let floor = max.as_f64().unwrap_or_default().floor();
    if floor >= min as f64 && floor <= i64::MAX as f64 {
        json!(floor as i64)
    } else {
        Value::Number(max.clone())
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}
