//! Internal `$ref` resolution
//!
//! Only fragment references into the same document (`#/a/b/c`) are supported.
//! External documents and relative files are reported as "not found" instead
//! of being fetched.

use apinorm_common::{ApiNormError, Result};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::borrow::Cow;

pub(crate) const REF_FIELD: &str = "$ref";

/// Upper bound on `$ref` -> `$ref` hops when following reference chains
const MAX_REFERENCE_HOPS: usize = 32;

/// Resolve an internal reference against the document root.
///
/// Segments walk objects by key and arrays by index. Any miss is logged as a
/// warning and yields `None`; callers treat that as "no schema available".
///
/// # Examples
/// ```
/// use apinorm_parser::resolve_ref;
/// use serde_json::json;
///
/// let root = json!({"components": {"schemas": {"Pet": {"type": "object"}}}});
/// assert_eq!(
///     resolve_ref("#/components/schemas/Pet", &root),
///     Some(&json!({"type": "object"}))
/// );
/// assert_eq!(resolve_ref("#/components/schemas/Missing", &root), None);
/// assert_eq!(resolve_ref("other.yaml#/Pet", &root), None);
/// ```
pub fn resolve_ref<'a>(reference: &str, root: &'a Value) -> Option<&'a Value> {
    let Some(pointer) = reference.strip_prefix('#') else {
        log::warn!("Unsupported non-local reference: {}", reference);
        return None;
    };

    if pointer.is_empty() {
        return Some(root);
    }

    let Some(pointer) = pointer.strip_prefix('/') else {
        log::warn!("Malformed reference (expected '#/...'): {}", reference);
        return None;
    };

    let mut current = root;
    for raw_segment in pointer.split('/') {
        let segment = decode_segment(raw_segment);
        let next = match current {
            Value::Object(map) => map.get(segment.as_ref()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };

        match next {
            Some(value) => current = value,
            None => {
                log::warn!(
                    "Reference not found: {} (missing segment '{}')",
                    reference,
                    segment
                );
                return None;
            }
        }
    }

    Some(current)
}

/// Decode one pointer segment: percent-decoding first, then `~1` and `~0`
fn decode_segment(segment: &str) -> Cow<'_, str> {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    if !decoded.contains('~') {
        return decoded;
    }
    Cow::Owned(decoded.replace("~1", "/").replace("~0", "~"))
}

/// The reference string of a `{"$ref": "..."}` node, if it is one
pub(crate) fn ref_of(value: &Value) -> Option<&str> {
    value.get(REF_FIELD).and_then(Value::as_str)
}

/// Follow `$ref` chains until a concrete node is reached.
///
/// Used for parameters, request bodies, responses, and path items, where an
/// unresolvable reference makes the enclosing operation malformed.
pub(crate) fn resolve_node<'a>(value: &'a Value, root: &'a Value) -> Result<&'a Value> {
    let mut current = value;
    for _ in 0..MAX_REFERENCE_HOPS {
        let Some(reference) = ref_of(current) else {
            return Ok(current);
        };
        current = resolve_ref(reference, root)
            .ok_or_else(|| ApiNormError::UnresolvedReference(reference.to_string()))?;
    }

    Err(ApiNormError::UnresolvedReference(format!(
        "reference chain longer than {} hops starting at {}",
        MAX_REFERENCE_HOPS,
        ref_of(value).unwrap_or_default()
    )))
}
