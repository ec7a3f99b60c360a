//! Document-level tag normalization

use apinorm_common::Tag;
use serde_json::Value;

/// Map the document's `tags` array 1:1 into name / description pairs.
///
/// `None` when the document has no `tags` field. Entries without a string
/// `name` are logged and skipped. Untagged endpoints are not bucketed here.
pub fn normalize_tags(tags: Option<&[Value]>) -> Option<Vec<Tag>> {
    let tags = tags?;

    Some(
        tags.iter()
            .filter_map(|raw| {
                let Some(name) = raw.get("name").and_then(Value::as_str) else {
                    log::warn!("Skipping tag without a name: {}", raw);
                    return None;
                };
                Some(Tag {
                    name: name.to_string(),
                    description: raw
                        .get("description")
                        .and_then(Value::as_str)
                        .map(String::from),
                })
            })
            .collect(),
    )
}
