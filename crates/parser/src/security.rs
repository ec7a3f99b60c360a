//! Security scheme normalization
//!
//! Both dialect maps feed one result keyed by scheme name: OpenAPI 3.x
//! `components.securitySchemes` first, then Swagger 2.0 `securityDefinitions`.

use crate::document::{ApiDocument, RawSecurityScheme};
use crate::reference::resolve_node;
use apinorm_common::{SecurityConflictPolicy, SecurityScheme};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Merge the security maps of `document`.
///
/// Returns `None` when neither map declares a scheme. A malformed scheme is
/// logged and skipped. Name collisions follow `policy`.
pub fn normalize_security_schemes(
    document: &ApiDocument,
    policy: SecurityConflictPolicy,
) -> Option<IndexMap<String, SecurityScheme>> {
    let root = document.root();
    let mut schemes = IndexMap::new();

    let sources = [
        ("securitySchemes", document.security_schemes()),
        ("securityDefinitions", document.security_definitions()),
    ];

    for (origin, entries) in sources {
        let Some(entries) = entries else {
            continue;
        };
        collect_schemes(origin, entries, root, policy, &mut schemes);
    }

    if schemes.is_empty() {
        None
    } else {
        Some(schemes)
    }
}

fn collect_schemes(
    origin: &str,
    entries: &Map<String, Value>,
    root: &Value,
    policy: SecurityConflictPolicy,
    schemes: &mut IndexMap<String, SecurityScheme>,
) {
    for (name, raw) in entries {
        let scheme = match resolve_node(raw, root)
            .and_then(|resolved| RawSecurityScheme::deserialize(resolved).map_err(Into::into))
        {
            Ok(raw) => convert_scheme(raw),
            Err(e) => {
                log::warn!("Skipping security scheme '{}' in {}: {}", name, origin, e);
                continue;
            }
        };

        if schemes.contains_key(name) {
            match policy {
                SecurityConflictPolicy::KeepFirst => {
                    log::warn!(
                        "Security scheme '{}' from {} ignored: already declared",
                        name,
                        origin
                    );
                    continue;
                }
                SecurityConflictPolicy::LastWins => {
                    log::warn!(
                        "Security scheme '{}' from {} replaces an earlier declaration",
                        name,
                        origin
                    );
                }
            }
        }

        schemes.insert(name.clone(), scheme);
    }
}

fn convert_scheme(raw: RawSecurityScheme) -> SecurityScheme {
    SecurityScheme {
        scheme_type: raw.scheme_type,
        name: raw.name,
        location: raw.location,
        description: raw.description,
        scheme: raw.scheme,
        bearer_format: raw.bearer_format,
        flows: raw.flows,
        open_id_connect_url: raw.open_id_connect_url,
        flow: raw.flow,
        authorization_url: raw.authorization_url,
        token_url: raw.token_url,
        scopes: raw.scopes,
    }
}
