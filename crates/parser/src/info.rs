//! Dialect-independent `info` / server extraction

use crate::document::ApiDocument;
use apinorm_common::{ApiInfo, ParserOptions};

/// Build [`ApiInfo`] from either dialect.
///
/// Title and version always have a value. Swagger 2.0 `host` / `basePath`
/// are copied verbatim and never combined into a server URL.
pub fn normalize_info(document: &ApiDocument, options: &ParserOptions) -> ApiInfo {
    let raw = document.info();

    let mut info = ApiInfo {
        title: raw
            .title
            .clone()
            .unwrap_or_else(|| options.default_title.clone()),
        version: raw
            .version
            .clone()
            .unwrap_or_else(|| options.default_version.clone()),
        description: raw.description.clone(),
        contact: raw.contact.clone(),
        license: raw.license.clone(),
        servers: None,
        host: None,
        base_path: None,
    };

    match document {
        ApiDocument::OpenApi3 { document, .. } => {
            info.servers = document.servers.clone();
        }
        ApiDocument::Swagger2 { document, .. } => {
            info.host = document.host.clone();
            info.base_path = document.base_path.clone();
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use apinorm_common::Server;
    use serde_json::json;

    #[test]
    fn test_openapi3_servers() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.0.1",
            "info": {"title": "Pets", "version": "2.1.0", "description": "Pet store"},
            "servers": [
                {"url": "https://api.example.com", "description": "prod"},
                {"url": "https://staging.example.com"}
            ],
            "paths": {}
        }))
        .unwrap();

        let info = normalize_info(&doc, &ParserOptions::default());
        assert_eq!(info.title, "Pets");
        assert_eq!(info.version, "2.1.0");
        assert_eq!(info.description.as_deref(), Some("Pet store"));
        assert_eq!(
            info.servers,
            Some(vec![
                Server {
                    url: "https://api.example.com".to_string(),
                    description: Some("prod".to_string()),
                },
                Server {
                    url: "https://staging.example.com".to_string(),
                    description: None,
                },
            ])
        );
        assert!(info.host.is_none());
        assert!(info.base_path.is_none());
    }

    #[test]
    fn test_swagger2_host_and_base_path_verbatim() {
        let doc = ApiDocument::from_value(json!({
            "swagger": "2.0",
            "info": {"title": "Legacy", "version": "0.1"},
            "host": "legacy.example.com:8080",
            "basePath": "/api",
            "paths": {}
        }))
        .unwrap();

        let info = normalize_info(&doc, &ParserOptions::default());
        assert_eq!(info.host.as_deref(), Some("legacy.example.com:8080"));
        assert_eq!(info.base_path.as_deref(), Some("/api"));
        assert!(info.servers.is_none());
    }

    #[test]
    fn test_missing_info_uses_defaults() {
        let doc = ApiDocument::from_value(json!({"swagger": "2.0", "paths": {}})).unwrap();
        let info = normalize_info(&doc, &ParserOptions::default());
        assert_eq!(info.title, "Unknown API");
        assert_eq!(info.version, "1.0.0");

        let options = ParserOptions {
            default_title: "Untitled".to_string(),
            ..ParserOptions::default()
        };
        assert_eq!(normalize_info(&doc, &options).title, "Untitled");
    }
}
