//! Integration tests for OpenAPI 3.x documents

use apinorm_common::{HttpMethod, ParameterLocation, SourceDescriptor, SpecVersion};
use apinorm_parser::{parse_api_document, ApiDocumentParser};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_parse_petstore_openapi3_yaml() {
    let parsed = ApiDocumentParser::default().parse_file(fixture("petstore-openapi3.yaml"));

    assert!(parsed.success, "parse failed: {:?}", parsed.error);
    assert_eq!(parsed.spec_version, Some(SpecVersion::OpenApi30));

    let info = parsed.info.as_ref().unwrap();
    assert_eq!(info.title, "Petstore");
    assert_eq!(info.version, "2.1.0");
    let servers = info.servers.as_ref().unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].description.as_deref(), Some("Production"));
    assert!(info.host.is_none());

    let order: Vec<String> = parsed
        .endpoints
        .iter()
        .map(|e| format!("{} {}", e.method, e.path))
        .collect();
    assert_eq!(
        order,
        vec![
            "GET /pets",
            "POST /pets",
            "GET /pets/{petId}",
            "PATCH /pets/{petId}",
            "POST /owners",
            "GET /health",
        ]
    );

    let tags = parsed.tags.as_ref().unwrap();
    assert_eq!(tags[0].name, "pets");
    assert_eq!(tags[1].name, "owners");
    assert!(tags[1].description.is_none());

    let health = parsed.endpoint("/health", HttpMethod::Get).unwrap();
    assert!(health.tags.is_empty());

    let schemes = parsed.security_schemes.as_ref().unwrap();
    assert_eq!(schemes["bearerAuth"].bearer_format.as_deref(), Some("JWT"));
    assert!(parsed.components.as_ref().unwrap().get("schemas").is_some());
}

#[test]
fn test_parameters_resolved_from_components() {
    let parsed = ApiDocumentParser::default().parse_file(fixture("petstore-openapi3.yaml"));
    let list = parsed.endpoint("/pets", HttpMethod::Get).unwrap();

    assert_eq!(list.parameters.len(), 2);
    let limit = &list.parameters[0];
    assert_eq!(limit.name, "limit");
    assert_eq!(limit.location, ParameterLocation::Query);
    assert_eq!(limit.param_type.as_deref(), Some("integer"));
    assert_eq!(limit.format.as_deref(), Some("int32"));
    assert!(!limit.required);

    let status = &list.parameters[1];
    assert_eq!(status.enum_values, Some(vec![json!("available"), json!("pending")]));
    assert_eq!(status.default, Some(json!("available")));

    let show = parsed.endpoint("/pets/{petId}", HttpMethod::Get).unwrap();
    assert_eq!(show.parameters[0].location, ParameterLocation::Path);
    assert_eq!(show.parameters[0].format.as_deref(), Some("uuid"));
}

#[test]
fn test_request_body_variants_in_order() {
    let parsed = ApiDocumentParser::default().parse_file(fixture("petstore-openapi3.yaml"));
    let create = parsed.endpoint("/pets", HttpMethod::Post).unwrap();
    let body = create.request_body.as_ref().unwrap();

    assert_eq!(body.required, Some(true));
    let types: Vec<&str> = body
        .content
        .iter()
        .map(|v| v.content_type.as_str())
        .collect();
    assert_eq!(
        types,
        vec![
            "application/json",
            "application/xml",
            "application/x-www-form-urlencoded"
        ]
    );

    let pet = json!({
        "id": 0,
        "name": "doggie",
        "tag": "string",
        "status": "available",
        "owner": {"email": "user@example.com"}
    });
    assert_eq!(body.content[0].generated_example, Some(pet.clone()));
    assert_eq!(body.content[1].generated_example, Some(pet));
    assert_eq!(
        body.content[2].generated_example,
        Some(json!({"name": "string"}))
    );
    assert!(body.content.iter().all(|v| v.example.is_none()));
}

#[test]
fn test_request_body_ref_keeps_literal_example() {
    let parsed = ApiDocumentParser::default().parse_file(fixture("petstore-openapi3.yaml"));
    let patch = parsed.endpoint("/pets/{petId}", HttpMethod::Patch).unwrap();
    let body = patch.request_body.as_ref().unwrap();

    assert_eq!(body.description.as_deref(), Some("Fields to update"));
    assert!(body.required.is_none());
    assert_eq!(body.content[0].example, Some(json!({"name": "Rex"})));
    assert!(body.content[0].generated_example.is_none());
}

#[test]
fn test_nested_optional_properties_pruned() {
    let parsed = ApiDocumentParser::default().parse_file(fixture("petstore-openapi3.yaml"));
    let owner = parsed.endpoint("/owners", HttpMethod::Post).unwrap();

    assert_eq!(owner.security, Some(json!([{"bearerAuth": []}])));
    assert_eq!(
        owner.request_body.as_ref().unwrap().content[0].generated_example,
        Some(json!({
            "email": "user@example.com",
            "nickname": "示例: what the pet calls them",
            "pets": [{"id": 0, "name": "doggie"}]
        }))
    );
}

#[test]
fn test_responses_without_synthesis() {
    let parsed = ApiDocumentParser::default().parse_file(fixture("petstore-openapi3.yaml"));

    let list = parsed.endpoint("/pets", HttpMethod::Get).unwrap();
    let codes: Vec<&str> = list
        .responses
        .iter()
        .map(|r| r.status_code.as_str())
        .collect();
    assert_eq!(codes, vec!["200", "default"]);
    assert_eq!(list.responses[1].description.as_deref(), Some("unexpected error"));
    let content = list.responses[0].content.as_ref().unwrap();
    assert!(content[0].generated_example.is_none());

    let show = parsed.endpoint("/pets/{petId}", HttpMethod::Get).unwrap();
    let content = show.responses[0].content.as_ref().unwrap();
    assert_eq!(content[0].example, Some(json!({"id": 7, "name": "Rex"})));

    let create = parsed.endpoint("/pets", HttpMethod::Post).unwrap();
    assert!(create.responses[0].content.is_none());
}

#[test]
fn test_parse_content_is_idempotent() {
    let content = fs::read_to_string(fixture("petstore-openapi3.yaml")).unwrap();
    let parser = ApiDocumentParser::default();

    let first = parser.parse_content(&content);
    let second = parser.parse_content(&content);
    assert!(first.success);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_openapi31_detection_and_type_arrays() {
    let parsed = parse_api_document(
        json!({
            "openapi": "3.1.0",
            "info": {"title": "Notes", "version": "0.1"},
            "paths": {
                "/notes": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "title": {"type": ["string", "null"]},
                                            "pinned": {"type": ["null", "boolean"]}
                                        }
                                    }
                                }
                            }
                        },
                        "parameters": [
                            {"name": "draft", "in": "query", "schema": {"type": ["boolean", "null"]}}
                        ]
                    }
                }
            }
        }),
        SourceDescriptor::url("https://notes.example.com/openapi.json"),
    );

    assert!(parsed.success);
    assert_eq!(parsed.spec_version, Some(SpecVersion::OpenApi31));
    let post = &parsed.endpoints[0];
    assert_eq!(post.parameters[0].param_type.as_deref(), Some("boolean"));
    assert_eq!(
        post.request_body.as_ref().unwrap().content[0].generated_example,
        Some(json!({"title": "string", "pinned": false}))
    );
}
