//! Swagger / OpenAPI document normalization
//!
//! This crate turns Swagger 2.0 and OpenAPI 3.0 / 3.1 documents into one
//! normalized model (`ParsedDocument`).
//!
//! ## Pipeline
//!
//! - Detect the dialect and parse into [`ApiDocument`]
//! - Extract `info` / servers ([`normalize_info`])
//! - Walk every path × HTTP method ([`EndpointExtractor`]), normalizing
//!   parameters, the request body, and responses per operation
//! - Normalize document-level tags and security schemes
//!
//! Request body schemas get a synthesized example ([`ExampleGenerator`])
//! when the author did not supply one. `$ref`s are resolved against the
//! same document only ([`resolve_ref`]).
//!
//! ## Failure handling
//!
//! Parsing never fails outright. A broken document yields
//! `success == false` with an error message, a broken operation is dropped
//! from the endpoint list, and a broken schema node synthesizes `null` or `{}`.
//!
//! ## Usage
//! ```rust,ignore
//! use apinorm_parser::ApiDocumentParser;
//!
//! let parsed = ApiDocumentParser::default().parse_file("petstore.yaml");
//! for endpoint in &parsed.endpoints {
//!     println!("{} {}", endpoint.method, endpoint.path);
//! }
//! ```

mod document;
mod endpoint;
mod example;
mod info;
mod loader;
mod parameter;
mod reference;
mod request_body;
mod response;
mod security;
mod tag;

pub use document::{ApiDocument, OpenApiV3Document, RawInfo, SwaggerV2Document};
pub use endpoint::EndpointExtractor;
pub use example::{ExampleGenerator, ADDITIONAL_PROPERTY_KEY};
pub use info::normalize_info;
pub use loader::DocumentLoader;
pub use reference::resolve_ref;
pub use security::normalize_security_schemes;
pub use tag::normalize_tags;

use apinorm_common::{ParsedDocument, ParserOptions, SourceDescriptor};
use serde_json::Value;
use std::path::Path;

/// Normalize an already-loaded document with default options
///
/// # Examples
/// ```
/// use apinorm_common::{SourceDescriptor, SpecVersion};
/// use apinorm_parser::parse_api_document;
/// use serde_json::json;
///
/// let doc = json!({
///     "swagger": "2.0",
///     "info": {"title": "Pets", "version": "1"},
///     "paths": {"/pets": {"get": {"responses": {"200": {"description": "OK"}}}}}
/// });
///
/// let parsed = parse_api_document(doc, SourceDescriptor::literal());
/// assert!(parsed.success);
/// assert_eq!(parsed.spec_version, Some(SpecVersion::Swagger2));
/// assert_eq!(parsed.endpoints.len(), 1);
/// ```
pub fn parse_api_document(document: Value, source: SourceDescriptor) -> ParsedDocument {
    ApiDocumentParser::default().parse(document, source)
}

/// Document parser configured with [`ParserOptions`]
#[derive(Debug, Clone, Default)]
pub struct ApiDocumentParser {
    options: ParserOptions,
}

impl ApiDocumentParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Normalize a loaded document. Never fails: document-level problems
    /// come back as `success == false` with the source echoed.
    pub fn parse(&self, document: Value, source: SourceDescriptor) -> ParsedDocument {
        let document = match ApiDocument::from_value(document) {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", source.location, e);
                return ParsedDocument::failure(source, e.to_string());
            }
        };

        let endpoints = EndpointExtractor::new(&document, &self.options).extract();
        log::debug!(
            "Parsed {} ({}) with {} endpoints",
            source.location,
            document.version(),
            endpoints.len()
        );

        ParsedDocument {
            success: true,
            error: None,
            source,
            spec_version: Some(document.version()),
            info: Some(normalize_info(&document, &self.options)),
            endpoints,
            tags: normalize_tags(document.tags()),
            security_schemes: normalize_security_schemes(
                &document,
                self.options.security_conflict,
            ),
            components: document.components().cloned(),
        }
    }

    /// Load, validate, and normalize a JSON or YAML file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> ParsedDocument {
        let source = SourceDescriptor::file(path.as_ref().display().to_string());
        match DocumentLoader::from_file(path.as_ref()) {
            Ok(document) => self.parse(document, source),
            Err(e) => ParsedDocument::failure(source, e.to_string()),
        }
    }

    /// Load, validate, and normalize a literal JSON or YAML string
    pub fn parse_content(&self, content: &str) -> ParsedDocument {
        let source = SourceDescriptor::literal();
        match DocumentLoader::from_content(content) {
            Ok(document) => self.parse(document, source),
            Err(e) => ParsedDocument::failure(source, e.to_string()),
        }
    }
}
