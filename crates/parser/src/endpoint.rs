//! Endpoint extraction: one record per path × HTTP method
//!
//! Each operation is normalized on its own. An operation that fails is
//! logged and left out, the rest of the document is still returned.

use crate::document::{ApiDocument, RawOperation};
use crate::example::ExampleGenerator;
use crate::parameter::{merge_parameters, normalize_parameters};
use crate::reference::resolve_node;
use crate::request_body::{normalize_openapi3_body, normalize_swagger2_body};
use crate::response::normalize_responses;
use apinorm_common::{ApiNormError, Endpoint, HttpMethod, ParserOptions, Result};
use serde::Deserialize;
use serde_json::Value;

const PARAMETERS_FIELD: &str = "parameters";
const EXTENSION_PREFIX: &str = "x-";

/// Walks `paths` in document order and methods in [`HttpMethod::ALL`] order
pub struct EndpointExtractor<'a> {
    document: &'a ApiDocument,
    options: &'a ParserOptions,
    examples: ExampleGenerator<'a>,
}

impl<'a> EndpointExtractor<'a> {
    pub fn new(document: &'a ApiDocument, options: &'a ParserOptions) -> Self {
        Self {
            document,
            options,
            examples: ExampleGenerator::new(document.root(), options),
        }
    }

    /// Extract every operation that normalizes cleanly
    pub fn extract(&self) -> Vec<Endpoint> {
        let root = self.document.root();
        let mut endpoints = Vec::new();

        for (path, item) in self.document.paths() {
            if path.starts_with(EXTENSION_PREFIX) {
                continue;
            }

            let item = match resolve_node(item, root) {
                Ok(item) => item,
                Err(e) => {
                    log::warn!("Skipping path {}: {}", path, e);
                    continue;
                }
            };
            let Some(item) = item.as_object() else {
                log::warn!("Skipping path {}: path item is not an object", path);
                continue;
            };

            for method in HttpMethod::ALL {
                let Some(operation) = item.get(method.path_item_key()) else {
                    continue;
                };

                match self.normalize_operation(path, method, item.get(PARAMETERS_FIELD), operation)
                {
                    Ok(endpoint) => endpoints.push(endpoint),
                    Err(e) => log::warn!("Skipping operation: {}", e),
                }
            }
        }

        log::debug!("Extracted {} endpoints", endpoints.len());
        endpoints
    }

    fn normalize_operation(
        &self,
        path: &str,
        method: HttpMethod,
        path_parameters: Option<&Value>,
        operation: &Value,
    ) -> Result<Endpoint> {
        let malformed = |reason: String| ApiNormError::MalformedOperation {
            path: path.to_string(),
            method: method.to_string(),
            reason,
        };
        let root = self.document.root();

        let raw = RawOperation::deserialize(operation).map_err(|e| malformed(e.to_string()))?;

        let path_parameters = match path_parameters {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => Vec::<Value>::deserialize(value)
                .map_err(|e| malformed(format!("path-level parameters: {}", e)))?,
        };

        let parameters = merge_parameters(&path_parameters, &raw.parameters, root)
            .map_err(|e| malformed(e.to_string()))?;
        let normalized_parameters =
            normalize_parameters(&parameters).map_err(|e| malformed(e.to_string()))?;

        let request_body = match self.document {
            ApiDocument::OpenApi3 { .. } => raw
                .request_body
                .as_ref()
                .map(|body| normalize_openapi3_body(body, root, &self.examples))
                .transpose()
                .map_err(|e| malformed(e.to_string()))?,
            ApiDocument::Swagger2 { .. } => {
                let consumes: &[String] = if raw.consumes.is_empty() {
                    self.document.consumes()
                } else {
                    &raw.consumes
                };
                let examples = self
                    .options
                    .synthesize_swagger2_examples
                    .then_some(&self.examples);
                normalize_swagger2_body(&parameters, consumes, examples)
            }
        };

        let responses =
            normalize_responses(&raw.responses, root).map_err(|e| malformed(e.to_string()))?;

        Ok(Endpoint {
            path: path.to_string(),
            method,
            summary: raw.summary,
            description: raw.description,
            operation_id: raw.operation_id,
            tags: raw.tags,
            deprecated: raw.deprecated,
            parameters: normalized_parameters,
            request_body,
            responses,
            security: raw.security,
            servers: raw.servers,
        })
    }
}
