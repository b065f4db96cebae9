//! engine::ingest
//!
//! Extraction of schema and event drafts from an OpenAPI 3.x document.
//!
//! Every operation becomes one event named by its `operationId` and
//! addressed by the topic `METHOD/path`. The first `application/json*`
//! request body of an operation becomes the event's schema:
//!
//! - a `$ref` to `#/components/schemas/<Name>` yields one schema draft named
//!   `<Name>`, shared by every operation that refers to it;
//! - an inline schema yields a draft named `<operationId>_schema`.
//!
//! Schema content is stored with every reference inlined.

use serde_json::{Map, Value};
use tracing::debug;

use super::resolver::{ref_name, SchemaResolver};
use super::topic::to_topic;
use super::EngineError;
use crate::core::model::{Entity, Event, Ingested, Schema};
use crate::core::types::{ContentType, HttpMethod};

/// Lowest accepted OpenAPI major version.
pub const MIN_MAJOR_VERSION: u64 = 3;

/// Check that `document.openapi` names version 3 or later.
///
/// YAML reads an unquoted `openapi: 3.0` as a number; that form is accepted
/// too.
pub fn check_version(document: &Value) -> Result<(), EngineError> {
    let version = document
        .get("openapi")
        .ok_or_else(|| EngineError::UnsupportedSpecVersion {
            found: "no 'openapi' field".to_string(),
        })?;

    let major = match version {
        Value::String(version) => version
            .split('.')
            .next()
            .and_then(|major| major.trim().parse::<u64>().ok()),
        Value::Number(version) => version
            .as_f64()
            .filter(|v| *v >= 0.0)
            .map(|v| v.trunc() as u64),
        _ => None,
    };

    match major {
        Some(major) if major >= MIN_MAJOR_VERSION => Ok(()),
        _ => Err(EngineError::UnsupportedSpecVersion {
            found: version
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| version.to_string()),
        }),
    }
}

/// Build schema and event drafts from a parsed OpenAPI document.
///
/// # Errors
///
/// - `UnsupportedSpecVersion` unless the document is OpenAPI 3.x or later
/// - `MissingOperationId` / `DuplicateOperationId` for unusable operations
/// - `ReferenceResolution` for missing, unsupported or cyclic references
pub fn ingest(document: &Value) -> Result<Ingested, EngineError> {
    check_version(document)?;

    let resolver = SchemaResolver::new(document);
    let mut ingested = Ingested::default();

    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        debug!("document has no paths");
        return Ok(ingested);
    };

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };

        for method in HttpMethod::ALL {
            let Some(operation) = item.get(method.as_str()) else {
                continue;
            };

            let operation_id = operation
                .get("operationId")
                .and_then(Value::as_str)
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| EngineError::MissingOperationId {
                    method: method.as_upper().to_string(),
                    path: path.clone(),
                })?;

            if ingested.events.contains_key(operation_id) {
                return Err(EngineError::DuplicateOperationId {
                    operation_id: operation_id.to_string(),
                });
            }

            let schema_name =
                extract_schema(operation, operation_id, &resolver, &mut ingested)?;

            let description = operation
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            debug!(operation_id, %method, path = path.as_str(), "drafted event");
            ingested.events.insert(
                operation_id.to_string(),
                Entity::draft(Event {
                    name: operation_id.to_string(),
                    description,
                    topic_name: to_topic(method, path),
                    schema_id: None,
                    application_domain_id: None,
                    schema_name,
                }),
            );
        }
    }

    Ok(ingested)
}

/// Draft the request-body schema of one operation, if it has a JSON one.
fn extract_schema(
    operation: &Value,
    operation_id: &str,
    resolver: &SchemaResolver<'_>,
    ingested: &mut Ingested,
) -> Result<Option<String>, EngineError> {
    let Some(schema) = operation
        .pointer("/requestBody/content")
        .and_then(Value::as_object)
        .and_then(first_json_media)
        .and_then(|media| media.get("schema"))
    else {
        return Ok(None);
    };

    if let Some(Value::String(reference)) = schema.get("$ref") {
        let name = ref_name(reference)?;
        if !ingested.schemas.contains_key(&name) {
            let content = resolver.resolve_named(&name)?;
            ingested
                .schemas
                .insert(name.clone(), Entity::draft(json_schema(&name, &content)));
        }
        return Ok(Some(name));
    }

    let name = format!("{}_schema", operation_id);
    let content = resolver.resolve(schema)?;
    ingested
        .schemas
        .insert(name.clone(), Entity::draft(json_schema(&name, &content)));
    Ok(Some(name))
}

fn first_json_media(content: &Map<String, Value>) -> Option<&Value> {
    content
        .iter()
        .find(|(media_type, _)| media_type.starts_with("application/json"))
        .map(|(_, media)| media)
}

fn json_schema(name: &str, content: &Value) -> Schema {
    Schema {
        name: name.to_string(),
        content_type: ContentType::Json,
        content: content.to_string(),
        application_domain_id: None,
    }
}
