//! engine::emit
//!
//! Re-synthesis of an OpenAPI document from catalog events and schemas.
//!
//! The catalog carries no response information, so every operation gets a
//! placeholder `200` response. Only JSON schemas are emitted; an event gets a
//! request body when a component with its schema's name was emitted.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use super::resolver::SCHEMA_REF_PREFIX;
use super::topic::from_topic;
use super::EngineError;
use crate::core::model::{EventRecord, SchemaRecord};
use crate::core::types::Identifier;

/// Version stamped on every generated document.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Version stamped into `info.version`.
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Which catalog events count as the domain's external API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    /// Events consumed by at least one application.
    #[default]
    Consumed,
    /// Events consumed by at least one application and produced by none.
    ExternalOnly,
}

impl EventFilter {
    /// Pick the filter from the `--external-only` flag.
    pub fn from_external_only(external_only: bool) -> Self {
        if external_only {
            EventFilter::ExternalOnly
        } else {
            EventFilter::Consumed
        }
    }

    /// Check whether an event passes the filter.
    pub fn keeps(self, event: &EventRecord) -> bool {
        let consumed = !event.consumed_application_ids.is_empty();
        match self {
            EventFilter::Consumed => consumed,
            EventFilter::ExternalOnly => consumed && event.produced_application_ids.is_empty(),
        }
    }
}

/// Build an OpenAPI document from catalog records.
///
/// `title` and `description` fill `info`; a missing description becomes
/// `""`. Events are emitted in the order given. When two events decompose
/// to the same path and method, the later one wins.
///
/// # Errors
///
/// Returns `InvalidSchemaContent` if a JSON schema's content does not parse.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sep_tools::core::model::{EventRecord, SchemaRecord};
/// use sep_tools::engine::emit::emit;
///
/// let events: Vec<EventRecord> = serde_json::from_value(json!([
///     { "id": "e1", "name": "createOrder", "topicName": "POST/orders", "schemaId": "s1" }
/// ])).unwrap();
/// let schemas: Vec<SchemaRecord> = serde_json::from_value(json!([
///     { "id": "s1", "name": "OrderReq", "contentType": "JSON", "content": "{\"type\":\"object\"}" }
/// ])).unwrap();
///
/// let document = emit("Shop", None, &events, &schemas).unwrap();
/// assert_eq!(
///     document["paths"]["/orders"]["post"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
///     "#/components/schemas/OrderReq"
/// );
/// ```
pub fn emit(
    title: &str,
    description: Option<&str>,
    events: &[EventRecord],
    schemas: &[SchemaRecord],
) -> Result<Value, EngineError> {
    let mut components = Map::new();
    let mut by_id: HashMap<&Identifier, &SchemaRecord> = HashMap::new();

    for schema in schemas {
        by_id.entry(&schema.id).or_insert(schema);
        let content = match schema.content.as_deref() {
            Some(content) if schema.content_type.is_json() && !content.is_empty() => content,
            _ => {
                debug!(schema = schema.name.as_str(), "skipping non-JSON or empty schema");
                continue;
            }
        };
        let parsed: Value =
            serde_json::from_str(content).map_err(|e| EngineError::InvalidSchemaContent {
                name: schema.name.clone(),
                message: e.to_string(),
            })?;
        components.insert(schema.name.clone(), parsed);
    }

    let mut paths = Map::new();
    for event in events {
        let (method, path) = from_topic(&event.topic_name);
        debug!(topic = event.topic_name.as_str(), %method, path = path.as_str(), "emitting operation");

        let mut operation = json!({
            "operationId": event.name,
            "description": event.description.as_deref().unwrap_or_default(),
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "application/json": {
                            "schema": { "type": "string" }
                        }
                    }
                }
            }
        });

        // Linked by name: any record with this name may have been emitted.
        let linked = event
            .schema_id
            .as_ref()
            .and_then(|id| by_id.get(id))
            .filter(|record| components.contains_key(&record.name));
        if let Some(record) = linked {
            operation["requestBody"] = json!({
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("{}{}", SCHEMA_REF_PREFIX, record.name) }
                    }
                }
            });
        }

        let item = paths
            .entry(path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(item) = item {
            item.insert(method.as_str().to_string(), operation);
        }
    }

    Ok(json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": title,
            "description": description.unwrap_or_default(),
            "version": DOCUMENT_VERSION,
        },
        "components": { "schemas": components },
        "paths": paths,
    }))
}
