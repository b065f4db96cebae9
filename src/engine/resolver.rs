//! engine::resolver
//!
//! Inlining of `#/components/schemas/<Name>` references.
//!
//! The catalog stores each schema as a standalone document, so every
//! reference must be replaced by the full text of the schema it names before
//! a schema is submitted.
//!
//! # Cycles
//!
//! The resolver keeps the chain of schema names currently being expanded.
//! Reaching a name that is already on the chain is a cycle and is reported
//! with the full chain. Two branches referring to the same schema are not a
//! cycle; each is expanded independently.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sep_tools::engine::resolver::SchemaResolver;
//!
//! let document = json!({
//!     "components": { "schemas": {
//!         "Pet": { "type": "object", "properties": { "tag": { "$ref": "#/components/schemas/Tag" } } },
//!         "Tag": { "type": "string" }
//!     }}
//! });
//! let resolver = SchemaResolver::new(&document);
//! let pet = resolver.resolve_named("Pet").unwrap();
//! assert_eq!(pet["properties"]["tag"], json!({ "type": "string" }));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

/// Prefix of every reference the resolver understands.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Errors from reference resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A schema refers back to itself, directly or through others.
    #[error("schema cycle detected: {}", chain.join(" -> "))]
    Cycle {
        /// Names from the first expanded schema back to the repeated one.
        chain: Vec<String>,
    },

    /// A reference names a schema that `components.schemas` lacks.
    #[error("referenced schema '{name}' not found in components.schemas")]
    Missing { name: String },

    /// A reference that is not of the form `#/components/schemas/<Name>`.
    #[error("unsupported schema reference '{reference}'")]
    Unsupported { reference: String },
}

/// Resolves schema references against one document's `components.schemas`.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    schemas: Option<&'a Map<String, Value>>,
}

impl<'a> SchemaResolver<'a> {
    /// Create a resolver over the `components.schemas` of an OpenAPI document.
    ///
    /// A document without components resolves nothing; every reference is
    /// then reported as missing.
    pub fn new(document: &'a Value) -> Self {
        Self {
            schemas: document
                .pointer("/components/schemas")
                .and_then(Value::as_object),
        }
    }

    /// Return a copy of `schema` with every reference inlined, at any depth.
    pub fn resolve(&self, schema: &Value) -> Result<Value, ResolveError> {
        self.expand(schema, &mut Vec::new())
    }

    /// Look up a component schema by name and resolve it.
    pub fn resolve_named(&self, name: &str) -> Result<Value, ResolveError> {
        self.expand_named(name, &mut Vec::new())
    }

    fn expand_named(&self, name: &str, chain: &mut Vec<String>) -> Result<Value, ResolveError> {
        if chain.iter().any(|n| n == name) {
            let mut cycle = chain.clone();
            cycle.push(name.to_string());
            return Err(ResolveError::Cycle { chain: cycle });
        }

        let schema = self
            .schemas
            .and_then(|schemas| schemas.get(name))
            .ok_or_else(|| ResolveError::Missing {
                name: name.to_string(),
            })?;

        chain.push(name.to_string());
        let resolved = self.expand(schema, chain);
        chain.pop();
        resolved
    }

    fn expand(&self, value: &Value, chain: &mut Vec<String>) -> Result<Value, ResolveError> {
        match value {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref") {
                    let name = match reference {
                        Value::String(reference) => ref_name(reference)?,
                        other => {
                            return Err(ResolveError::Unsupported {
                                reference: other.to_string(),
                            })
                        }
                    };
                    return self.expand_named(&name, chain);
                }

                let mut expanded = Map::with_capacity(map.len());
                for (key, child) in map {
                    expanded.insert(key.clone(), self.expand(child, chain)?);
                }
                Ok(Value::Object(expanded))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.expand(item, chain))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            scalar => Ok(scalar.clone()),
        }
    }
}

/// Extract the schema name from a `#/components/schemas/<Name>` reference.
///
/// JSON-pointer escapes in the name (`~1` for `/`, `~0` for `~`) are decoded.
pub fn ref_name(reference: &str) -> Result<String, ResolveError> {
    let unsupported = || ResolveError::Unsupported {
        reference: reference.to_string(),
    };

    let name = reference
        .strip_prefix(SCHEMA_REF_PREFIX)
        .ok_or_else(unsupported)?;
    if name.is_empty() || name.contains('/') {
        return Err(unsupported());
    }
    Ok(name.replace("~1", "/").replace("~0", "~"))
}

/// Check whether any `$ref` key remains anywhere in `value`.
pub fn contains_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("$ref") || map.values().any(contains_ref),
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(schemas: Value) -> Value {
        json!({ "openapi": "3.0.0", "components": { "schemas": schemas } })
    }

    #[test]
    fn inlines_nested_chain() {
        let document = doc(json!({
            "A": { "type": "object", "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": { "type": "object", "properties": { "c": { "$ref": "#/components/schemas/C" } } },
            "C": { "type": "integer" }
        }));
        let resolved = SchemaResolver::new(&document).resolve_named("A").unwrap();
        assert_eq!(
            resolved["properties"]["b"]["properties"]["c"],
            json!({ "type": "integer" })
        );
        assert!(!contains_ref(&resolved));
    }

    #[test]
    fn traverses_arrays() {
        let document = doc(json!({
            "Named": { "allOf": [ { "$ref": "#/components/schemas/Id" }, { "type": "object" } ] },
            "Id": { "type": "string", "format": "uuid" }
        }));
        let resolved = SchemaResolver::new(&document).resolve_named("Named").unwrap();
        assert_eq!(resolved["allOf"][0], json!({ "type": "string", "format": "uuid" }));
    }

    #[test]
    fn root_reference_is_replaced() {
        let document = doc(json!({ "Alias": { "$ref": "#/components/schemas/Real" }, "Real": { "type": "boolean" } }));
        let resolver = SchemaResolver::new(&document);
        let inline = json!({ "$ref": "#/components/schemas/Alias", "description": "dropped" });
        assert_eq!(resolver.resolve(&inline).unwrap(), json!({ "type": "boolean" }));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let document = doc(json!({
            "Top": { "properties": {
                "left": { "$ref": "#/components/schemas/Leaf" },
                "right": { "$ref": "#/components/schemas/Leaf" }
            }},
            "Leaf": { "type": "string" }
        }));
        let resolved = SchemaResolver::new(&document).resolve_named("Top").unwrap();
        assert_eq!(resolved["properties"]["left"], resolved["properties"]["right"]);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let document = doc(json!({
            "Node": { "properties": { "next": { "$ref": "#/components/schemas/Node" } } }
        }));
        let err = SchemaResolver::new(&document).resolve_named("Node").unwrap_err();
        assert_eq!(
            err,
            ResolveError::Cycle {
                chain: vec!["Node".into(), "Node".into()]
            }
        );
    }

    #[test]
    fn indirect_cycle_names_chain() {
        let document = doc(json!({
            "A": { "properties": { "b": { "$ref": "#/components/schemas/B" } } },
            "B": { "items": { "$ref": "#/components/schemas/A" } }
        }));
        let err = SchemaResolver::new(&document).resolve_named("A").unwrap_err();
        assert_eq!(err.to_string(), "schema cycle detected: A -> B -> A");
    }

    #[test]
    fn missing_schema() {
        let document = doc(json!({ "A": { "$ref": "#/components/schemas/Nope" } }));
        let err = SchemaResolver::new(&document).resolve_named("A").unwrap_err();
        assert_eq!(err, ResolveError::Missing { name: "Nope".into() });
    }

    #[test]
    fn document_without_components() {
        let document = json!({ "openapi": "3.0.0" });
        let err = SchemaResolver::new(&document)
            .resolve(&json!({ "$ref": "#/components/schemas/X" }))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Missing { .. }));
    }

    #[test]
    fn other_reference_shapes_are_unsupported() {
        for reference in [
            "#/components/parameters/Id",
            "other.yaml#/components/schemas/X",
            "#/components/schemas/",
            "#/components/schemas/A/properties/b",
        ] {
            assert!(
                matches!(ref_name(reference), Err(ResolveError::Unsupported { .. })),
                "{reference}"
            );
        }
    }

    #[test]
    fn non_string_reference_is_unsupported() {
        let document = doc(json!({}));
        let err = SchemaResolver::new(&document)
            .resolve(&json!({ "$ref": 7 }))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Unsupported { .. }));
    }

    #[test]
    fn decodes_pointer_escapes() {
        assert_eq!(ref_name("#/components/schemas/a~1b~0c").unwrap(), "a/b~c");
    }
}
