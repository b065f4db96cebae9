//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Identifier`] - Catalog-assigned object identifier
//! - [`HttpMethod`] - One of the eight OpenAPI operation methods
//! - [`ContentType`] - Schema content type as stored by the catalog
//! - [`Collection`] - Catalog object collection (domains, applications, ...)
//!
//! # Examples
//!
//! ```
//! use sep_tools::core::types::{HttpMethod, Identifier};
//!
//! let id = Identifier::new("a1b2c3").unwrap();
//! assert_eq!(id.as_str(), "a1b2c3");
//!
//! assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
//! assert_eq!(HttpMethod::parse("fetch"), None);
//! assert!(Identifier::new("").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// An identifier assigned by the event catalog.
///
/// Identifiers are opaque strings. The only rule enforced locally is that
/// they are non-empty, since an empty id would be indistinguishable from
/// "not yet created".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create a new identifier.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIdentifier` if the value is empty or blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TypeError::InvalidIdentifier(
                "identifier cannot be empty".into(),
            ));
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP methods that may appear as operations on an OpenAPI path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All methods, in the order operations are visited on a path item.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Lower-case name, as used for keys of an OpenAPI path item.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Upper-case name, as used as a topic prefix.
    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Parse a method name case-insensitively.
    ///
    /// Returns `None` for anything outside the eight known methods.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == lower)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema content type as understood by the catalog.
///
/// Only `Json` schemas take part in OpenAPI generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "Text")]
    Text,
    #[serde(rename = "Binary")]
    Binary,
    /// Any content type this tool does not know about.
    #[serde(other)]
    Unknown,
}

impl ContentType {
    /// Check whether this is a JSON schema.
    pub fn is_json(&self) -> bool {
        matches!(self, ContentType::Json)
    }
}

/// Catalog object collections, in reconciliation and creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    ApplicationDomains,
    Applications,
    Schemas,
    Events,
}

impl Collection {
    /// URL path segment of the collection.
    pub fn path(self) -> &'static str {
        match self {
            Collection::ApplicationDomains => "applicationDomains",
            Collection::Applications => "applications",
            Collection::Schemas => "schemas",
            Collection::Events => "events",
        }
    }

    /// Human-readable singular name for messages.
    pub fn label(self) -> &'static str {
        match self {
            Collection::ApplicationDomains => "Application domain",
            Collection::Applications => "Application",
            Collection::Schemas => "Schema",
            Collection::Events => "Event",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod identifier {
        use super::*;

        #[test]
        fn accepts_opaque_values() {
            let id = Identifier::new("4x7k2pq").unwrap();
            assert_eq!(id.as_str(), "4x7k2pq");
            assert_eq!(id.to_string(), "4x7k2pq");
        }

        #[test]
        fn rejects_empty_and_blank() {
            assert!(Identifier::new("").is_err());
            assert!(Identifier::new("   ").is_err());
        }

        #[test]
        fn deserializes_from_json_string() {
            let id: Identifier = serde_json::from_str("\"abc\"").unwrap();
            assert_eq!(id.as_str(), "abc");
            assert!(serde_json::from_str::<Identifier>("\"\"").is_err());
        }
    }

    mod http_method {
        use super::*;

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
            assert_eq!(HttpMethod::parse("DELETE"), Some(HttpMethod::Delete));
            assert_eq!(HttpMethod::parse("Options"), Some(HttpMethod::Options));
        }

        #[test]
        fn parse_rejects_unknown() {
            assert_eq!(HttpMethod::parse(""), None);
            assert_eq!(HttpMethod::parse("orders.created"), None);
            assert_eq!(HttpMethod::parse("connect"), None);
        }

        #[test]
        fn all_is_visit_order() {
            let names: Vec<_> = HttpMethod::ALL.iter().map(|m| m.as_str()).collect();
            assert_eq!(
                names,
                ["get", "put", "post", "delete", "options", "head", "patch", "trace"]
            );
        }

        #[test]
        fn upper_matches_lower() {
            for method in HttpMethod::ALL {
                assert_eq!(method.as_upper().to_ascii_lowercase(), method.as_str());
            }
        }
    }

    mod content_type {
        use super::*;

        #[test]
        fn known_values() {
            let ct: ContentType = serde_json::from_str("\"JSON\"").unwrap();
            assert!(ct.is_json());
            let ct: ContentType = serde_json::from_str("\"XML\"").unwrap();
            assert_eq!(ct, ContentType::Xml);
        }

        #[test]
        fn unknown_values_do_not_fail() {
            let ct: ContentType = serde_json::from_str("\"Avro\"").unwrap();
            assert_eq!(ct, ContentType::Unknown);
            assert!(!ct.is_json());
        }
    }

    #[test]
    fn collection_paths() {
        let paths: Vec<_> = [
            Collection::ApplicationDomains,
            Collection::Applications,
            Collection::Schemas,
            Collection::Events,
        ]
        .iter()
        .map(|c| c.path())
        .collect();
        assert_eq!(
            paths,
            ["applicationDomains", "applications", "schemas", "events"]
        );
        assert_eq!(Collection::Schemas.label(), "Schema");
    }
}
