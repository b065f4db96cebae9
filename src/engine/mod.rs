//! engine
//!
//! The OpenAPI ⇄ event catalog transformation engine.
//!
//! # Architecture
//!
//! Forward, from an OpenAPI document into the catalog:
//!
//! ```text
//! ingest (resolver, topic) -> reconcile -> commit
//! ```
//!
//! 1. **Ingest**: Draft one event per operation and one schema per request
//!    body, with every `$ref` inlined
//! 2. **Reconcile**: Look up every draft by name; reuse same-domain objects,
//!    collect ownership conflicts
//! 3. **Commit**: Create the remaining drafts in dependency order and link
//!    the events to the application
//!
//! Reverse, from the catalog back into OpenAPI:
//!
//! ```text
//! list events + schemas -> filter -> emit (topic)
//! ```
//!
//! # Invariants
//!
//! - No creation call is made while any ownership conflict exists
//! - An entity with an id is never submitted for creation
//! - Stored schema content contains no `$ref`
//! - All catalog calls are sequential; no call is retried
//!
//! # Example
//!
//! ```ignore
//! use sep_tools::catalog::http::HttpCatalog;
//! use sep_tools::core::model::Role;
//! use sep_tools::engine::runner::import_openapi;
//!
//! let store = HttpCatalog::new(token, "https://solace.cloud");
//! let summary = import_openapi(&document, "Shop", "ShopApp", Role::Subscriber, &store).await?;
//! println!("{summary}");
//! ```

pub mod commit;
pub mod emit;
pub mod ingest;
pub mod provision;
pub mod reconcile;
pub mod resolver;
pub mod runner;
pub mod topic;

pub use commit::{CommitSummary, Tally};
pub use emit::EventFilter;
pub use reconcile::Conflict;
pub use resolver::{ResolveError, SchemaResolver};
pub use runner::{create_queue, generate_asyncapi, import_openapi, regenerate_openapi};

use thiserror::Error;

use crate::broker::BrokerError;
use crate::catalog::CatalogError;
use crate::core::config::Config;
use crate::core::types::Collection;

/// Errors from the transformation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document is not OpenAPI 3.x or later.
    #[error("unsupported OpenAPI version {found}, must be 3.x")]
    UnsupportedSpecVersion { found: String },

    /// Names already taken by objects of other application domains.
    #[error("{} object(s) already exist with another application domain: {}", .0.len(), conflict_list(.0))]
    OwnershipConflict(Vec<Conflict>),

    /// A schema reference could not be inlined.
    #[error("reference resolution failed: {0}")]
    ReferenceResolution(#[from] ResolveError),

    /// A named domain or application does not exist in the catalog.
    #[error("could not find {} '{name}'", .collection.label())]
    NotFound { collection: Collection, name: String },

    /// Two operations share one operationId.
    #[error("duplicate operationId '{operation_id}'")]
    DuplicateOperationId { operation_id: String },

    /// An operation has no operationId to name its event.
    #[error("operation {method} {path} has no operationId")]
    MissingOperationId { method: String, path: String },

    /// A stored JSON schema does not parse.
    #[error("schema '{name}' has invalid JSON content: {message}")]
    InvalidSchemaContent { name: String, message: String },

    /// Catalog call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Broker call failed.
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

fn conflict_list(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Execution context for commands.
///
/// Contains the catalog URL override and the loaded config file.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Catalog base URL override from the command line.
    pub catalog_url: Option<String>,
    /// Loaded configuration (defaults if no file was found).
    pub config: Config,
}

impl Context {
    /// Catalog base URL: command line first, then config.
    pub fn catalog_url(&self) -> &str {
        self.catalog_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or_else(|| self.config.catalog_url())
    }
}
