//! core::model
//!
//! Catalog entities and the per-invocation import graph.
//!
//! # Draft vs Resolved
//!
//! Every entity built from an OpenAPI document starts as a draft. The
//! reconciler marks entities that already exist in the catalog as
//! [`Status::Existing`]; the writer marks the ones it creates as
//! [`Status::Created`]. Only drafts are ever submitted for creation.
//!
//! # Records
//!
//! [`CatalogObject`], [`EventRecord`], [`SchemaRecord`] and [`DomainRecord`]
//! are what the catalog hands back when objects are looked up or listed.
//! They tolerate extra fields so that catalog API additions do not break
//! decoding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{ContentType, Identifier};

/// Lifecycle state of an entity within one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Not known to exist in the catalog yet.
    #[default]
    Draft,
    /// Found in the catalog during reconciliation.
    Existing(Identifier),
    /// Created by this invocation.
    Created(Identifier),
}

/// A catalog entity payload together with its lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<T> {
    /// The payload sent to the catalog on creation.
    pub payload: T,
    /// Draft, existing, or created.
    pub status: Status,
}

impl<T> Entity<T> {
    /// Wrap a payload as a draft.
    pub fn draft(payload: T) -> Self {
        Self {
            payload,
            status: Status::Draft,
        }
    }

    /// The catalog id, if the entity exists or was created.
    pub fn id(&self) -> Option<&Identifier> {
        match &self.status {
            Status::Draft => None,
            Status::Existing(id) | Status::Created(id) => Some(id),
        }
    }

    /// Check if this entity still has to be created.
    pub fn is_draft(&self) -> bool {
        matches!(self.status, Status::Draft)
    }
}

/// Application domain payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDomain {
    pub name: String,
    pub enforce_unique_topic_names: bool,
    pub topic_domain: String,
}

impl ApplicationDomain {
    /// A new domain with the defaults used for imports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enforce_unique_topic_names: true,
            topic_domain: String::new(),
        }
    }
}

/// Application payload.
///
/// The event id lists are not part of the creation request; they are set
/// by the final update step of a commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_domain_id: Option<Identifier>,
    #[serde(skip)]
    pub consumed_event_ids: Vec<Identifier>,
    #[serde(skip)]
    pub produced_event_ids: Vec<Identifier>,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            application_domain_id: None,
            consumed_event_ids: Vec::new(),
            produced_event_ids: Vec::new(),
        }
    }
}

/// Schema payload. `content` is serialized JSON without any `$ref`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub name: String,
    pub content_type: ContentType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_domain_id: Option<Identifier>,
}

/// Event payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    pub description: String,
    pub topic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_domain_id: Option<Identifier>,
    /// Name of the schema draft this event carries, resolved to
    /// `schema_id` at commit time.
    #[serde(skip)]
    pub schema_name: Option<String>,
}

/// Which side of the events the imported application takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// The application consumes all imported events.
    #[default]
    Subscriber,
    /// The application produces all imported events.
    Publisher,
}

impl Role {
    /// Pick the role from the `--pub` flag.
    pub fn from_pub_flag(publish: bool) -> Self {
        if publish {
            Role::Publisher
        } else {
            Role::Subscriber
        }
    }

    /// Field of the application update request that carries event ids.
    pub fn event_ids_field(self) -> &'static str {
        match self {
            Role::Subscriber => "consumedEventIds",
            Role::Publisher => "producedEventIds",
        }
    }
}

/// Schema and event drafts extracted from one OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    /// Schema drafts keyed by schema name, in discovery order.
    pub schemas: IndexMap<String, Entity<Schema>>,
    /// Event drafts keyed by operation id, in document order.
    pub events: IndexMap<String, Entity<Event>>,
}

/// Everything one import run creates or reuses.
///
/// Owned by the command that built it and discarded when it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportGraph {
    pub domain: Entity<ApplicationDomain>,
    pub application: Entity<Application>,
    pub schemas: IndexMap<String, Entity<Schema>>,
    pub events: IndexMap<String, Entity<Event>>,
}

impl ImportGraph {
    /// Build the graph for importing `ingested` into the named domain and application.
    pub fn new(domain: &str, application: &str, ingested: Ingested) -> Self {
        Self {
            domain: Entity::draft(ApplicationDomain::new(domain)),
            application: Entity::draft(Application::new(application)),
            schemas: ingested.schemas,
            events: ingested.events,
        }
    }

    /// Number of entities still to be created.
    pub fn pending(&self) -> usize {
        usize::from(self.domain.is_draft())
            + usize::from(self.application.is_draft())
            + self.schemas.values().filter(|s| s.is_draft()).count()
            + self.events.values().filter(|e| e.is_draft()).count()
    }
}

// --------------------------------------------------------------------------
// Catalog records
// --------------------------------------------------------------------------

/// Minimal view of any catalog object, as returned by a name lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogObject {
    pub id: Identifier,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub application_domain_id: Option<Identifier>,
}

/// An application domain as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: Identifier,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An event as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Identifier,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub topic_name: String,
    #[serde(default)]
    pub schema_id: Option<Identifier>,
    #[serde(default)]
    pub consumed_application_ids: Vec<Identifier>,
    #[serde(default)]
    pub produced_application_ids: Vec<Identifier>,
}

/// A schema as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    pub id: Identifier,
    pub name: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub content: Option<String>,
}
