//! engine::commit
//!
//! Creation of the drafts of a reconciled import graph.
//!
//! Objects are created in dependency order: domain, application, schemas,
//! events. Each new object gets the domain id, and each new event gets the
//! id of its schema. Finally the application is updated to consume (or
//! produce) every event of the graph.
//!
//! Calls are made one at a time. The first failure stops the commit;
//! objects created before it stay in the catalog.

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::EngineError;
use crate::catalog::{CatalogError, CatalogStore};
use crate::core::model::{Entity, ImportGraph, Role, Status};
use crate::core::types::{Collection, Identifier};

/// Created and reused counts for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub reused: usize,
}

/// What one commit did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub domains: Tally,
    pub applications: Tally,
    pub schemas: Tally,
    pub events: Tally,
    /// Role the application was given for the imported events.
    pub role: Role,
    /// Number of events attached to the application.
    pub linked_events: usize,
}

impl CommitSummary {
    fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Total number of objects created.
    pub fn created(&self) -> usize {
        self.tallies().map(|t| t.created).sum()
    }

    /// Total number of existing objects reused.
    pub fn reused(&self) -> usize {
        self.tallies().map(|t| t.reused).sum()
    }

    fn tallies(&self) -> impl Iterator<Item = &Tally> {
        [&self.domains, &self.applications, &self.schemas, &self.events].into_iter()
    }

    fn tally_mut(&mut self, collection: Collection) -> &mut Tally {
        match collection {
            Collection::ApplicationDomains => &mut self.domains,
            Collection::Applications => &mut self.applications,
            Collection::Schemas => &mut self.schemas,
            Collection::Events => &mut self.events,
        }
    }
}

impl fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created {} and reused {} catalog objects; {} events {}",
            self.created(),
            self.reused(),
            self.linked_events,
            match self.role {
                Role::Subscriber => "subscribed",
                Role::Publisher => "published",
            }
        )
    }
}

/// Create every draft of `graph` and link the events to the application.
///
/// On success every entity of the graph carries an id.
///
/// # Errors
///
/// Returns `Catalog` for the first failing call. Nothing after it is
/// attempted.
pub async fn commit(
    graph: &mut ImportGraph,
    role: Role,
    store: &dyn CatalogStore,
) -> Result<CommitSummary, EngineError> {
    let mut summary = CommitSummary::new(role);

    let domain_id = ensure(store, Collection::ApplicationDomains, &mut graph.domain, &mut summary).await?;

    if graph.application.is_draft() {
        graph.application.payload.application_domain_id = Some(domain_id.clone());
    }
    let application_id = ensure(store, Collection::Applications, &mut graph.application, &mut summary).await?;

    for schema in graph.schemas.values_mut() {
        if schema.is_draft() {
            schema.payload.application_domain_id = Some(domain_id.clone());
        }
        ensure(store, Collection::Schemas, schema, &mut summary).await?;
    }

    let mut event_ids = Vec::with_capacity(graph.events.len());
    for event in graph.events.values_mut() {
        if event.is_draft() {
            event.payload.application_domain_id = Some(domain_id.clone());
            event.payload.schema_id = event
                .payload
                .schema_name
                .as_ref()
                .and_then(|name| graph.schemas.get(name))
                .and_then(|schema| schema.id().cloned());
        }
        event_ids.push(ensure(store, Collection::Events, event, &mut summary).await?);
    }

    store
        .update_application_events(&application_id, role, &event_ids)
        .await?;
    let application = &mut graph.application.payload;
    match role {
        Role::Subscriber => application.consumed_event_ids = event_ids,
        Role::Publisher => application.produced_event_ids = event_ids,
    }
    summary.linked_events = graph.events.len();

    info!(
        "events {} by application '{}'",
        match role {
            Role::Subscriber => "subscribed",
            Role::Publisher => "published",
        },
        application.name
    );
    Ok(summary)
}

/// Return the id of an entity, creating it first if it is a draft.
async fn ensure<T: Serialize + Named>(
    store: &dyn CatalogStore,
    collection: Collection,
    entity: &mut Entity<T>,
    summary: &mut CommitSummary,
) -> Result<Identifier, EngineError> {
    if let Some(id) = entity.id() {
        summary.tally_mut(collection).reused += 1;
        return Ok(id.clone());
    }

    let body = serde_json::to_value(&entity.payload)
        .map_err(|e| CatalogError::Decode(e.to_string()))?;
    let id = store.create(collection, &body).await?;
    info!(
        "{} '{}'[{}] created",
        collection.label(),
        entity.payload.name(),
        id
    );

    entity.status = Status::Created(id.clone());
    summary.tally_mut(collection).created += 1;
    Ok(id)
}

/// Payloads that carry a name.
trait Named {
    fn name(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(
    crate::core::model::ApplicationDomain,
    crate::core::model::Application,
    crate::core::model::Schema,
    crate::core::model::Event
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::{FailOn, MockCatalog, MockOperation};
    use crate::core::model::{Event, Ingested, Schema};
    use crate::core::types::ContentType;
    use serde_json::json;

    fn graph() -> ImportGraph {
        let mut ingested = Ingested::default();
        ingested.schemas.insert(
            "Pet".into(),
            Entity::draft(Schema {
                name: "Pet".into(),
                content_type: ContentType::Json,
                content: "{\"type\":\"object\"}".into(),
                application_domain_id: None,
            }),
        );
        for (name, topic, schema) in [
            ("listPets", "GET/pets", None),
            ("addPet", "POST/pets", Some("Pet")),
        ] {
            ingested.events.insert(
                name.into(),
                Entity::draft(Event {
                    name: name.into(),
                    description: String::new(),
                    topic_name: topic.into(),
                    schema_id: None,
                    application_domain_id: None,
                    schema_name: schema.map(str::to_string),
                }),
            );
        }
        ImportGraph::new("Shop", "ShopApp", ingested)
    }

    #[tokio::test]
    async fn creates_in_dependency_order() {
        let store = MockCatalog::new();
        let mut graph = graph();

        let summary = commit(&mut graph, Role::Subscriber, &store).await.unwrap();

        let created: Vec<_> = store
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::Create { collection, name } => Some((collection, name)),
                _ => None,
            })
            .collect();
        assert_eq!(
            created,
            vec![
                (Collection::ApplicationDomains, "Shop".to_string()),
                (Collection::Applications, "ShopApp".to_string()),
                (Collection::Schemas, "Pet".to_string()),
                (Collection::Events, "listPets".to_string()),
                (Collection::Events, "addPet".to_string()),
            ]
        );
        assert_eq!(summary.created(), 5);
        assert_eq!(summary.reused(), 0);
        assert_eq!(summary.linked_events, 2);
        assert_eq!(graph.pending(), 0);
    }

    #[tokio::test]
    async fn injects_domain_and_schema_ids() {
        let store = MockCatalog::new();
        let mut graph = graph();
        commit(&mut graph, Role::Subscriber, &store).await.unwrap();

        let domain_id = graph.domain.id().unwrap().clone();
        let schema_id = graph.schemas["Pet"].id().unwrap().clone();
        let event = store
            .object(Collection::Events, graph.events["addPet"].id().unwrap().as_str())
            .unwrap();
        assert_eq!(event["applicationDomainId"], json!(domain_id.as_str()));
        assert_eq!(event["schemaId"], json!(schema_id.as_str()));

        let without_schema = store
            .object(Collection::Events, graph.events["listPets"].id().unwrap().as_str())
            .unwrap();
        assert!(without_schema.get("schemaId").is_none());
    }

    #[tokio::test]
    async fn publisher_links_produced_events() {
        let store = MockCatalog::new();
        let mut graph = graph();
        commit(&mut graph, Role::Publisher, &store).await.unwrap();

        let app_id = graph.application.id().unwrap().clone();
        let app = store.object(Collection::Applications, app_id.as_str()).unwrap();
        assert_eq!(app["producedEventIds"].as_array().unwrap().len(), 2);
        assert!(app.get("consumedEventIds").is_none());
        assert_eq!(graph.application.payload.produced_event_ids.len(), 2);
    }

    #[tokio::test]
    async fn existing_entities_are_not_resubmitted() {
        let store = MockCatalog::new();
        let mut graph = graph();
        graph.domain.status = Status::Existing(Identifier::new("d1").unwrap());
        graph.schemas["Pet"].status = Status::Existing(Identifier::new("s1").unwrap());

        let summary = commit(&mut graph, Role::Subscriber, &store).await.unwrap();

        assert_eq!(summary.domains, Tally { created: 0, reused: 1 });
        assert_eq!(summary.schemas, Tally { created: 0, reused: 1 });
        assert_eq!(store.create_count(), 3);
        let event = store
            .object(Collection::Events, graph.events["addPet"].id().unwrap().as_str())
            .unwrap();
        assert_eq!(event["schemaId"], "s1");
        assert_eq!(event["applicationDomainId"], "d1");
    }

    #[tokio::test]
    async fn failure_stops_remaining_calls() {
        let store = MockCatalog::new().fail_on(FailOn::CreateIn(
            Collection::Schemas,
            CatalogError::Network("connection reset".into()),
        ));
        let mut graph = graph();

        let err = commit(&mut graph, Role::Subscriber, &store).await.unwrap_err();

        assert!(matches!(err, EngineError::Catalog(CatalogError::Network(_))));
        assert!(store.objects(Collection::Events).is_empty());
        assert!(!store
            .operations()
            .iter()
            .any(|op| matches!(op, MockOperation::UpdateApplication { .. })));
        assert!(graph.events.values().all(|e| e.is_draft()));
    }

    #[test]
    fn summary_message() {
        let summary = CommitSummary {
            domains: Tally { created: 1, reused: 0 },
            events: Tally { created: 2, reused: 1 },
            linked_events: 3,
            ..CommitSummary::new(Role::Publisher)
        };
        assert_eq!(
            summary.to_string(),
            "created 3 and reused 1 catalog objects; 3 events published"
        );
    }
}
