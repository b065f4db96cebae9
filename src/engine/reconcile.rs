//! engine::reconcile
//!
//! Matching an import graph against what already exists in the catalog.
//!
//! # Ownership
//!
//! Everything one import creates lives in a single application domain. An
//! application, schema or event of the same name that belongs to another
//! domain cannot be reused and would collide on creation, so it is a
//! conflict. All conflicts are collected first and reported together; no
//! creation call is made when any exist.

use std::fmt;

use tracing::{error, info, warn};

use super::EngineError;
use crate::catalog::{decode, CatalogStore};
use crate::core::model::{CatalogObject, ImportGraph, Status};
use crate::core::types::{Collection, Identifier};

/// An object whose name is taken by another application domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Collection the object lives in.
    pub collection: Collection,
    /// Name shared by the draft and the existing object.
    pub name: String,
    /// Domain of the existing object, if the catalog reported one.
    pub existing_domain_id: Option<Identifier>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' already exists with another application domain",
            self.collection.label(),
            self.name
        )?;
        if let Some(id) = &self.existing_domain_id {
            write!(f, " [id: {}]", id)?;
        }
        Ok(())
    }
}

/// Look up every entity of `graph` by name and mark the ones that exist.
///
/// Collections are visited in dependency order: domain, application,
/// schemas, events. Entities that are not found stay drafts.
///
/// # Errors
///
/// - `OwnershipConflict` listing every conflicting object
/// - `Catalog` if a lookup fails
pub async fn reconcile(graph: &mut ImportGraph, store: &dyn CatalogStore) -> Result<(), EngineError> {
    info!("checking existing catalog objects");

    let domain_name = graph.domain.payload.name.clone();
    let domain_id = match lookup(store, Collection::ApplicationDomains, &domain_name).await? {
        Some(existing) => {
            warn!("{} '{}' already exists", Collection::ApplicationDomains.label(), domain_name);
            graph.domain.status = Status::Existing(existing.id.clone());
            Some(existing.id)
        }
        None => None,
    };

    let mut conflicts = Vec::new();
    let mut checker = Checker {
        store,
        domain_id: domain_id.as_ref(),
        conflicts: &mut conflicts,
    };

    let application_name = graph.application.payload.name.clone();
    checker
        .check(Collection::Applications, &application_name, &mut graph.application.status)
        .await?;
    for (name, schema) in graph.schemas.iter_mut() {
        checker
            .check(Collection::Schemas, name, &mut schema.status)
            .await?;
    }
    for (name, event) in graph.events.iter_mut() {
        checker
            .check(Collection::Events, name, &mut event.status)
            .await?;
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(EngineError::OwnershipConflict(conflicts))
    }
}

struct Checker<'a> {
    store: &'a dyn CatalogStore,
    domain_id: Option<&'a Identifier>,
    conflicts: &'a mut Vec<Conflict>,
}

impl Checker<'_> {
    async fn check(
        &mut self,
        collection: Collection,
        name: &str,
        status: &mut Status,
    ) -> Result<(), EngineError> {
        let Some(existing) = lookup(self.store, collection, name).await? else {
            return Ok(());
        };

        if existing.application_domain_id.as_ref() != self.domain_id {
            let conflict = Conflict {
                collection,
                name: name.to_string(),
                existing_domain_id: existing.application_domain_id,
            };
            error!("{}", conflict);
            self.conflicts.push(conflict);
            return Ok(());
        }

        warn!("{} '{}' already exists", collection.label(), name);
        *status = Status::Existing(existing.id);
        Ok(())
    }
}

async fn lookup(
    store: &dyn CatalogStore,
    collection: Collection,
    name: &str,
) -> Result<Option<CatalogObject>, EngineError> {
    let found = store.find_by_name(collection, name).await?;
    Ok(found.map(decode::<CatalogObject>).transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::MockCatalog;
    use crate::core::model::{Entity, Event, Ingested};
    use serde_json::json;

    fn graph_with_event(name: &str) -> ImportGraph {
        let mut ingested = Ingested::default();
        ingested.events.insert(
            name.to_string(),
            Entity::draft(Event {
                name: name.to_string(),
                description: String::new(),
                topic_name: format!("GET/{}", name),
                schema_id: None,
                application_domain_id: None,
                schema_name: None,
            }),
        );
        ImportGraph::new("Shop", "ShopApp", ingested)
    }

    fn id(value: &str) -> Identifier {
        Identifier::new(value).unwrap()
    }

    #[tokio::test]
    async fn nothing_found_leaves_drafts() {
        let store = MockCatalog::new();
        let mut graph = graph_with_event("listPets");
        reconcile(&mut graph, &store).await.unwrap();
        assert_eq!(graph.pending(), 3);
    }

    #[tokio::test]
    async fn same_domain_objects_are_reused() {
        let store = MockCatalog::new()
            .with_object(Collection::ApplicationDomains, json!({ "id": "d1", "name": "Shop" }))
            .with_object(
                Collection::Events,
                json!({ "id": "e1", "name": "listPets", "applicationDomainId": "d1" }),
            );
        let mut graph = graph_with_event("listPets");
        reconcile(&mut graph, &store).await.unwrap();

        assert_eq!(graph.domain.status, Status::Existing(id("d1")));
        assert_eq!(graph.events["listPets"].status, Status::Existing(id("e1")));
        assert!(graph.application.is_draft());
    }

    #[tokio::test]
    async fn foreign_domain_objects_conflict() {
        let store = MockCatalog::new()
            .with_object(Collection::ApplicationDomains, json!({ "id": "d1", "name": "Shop" }))
            .with_object(
                Collection::Applications,
                json!({ "id": "a9", "name": "ShopApp", "applicationDomainId": "d9" }),
            )
            .with_object(
                Collection::Events,
                json!({ "id": "e9", "name": "listPets", "applicationDomainId": "d9" }),
            );
        let mut graph = graph_with_event("listPets");

        let err = reconcile(&mut graph, &store).await.unwrap_err();
        let EngineError::OwnershipConflict(conflicts) = err else {
            panic!("expected ownership conflict, got {err:?}");
        };
        assert_eq!(
            conflicts,
            vec![
                Conflict {
                    collection: Collection::Applications,
                    name: "ShopApp".into(),
                    existing_domain_id: Some(id("d9")),
                },
                Conflict {
                    collection: Collection::Events,
                    name: "listPets".into(),
                    existing_domain_id: Some(id("d9")),
                },
            ]
        );
        assert_eq!(store.create_count(), 0);
    }

    #[tokio::test]
    async fn new_domain_conflicts_with_any_owned_object() {
        let store = MockCatalog::new().with_object(
            Collection::Events,
            json!({ "id": "e1", "name": "listPets", "applicationDomainId": "d1" }),
        );
        let mut graph = graph_with_event("listPets");
        let err = reconcile(&mut graph, &store).await.unwrap_err();
        assert!(matches!(err, EngineError::OwnershipConflict(ref c) if c.len() == 1));
    }

    #[test]
    fn conflict_message() {
        let conflict = Conflict {
            collection: Collection::Schemas,
            name: "Pet".into(),
            existing_domain_id: Some(id("d2")),
        };
        assert_eq!(
            conflict.to_string(),
            "Schema 'Pet' already exists with another application domain [id: d2]"
        );
    }
}
