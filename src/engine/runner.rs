//! engine::runner
//!
//! End-to-end flows behind each command.
//!
//! ```text
//! import-openapi:    ingest -> reconcile -> commit
//! create-queue:      ingest -> provision
//! generate-openapi:  find domain -> list events -> filter -> list schemas -> emit
//! generate-asyncapi: find application -> generate
//! ```
//!
//! Every flow takes its collaborators as trait objects; the commands decide
//! whether they talk to the real catalog or to a mock.

use indexmap::IndexSet;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::commit::{commit, CommitSummary};
use super::emit::{emit, EventFilter};
use super::ingest::ingest;
use super::provision::provision;
use super::reconcile::reconcile;
use super::EngineError;
use crate::broker::BrokerAdmin;
use crate::catalog::{decode, list_all, CatalogStore, ListQuery};
use crate::core::model::{CatalogObject, DomainRecord, EventRecord, ImportGraph, Role, SchemaRecord};
use crate::core::types::Collection;

/// Import an OpenAPI document into the catalog.
///
/// Nothing is created unless reconciliation finds no ownership conflict.
pub async fn import_openapi(
    document: &Value,
    domain: &str,
    application: &str,
    role: Role,
    store: &dyn CatalogStore,
) -> Result<CommitSummary, EngineError> {
    let ingested = ingest(document)?;
    info!(
        schemas = ingested.schemas.len(),
        events = ingested.events.len(),
        "parsed OpenAPI document"
    );

    let mut graph = ImportGraph::new(domain, application, ingested);
    reconcile(&mut graph, store).await?;
    let summary = commit(&mut graph, role, store).await?;
    info!("{}", summary);
    Ok(summary)
}

/// Create a queue subscribed to every operation of an OpenAPI document.
pub async fn create_queue(
    document: &Value,
    queue_name: &str,
    broker: &dyn BrokerAdmin,
) -> Result<Vec<String>, EngineError> {
    let ingested = ingest(document)?;
    provision(&ingested, queue_name, broker).await
}

/// Rebuild an OpenAPI document from the events of an application domain.
///
/// The document title is the domain name and its description the domain's
/// description.
///
/// # Errors
///
/// - `NotFound` if no domain has that name
/// - `Catalog` if a lookup or listing fails
/// - `InvalidSchemaContent` if a stored JSON schema does not parse
pub async fn regenerate_openapi(
    domain_name: &str,
    filter: EventFilter,
    page_size: u32,
    store: &dyn CatalogStore,
) -> Result<Value, EngineError> {
    let domain: DomainRecord =
        find_named(store, Collection::ApplicationDomains, domain_name).await?;

    let query = ListQuery::new().filter("applicationDomainId", domain.id.as_str());
    let events: Vec<EventRecord> = list_records(store, Collection::Events, &query, page_size)
        .await?
        .into_iter()
        .filter(|event| filter.keeps(event))
        .collect();

    let schema_ids: IndexSet<&str> = events
        .iter()
        .filter_map(|event| event.schema_id.as_ref())
        .map(|id| id.as_str())
        .collect();
    let schemas: Vec<SchemaRecord> = if schema_ids.is_empty() {
        Vec::new()
    } else {
        let ids = schema_ids.into_iter().collect::<Vec<_>>().join(",");
        let query = ListQuery::new().filter("ids", ids);
        list_records(store, Collection::Schemas, &query, page_size).await?
    };

    info!(
        events = events.len(),
        schemas = schemas.len(),
        "generating OpenAPI document for domain '{}'",
        domain_name
    );
    emit(domain_name, domain.description.as_deref(), &events, &schemas)
}

/// Ask the catalog for the AsyncAPI document of a named application.
pub async fn generate_asyncapi(
    application_name: &str,
    asyncapi_version: &str,
    store: &dyn CatalogStore,
) -> Result<Value, EngineError> {
    let application: CatalogObject =
        find_named(store, Collection::Applications, application_name).await?;
    Ok(store
        .generate_asyncapi(&application.id, asyncapi_version)
        .await?)
}

async fn find_named<T: DeserializeOwned>(
    store: &dyn CatalogStore,
    collection: Collection,
    name: &str,
) -> Result<T, EngineError> {
    let object = store
        .find_by_name(collection, name)
        .await?
        .ok_or_else(|| EngineError::NotFound {
            collection,
            name: name.to_string(),
        })?;
    Ok(decode(object)?)
}

async fn list_records<T: DeserializeOwned>(
    store: &dyn CatalogStore,
    collection: Collection,
    query: &ListQuery,
    page_size: u32,
) -> Result<Vec<T>, EngineError> {
    list_all(store, collection, query, page_size)
        .await?
        .into_iter()
        .map(|object| decode(object).map_err(EngineError::from))
        .collect()
}
