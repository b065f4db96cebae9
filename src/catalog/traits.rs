//! catalog::traits
//!
//! CatalogStore trait definition for talking to the event catalog.
//!
//! # Design
//!
//! The `CatalogStore` trait is async because every operation is network I/O.
//! Callers await one call at a time; nothing in the engine issues catalog
//! requests concurrently.
//!
//! Objects cross this boundary as raw JSON. Creation bodies are the
//! serialized payloads from [`crate::core::model`]; lookups and listings are
//! decoded by the caller into the record type it needs via [`decode`].
//!
//! # Example
//!
//! ```ignore
//! use sep_tools::catalog::{CatalogStore, ListQuery, list_all};
//! use sep_tools::core::types::Collection;
//!
//! async fn events_of(store: &dyn CatalogStore, domain_id: &str) -> Result<(), CatalogError> {
//!     let query = ListQuery::new().filter("applicationDomainId", domain_id);
//!     let events = list_all(store, Collection::Events, &query, 100).await?;
//!     println!("{} events", events.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::model::Role;
use crate::core::types::{Collection, Identifier};

/// Errors from catalog operations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog answered with a status other than the one the call expects.
    #[error("{method} {url} returned {status}, expected {expected}: {body}")]
    UnexpectedStatus {
        /// HTTP method of the failed call
        method: String,
        /// Full request URL
        url: String,
        /// Status the call expects
        expected: u16,
        /// Status actually returned
        status: u16,
        /// Response body, for the operator
        body: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("failed to decode catalog response: {0}")]
    Decode(String),

    /// A creation call succeeded but the response carried no id.
    #[error("catalog returned no id for new {collection} object '{name}'")]
    MissingId {
        /// Collection the object was created in
        collection: Collection,
        /// Name of the object
        name: String,
    },
}

/// Filters for a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Query parameters, sent in order.
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter parameter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Look up a filter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Objects on this page.
    pub data: Vec<Value>,
    /// Number of the next page, `None` on the last page.
    pub next_page: Option<u32>,
}

/// The CatalogStore trait for interacting with the event catalog.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be held behind
/// `&dyn CatalogStore` across await points.
///
/// # Error Handling
///
/// Every unexpected status is fatal to the caller; implementations never
/// retry.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Find the first object in `collection` with the given name.
    ///
    /// Returns `None` if the catalog has no object of that name.
    async fn find_by_name(
        &self,
        collection: Collection,
        name: &str,
    ) -> Result<Option<Value>, CatalogError>;

    /// Create an object and return its new id.
    ///
    /// # Errors
    ///
    /// - `UnexpectedStatus` unless the catalog answers 201 Created
    /// - `MissingId` if the response has no `data.id`
    async fn create(&self, collection: Collection, body: &Value)
        -> Result<Identifier, CatalogError>;

    /// Fetch one page of a listing. Page numbers start at 1.
    async fn list_page(
        &self,
        collection: Collection,
        query: &ListQuery,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page, CatalogError>;

    /// Replace the consumed or produced event ids of an application.
    async fn update_application_events(
        &self,
        application_id: &Identifier,
        role: Role,
        event_ids: &[Identifier],
    ) -> Result<(), CatalogError>;

    /// Ask the catalog to generate an AsyncAPI document for an application.
    async fn generate_asyncapi(
        &self,
        application_id: &Identifier,
        asyncapi_version: &str,
    ) -> Result<Value, CatalogError>;
}

/// Fetch every page of a listing.
///
/// Requests page 1, then follows `next_page` until the catalog reports no
/// further pages.
///
/// # Errors
///
/// Propagates the first failing page. Returns `Decode` if the catalog hands
/// back a next page that does not move forward.
pub async fn list_all(
    store: &dyn CatalogStore,
    collection: Collection,
    query: &ListQuery,
    page_size: u32,
) -> Result<Vec<Value>, CatalogError> {
    let mut objects = Vec::new();
    let mut page_number = 1;

    loop {
        let page = store
            .list_page(collection, query, page_number, page_size)
            .await?;
        debug!(
            collection = %collection,
            page = page_number,
            count = page.data.len(),
            "fetched catalog page"
        );
        objects.extend(page.data);

        match page.next_page {
            Some(next) if next > page_number => page_number = next,
            Some(next) => {
                return Err(CatalogError::Decode(format!(
                    "pagination of {} did not advance (page {} -> {})",
                    collection, page_number, next
                )))
            }
            None => return Ok(objects),
        }
    }
}

/// Decode a raw catalog object into a record type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CatalogError> {
    serde_json::from_value(value).map_err(|e| CatalogError::Decode(e.to_string()))
}
