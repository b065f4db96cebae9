//! catalog::mock
//!
//! Mock catalog implementation for deterministic testing.
//!
//! # Design
//!
//! The mock catalog keeps objects in memory per collection, assigns
//! sequential ids (`mock-1`, `mock-2`, ...), records every call, and can be
//! configured to fail a chosen operation.
//!
//! # Example
//!
//! ```
//! use sep_tools::catalog::mock::MockCatalog;
//! use sep_tools::catalog::CatalogStore;
//! use sep_tools::core::types::Collection;
//!
//! # tokio_test::block_on(async {
//! let catalog = MockCatalog::new();
//!
//! let id = catalog
//!     .create(Collection::Schemas, &serde_json::json!({"name": "Pet"}))
//!     .await
//!     .unwrap();
//! assert_eq!(id.as_str(), "mock-1");
//!
//! let found = catalog.find_by_name(Collection::Schemas, "Pet").await.unwrap();
//! assert!(found.is_some());
//! # });
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{CatalogError, CatalogStore, ListQuery, Page};
use crate::core::model::Role;
use crate::core::types::{Collection, Identifier};

/// Mock catalog for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    inner: Arc<Mutex<MockCatalogInner>>,
}

#[derive(Debug)]
struct MockCatalogInner {
    /// Stored objects per collection, in insertion order.
    objects: HashMap<Collection, Vec<Value>>,
    /// Next numeric id to assign.
    next_id: u64,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail every find_by_name with the given error.
    FindByName(CatalogError),
    /// Fail every create with the given error.
    Create(CatalogError),
    /// Fail create only for one collection.
    CreateIn(Collection, CatalogError),
    /// Fail list_page with the given error.
    ListPage(CatalogError),
    /// Fail update_application_events with the given error.
    UpdateApplication(CatalogError),
    /// Fail generate_asyncapi with the given error.
    GenerateAsyncApi(CatalogError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    FindByName {
        collection: Collection,
        name: String,
    },
    Create {
        collection: Collection,
        name: String,
    },
    ListPage {
        collection: Collection,
        page_number: u32,
    },
    UpdateApplication {
        application_id: Identifier,
        role: Role,
        event_ids: Vec<Identifier>,
    },
    GenerateAsyncApi {
        application_id: Identifier,
        version: String,
    },
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockCatalogInner {
                objects: HashMap::new(),
                next_id: 1,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Add a pre-existing object. The object must carry its own `id`.
    ///
    /// # Example
    ///
    /// ```
    /// use sep_tools::catalog::mock::MockCatalog;
    /// use sep_tools::core::types::Collection;
    ///
    /// let catalog = MockCatalog::new().with_object(
    ///     Collection::ApplicationDomains,
    ///     serde_json::json!({"id": "dom-1", "name": "Petstore"}),
    /// );
    /// assert_eq!(catalog.objects(Collection::ApplicationDomains).len(), 1);
    /// ```
    pub fn with_object(self, collection: Collection, object: Value) -> Self {
        self.insert(collection, object);
        self
    }

    /// Insert a pre-existing object.
    pub fn insert(&self, collection: Collection, object: Value) {
        self.lock()
            .objects
            .entry(collection)
            .or_default()
            .push(object);
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use sep_tools::catalog::mock::{FailOn, MockCatalog};
    /// use sep_tools::catalog::CatalogError;
    ///
    /// let catalog = MockCatalog::new()
    ///     .fail_on(FailOn::Create(CatalogError::Network("down".into())));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Number of create calls recorded so far.
    pub fn create_count(&self) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| matches!(op, MockOperation::Create { .. }))
            .count()
    }

    /// All objects stored in a collection.
    pub fn objects(&self, collection: Collection) -> Vec<Value> {
        self.lock()
            .objects
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Find a stored object by id (for test verification).
    pub fn object(&self, collection: Collection, id: &str) -> Option<Value> {
        self.objects(collection)
            .into_iter()
            .find(|o| o.get("id").and_then(Value::as_str) == Some(id))
    }

    fn lock(&self) -> MutexGuard<'_, MockCatalogInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: MockOperation) {
        self.lock().operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str, collection: Option<Collection>) -> Option<CatalogError> {
        let inner = self.lock();
        match &inner.fail_on {
            Some(FailOn::FindByName(e)) if expected == "find_by_name" => Some(e.clone()),
            Some(FailOn::Create(e)) if expected == "create" => Some(e.clone()),
            Some(FailOn::CreateIn(c, e)) if expected == "create" && Some(*c) == collection => {
                Some(e.clone())
            }
            Some(FailOn::ListPage(e)) if expected == "list_page" => Some(e.clone()),
            Some(FailOn::UpdateApplication(e)) if expected == "update_application_events" => {
                Some(e.clone())
            }
            Some(FailOn::GenerateAsyncApi(e)) if expected == "generate_asyncapi" => {
                Some(e.clone())
            }
            _ => None,
        }
    }

    fn not_found(method: &str, url: String) -> CatalogError {
        CatalogError::UnexpectedStatus {
            method: method.to_string(),
            url,
            expected: 200,
            status: 404,
            body: "not found".to_string(),
        }
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a stored object matches every filter of a listing query.
fn matches_query(object: &Value, query: &ListQuery) -> bool {
    query.filters.iter().all(|(key, value)| {
        if key == "ids" {
            let id = object.get("id").and_then(Value::as_str).unwrap_or_default();
            value.split(',').any(|wanted| wanted == id)
        } else {
            object.get(key).and_then(Value::as_str) == Some(value.as_str())
        }
    })
}

#[async_trait]
impl CatalogStore for MockCatalog {
    async fn find_by_name(
        &self,
        collection: Collection,
        name: &str,
    ) -> Result<Option<Value>, CatalogError> {
        self.record(MockOperation::FindByName {
            collection,
            name: name.to_string(),
        });

        if let Some(err) = self.check_fail("find_by_name", Some(collection)) {
            return Err(err);
        }

        Ok(self
            .objects(collection)
            .into_iter()
            .find(|o| o.get("name").and_then(Value::as_str) == Some(name)))
    }

    async fn create(
        &self,
        collection: Collection,
        body: &Value,
    ) -> Result<Identifier, CatalogError> {
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.record(MockOperation::Create {
            collection,
            name: name.clone(),
        });

        if let Some(err) = self.check_fail("create", Some(collection)) {
            return Err(err);
        }

        let mut inner = self.lock();
        let id = format!("mock-{}", inner.next_id);
        inner.next_id += 1;

        let mut stored = body.clone();
        if let Value::Object(map) = &mut stored {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        inner.objects.entry(collection).or_default().push(stored);

        Identifier::new(id).map_err(|_| CatalogError::MissingId { collection, name })
    }

    async fn list_page(
        &self,
        collection: Collection,
        query: &ListQuery,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page, CatalogError> {
        self.record(MockOperation::ListPage {
            collection,
            page_number,
        });

        if let Some(err) = self.check_fail("list_page", Some(collection)) {
            return Err(err);
        }

        let matching: Vec<Value> = self
            .objects(collection)
            .into_iter()
            .filter(|o| matches_query(o, query))
            .collect();

        let size = page_size.max(1) as usize;
        let start = (page_number.saturating_sub(1) as usize) * size;
        let data: Vec<Value> = matching.iter().skip(start).take(size).cloned().collect();
        let next_page = (start + size < matching.len()).then_some(page_number + 1);

        Ok(Page { data, next_page })
    }

    async fn update_application_events(
        &self,
        application_id: &Identifier,
        role: Role,
        event_ids: &[Identifier],
    ) -> Result<(), CatalogError> {
        self.record(MockOperation::UpdateApplication {
            application_id: application_id.clone(),
            role,
            event_ids: event_ids.to_vec(),
        });

        if let Some(err) = self.check_fail("update_application_events", None) {
            return Err(err);
        }

        let mut inner = self.lock();
        let application = inner
            .objects
            .get_mut(&Collection::Applications)
            .and_then(|apps| {
                apps.iter_mut().find(|a| {
                    a.get("id").and_then(Value::as_str) == Some(application_id.as_str())
                })
            })
            .ok_or_else(|| Self::not_found("PATCH", format!("applications/{}", application_id)))?;

        if let Value::Object(map) = application {
            let ids = event_ids
                .iter()
                .map(|id| Value::String(id.to_string()))
                .collect();
            map.insert(role.event_ids_field().to_string(), Value::Array(ids));
        }
        Ok(())
    }

    async fn generate_asyncapi(
        &self,
        application_id: &Identifier,
        asyncapi_version: &str,
    ) -> Result<Value, CatalogError> {
        self.record(MockOperation::GenerateAsyncApi {
            application_id: application_id.clone(),
            version: asyncapi_version.to_string(),
        });

        if let Some(err) = self.check_fail("generate_asyncapi", None) {
            return Err(err);
        }

        let application = self
            .object(Collection::Applications, application_id.as_str())
            .ok_or_else(|| {
                Self::not_found(
                    "POST",
                    format!("applications/{}/generateAsyncApiRequest", application_id),
                )
            })?;

        Ok(serde_json::json!({
            "asyncapi": asyncapi_version,
            "info": {
                "title": application.get("name").cloned().unwrap_or(Value::Null),
                "version": "1",
            },
            "channels": {},
        }))
    }
}
