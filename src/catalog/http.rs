//! catalog::http
//!
//! Event catalog implementation over its REST API.
//!
//! # Design
//!
//! Every call targets `<base>/api/v1/eventPortal/<collection>` with a bearer
//! token and a JSON body. Each call has exactly one acceptable status
//! (200, or 201 for creation); anything else becomes
//! [`CatalogError::UnexpectedStatus`] carrying the response body. There is
//! no retry.
//!
//! # Example
//!
//! ```ignore
//! use sep_tools::catalog::http::HttpCatalog;
//! use sep_tools::catalog::CatalogStore;
//! use sep_tools::core::types::Collection;
//!
//! let catalog = HttpCatalog::new(token, "https://solace.cloud");
//! let existing = catalog.find_by_name(Collection::Applications, "TestApp").await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::traits::{CatalogError, CatalogStore, ListQuery, Page};
use crate::core::model::Role;
use crate::core::types::{Collection, Identifier};

/// Path of the catalog API below the base URL.
pub const API_PREFIX: &str = "/api/v1/eventPortal";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "sep-tools";

/// Event catalog client.
pub struct HttpCatalog {
    /// HTTP client for making requests
    client: Client,
    /// API token sent as bearer credentials
    token: String,
    /// Base URL without trailing slash (e.g. `https://solace.cloud`)
    base_url: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for HttpCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalog")
            .field("has_token", &!self.token.is_empty())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpCatalog {
    /// Create a catalog client for the given base URL.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build URL for a collection endpoint.
    fn collection_url(&self, collection: Collection) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, collection.path())
    }

    /// Build URL for a single application.
    fn application_url(&self, id: &Identifier) -> String {
        format!(
            "{}/{}",
            self.collection_url(Collection::Applications),
            id.as_str()
        )
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    /// Send a request and insist on one status code.
    ///
    /// Returns the response body as JSON (`Value::Null` for an empty body).
    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
        expected: StatusCode,
    ) -> Result<Value, CatalogError> {
        debug!(method, url, "catalog request");

        let response = request
            .headers(Self::headers())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if status != expected {
            return Err(CatalogError::UnexpectedStatus {
                method: method.to_string(),
                url: url.to_string(),
                expected: expected.as_u16(),
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogStore for HttpCatalog {
    async fn find_by_name(
        &self,
        collection: Collection,
        name: &str,
    ) -> Result<Option<Value>, CatalogError> {
        let url = self.collection_url(collection);
        let request = self.client.get(&url).query(&[("name", name)]);
        let body = self.send(request, "GET", &url, StatusCode::OK).await?;

        let envelope: ListEnvelope =
            serde_json::from_value(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(envelope.data.into_iter().next())
    }

    async fn create(
        &self,
        collection: Collection,
        body: &Value,
    ) -> Result<Identifier, CatalogError> {
        let url = self.collection_url(collection);
        let request = self.client.post(&url).json(body);
        let response = self.send(request, "POST", &url, StatusCode::CREATED).await?;

        response
            .pointer("/data/id")
            .and_then(Value::as_str)
            .and_then(|id| Identifier::new(id).ok())
            .ok_or_else(|| CatalogError::MissingId {
                collection,
                name: body
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
    }

    async fn list_page(
        &self,
        collection: Collection,
        query: &ListQuery,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page, CatalogError> {
        let url = self.collection_url(collection);
        let request = self
            .client
            .get(&url)
            .query(&query.filters)
            .query(&[("pageSize", page_size), ("pageNumber", page_number)]);
        let body = self.send(request, "GET", &url, StatusCode::OK).await?;

        let envelope: ListEnvelope =
            serde_json::from_value(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        let next_page = envelope
            .meta
            .and_then(|m| m.pagination)
            .and_then(|p| p.next_page);

        Ok(Page {
            data: envelope.data,
            next_page,
        })
    }

    async fn update_application_events(
        &self,
        application_id: &Identifier,
        role: Role,
        event_ids: &[Identifier],
    ) -> Result<(), CatalogError> {
        let url = self.application_url(application_id);
        let mut body = serde_json::Map::new();
        body.insert(
            role.event_ids_field().to_string(),
            serde_json::to_value(event_ids).map_err(|e| CatalogError::Decode(e.to_string()))?,
        );

        let request = self.client.patch(&url).json(&body);
        self.send(request, "PATCH", &url, StatusCode::OK).await?;
        Ok(())
    }

    async fn generate_asyncapi(
        &self,
        application_id: &Identifier,
        asyncapi_version: &str,
    ) -> Result<Value, CatalogError> {
        let url = format!(
            "{}/generateAsyncApiRequest",
            self.application_url(application_id)
        );
        let body = serde_json::json!({ "asyncApiVersion": asyncapi_version });

        let request = self.client.post(&url).json(&body);
        self.send(request, "POST", &url, StatusCode::OK).await
    }
}

// --------------------------------------------------------------------------
// Response envelopes
// --------------------------------------------------------------------------

/// `{ "data": [...], "meta": { "pagination": { "nextPage": n } } }`
#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    meta: Option<ListMeta>,
}

#[derive(Deserialize)]
struct ListMeta {
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    #[serde(default)]
    next_page: Option<u32>,
}
