//! Typed HTTP client for the property catalog API.
//!
//! The client keeps list responses and individual records in in-process
//! caches keyed by the exact query they answer. Every successful create
//! clears the cached lists; successful updates and deletes additionally
//! drop the record's detail and slug entries. A failed mutation leaves
//! every cache untouched.

use crate::entities::property::{Location, PropertyStatus, PropertyType};
use crate::errors::{ErrorResponse, FieldErrors};
use crate::handlers::properties::{
    CreatePropertyRequest, PropertyDeleted, PropertyListResponse, PropertyResponse,
    UpdatePropertyRequest,
};
use dashmap::DashMap;
use http::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures surfaced by [`PropertyClient`], mirroring the API's error
/// categories so callers can branch without inspecting status codes.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Filter and paging parameters for [`PropertyClient::list_properties`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub location: Option<Location>,
    pub status: Option<PropertyStatus>,
    pub property_type: Option<PropertyType>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(location) = self.location {
            pairs.push(("location", location.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(property_type) = self.property_type {
            pairs.push(("type", property_type.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    /// Canonical cache key; field order is fixed so equivalent queries
    /// always collide.
    fn cache_key(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// HTTP client for the property catalog with mutation-aware caching.
pub struct PropertyClient {
    http: reqwest::Client,
    base_url: String,
    list_cache: Arc<DashMap<String, PropertyListResponse>>,
    detail_cache: Arc<DashMap<Uuid, PropertyResponse>>,
    slug_index: Arc<DashMap<String, Uuid>>,
}

impl PropertyClient {
    /// Creates a client for an API served at `base_url` (scheme and
    /// authority only, e.g. `http://localhost:3001`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            list_cache: Arc::new(DashMap::new()),
            detail_cache: Arc::new(DashMap::new()),
            slug_index: Arc::new(DashMap::new()),
        })
    }

    /// Fetch a page of properties, serving repeats of the same query from
    /// cache until a mutation invalidates it.
    pub async fn list_properties(
        &self,
        query: &ListQuery,
    ) -> Result<PropertyListResponse, ClientError> {
        let key = query.cache_key();
        if let Some(hit) = self.list_cache.get(&key) {
            return Ok(hit.clone());
        }

        let response = self
            .http
            .get(self.endpoint("api/v1/properties"))
            .query(&query.query_pairs())
            .send()
            .await?;
        let listing: PropertyListResponse = Self::parse(response).await?;

        self.list_cache.insert(key, listing.clone());
        Ok(listing)
    }

    /// Fetch a single property by id.
    pub async fn get_property(&self, id: Uuid) -> Result<PropertyResponse, ClientError> {
        if let Some(hit) = self.detail_cache.get(&id) {
            return Ok(hit.clone());
        }

        let response = self
            .http
            .get(self.endpoint(&format!("api/v1/properties/{id}")))
            .send()
            .await?;
        let property: PropertyResponse = Self::parse(response).await?;

        self.remember(property.clone());
        Ok(property)
    }

    /// Fetch a single property by slug.
    pub async fn get_property_by_slug(&self, slug: &str) -> Result<PropertyResponse, ClientError> {
        if let Some(id) = self.slug_index.get(slug).map(|entry| *entry) {
            if let Some(hit) = self.detail_cache.get(&id) {
                return Ok(hit.clone());
            }
        }

        let response = self
            .http
            .get(self.endpoint(&format!("api/v1/properties/slug/{slug}")))
            .send()
            .await?;
        let property: PropertyResponse = Self::parse(response).await?;

        self.remember(property.clone());
        Ok(property)
    }

    /// Create a property. On success all cached lists are invalidated.
    pub async fn create_property(
        &self,
        payload: &CreatePropertyRequest,
    ) -> Result<PropertyResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("api/v1/properties"))
            .json(payload)
            .send()
            .await?;
        let created: PropertyResponse = Self::parse(response).await?;

        // A new record can land on any cached page.
        self.list_cache.clear();
        self.remember(created.clone());
        Ok(created)
    }

    /// Apply a partial update. On success cached lists are invalidated and
    /// the record's cached copies are replaced with the fresh response.
    pub async fn update_property(
        &self,
        id: Uuid,
        patch: &UpdatePropertyRequest,
    ) -> Result<PropertyResponse, ClientError> {
        let response = self
            .http
            .patch(self.endpoint(&format!("api/v1/properties/{id}")))
            .json(patch)
            .send()
            .await?;
        let updated: PropertyResponse = Self::parse(response).await?;

        self.list_cache.clear();
        self.forget(id);
        self.remember(updated.clone());
        Ok(updated)
    }

    /// Delete a property. On success cached lists are invalidated and the
    /// record's cached copies are dropped.
    pub async fn delete_property(&self, id: Uuid) -> Result<String, ClientError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("api/v1/properties/{id}")))
            .send()
            .await?;
        let confirmation: PropertyDeleted = Self::parse(response).await?;

        self.list_cache.clear();
        self.forget(id);
        Ok(confirmation.message)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn remember(&self, property: PropertyResponse) {
        self.slug_index.insert(property.slug.clone(), property.id);
        self.detail_cache.insert(property.id, property);
    }

    fn forget(&self, id: Uuid) {
        if let Some((_, stale)) = self.detail_cache.remove(&id) {
            self.slug_index.remove(&stale.slug);
        } else {
            self.slug_index.retain(|_, cached| *cached != id);
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let failure = response.json::<ErrorResponse>().await.ok();
        Err(Self::map_failure(status, failure))
    }

    fn map_failure(status: StatusCode, failure: Option<ErrorResponse>) -> ClientError {
        let message = failure
            .as_ref()
            .map(|f| f.message.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::BAD_REQUEST => match failure.and_then(|f| f.errors) {
                Some(fields) => ClientError::Validation(fields),
                None => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            },
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
