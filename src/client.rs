//! The entity graph boundary.
//!
//! [`EntityGraphClient`] is the only I/O the core depends on. Two
//! implementations ship with the crate: [`Workspace`](crate::workspace::Workspace)
//! answers in-process, and [`HttpEntityClient`] talks to a running
//! `dscales serve` over HTTP, at the base URL from
//! [`Config::api_url`](crate::config::Config::api_url).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::GraphError;
use crate::models::*;

/// Default URL for a local server.
pub const DEFAULT_URL: &str = "http://127.0.0.1:17020/api/v1";

/// Fetches entities and name projections by id.
///
/// Implementations must not serve stale cached data silently: every call
/// reflects the source of truth at the time it is made.
#[async_trait]
pub trait EntityGraphClient: Send + Sync {
    /// Resolve only an entity's display name.
    async fn resolve_entity_name(&self, id: &EntityId) -> Result<EntityName, GraphError>;

    /// Resolve the full entity record, including comments and (for Steps)
    /// content blocks.
    async fn resolve_entity(&self, id: &EntityId) -> Result<Entity, GraphError>;

    /// Append a new version to a content block.
    async fn append_content_version(
        &self,
        block_id: &ContentBlockId,
        text: &str,
    ) -> Result<VersionAppended, GraphError>;
}

#[async_trait]
impl<C: EntityGraphClient + ?Sized> EntityGraphClient for Arc<C> {
    async fn resolve_entity_name(&self, id: &EntityId) -> Result<EntityName, GraphError> {
        (**self).resolve_entity_name(id).await
    }

    async fn resolve_entity(&self, id: &EntityId) -> Result<Entity, GraphError> {
        (**self).resolve_entity(id).await
    }

    async fn append_content_version(
        &self,
        block_id: &ContentBlockId,
        text: &str,
    ) -> Result<VersionAppended, GraphError> {
        (**self).append_content_version(block_id, text).await
    }
}

/// HTTP client for the dragon-scales API.
#[derive(Debug, Clone)]
pub struct HttpEntityClient {
    base_url: String,
    client: Client,
}

impl HttpEntityClient {
    /// Create with an explicit base URL (including the `/api/v1` prefix).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request that bypasses any intermediary cache.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
    }

    /// Handle response, converting HTTP errors to [`GraphError`].
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GraphError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(GraphError::NotFound(body)),
                StatusCode::CONFLICT => Err(GraphError::Conflict(body)),
                _ => Err(GraphError::Resolution(format!("{}: {}", status, body))),
            }
        }
    }

    /// Fetch every version of a content block, oldest first.
    pub async fn get_history(&self, block_id: &ContentBlockId) -> Result<Vec<String>, GraphError> {
        let response = self
            .request(Method::GET, &format!("/content-blocks/{}/versions", block_id))
            .send()
            .await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl EntityGraphClient for HttpEntityClient {
    async fn resolve_entity_name(&self, id: &EntityId) -> Result<EntityName, GraphError> {
        let response = self
            .request(Method::GET, &format!("/entities/{}", id))
            .query(&[("name_only", "true")])
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn resolve_entity(&self, id: &EntityId) -> Result<Entity, GraphError> {
        let response = self
            .request(Method::GET, &format!("/entities/{}", id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn append_content_version(
        &self,
        block_id: &ContentBlockId,
        text: &str,
    ) -> Result<VersionAppended, GraphError> {
        let response = self
            .request(
                Method::POST,
                &format!("/content-blocks/{}/versions", block_id),
            )
            .json(&AppendVersionInput {
                content: text.to_string(),
            })
            .send()
            .await?;
        self.handle_response(response).await
    }
}
