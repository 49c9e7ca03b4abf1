//! REST-backed implementation of `ResourceService`

use crate::client::envelope;
use crate::client::http::RestClient;
use crate::config::{ResourceConfig, UpdateMethod};
use crate::core::error::ClientResult;
use crate::core::{QueryParams, Resource, ResourceService};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use validator::Validate;

/// Conventional REST endpoint for one resource type:
/// `GET /{path}`, `POST /{path}`, `PATCH|PUT /{path}/{id}`, `DELETE /{path}/{id}`.
/// The id is percent-encoded as a single path segment.
///
/// Responses are unwrapped from their envelope and decoded into `T`, so a
/// malformed payload fails here with a typed error instead of reaching list
/// state.
pub struct RestResource<T: Resource> {
    client: Arc<RestClient>,
    config: ResourceConfig,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> RestResource<T> {
    /// Endpoint with conventional defaults derived from `T`
    pub fn new(client: Arc<RestClient>) -> Self {
        Self::from_config(client, ResourceConfig::named(T::resource_name_singular()))
    }

    pub fn from_config(client: Arc<RestClient>, config: ResourceConfig) -> Self {
        let path = config
            .path
            .clone()
            .unwrap_or_else(|| T::resource_name().to_string());
        Self {
            client,
            config,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn item_path(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.path.trim_end_matches('/'),
            self.client.path_segment(id)
        )
    }

    /// A write answered with an empty body still succeeded
    fn written(&self, value: Value) -> ClientResult<Option<T>> {
        if value.is_null() {
            tracing::debug!(resource = T::resource_name_singular(), "write acknowledged without a body");
            return Ok(None);
        }
        envelope::unwrap_one(value, &self.item_keys(), T::resource_name_singular()).map(Some)
    }

    fn list_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.config.envelope.iter().map(String::as_str).collect();
        keys.push(T::resource_name());
        keys
    }

    fn item_keys(&self) -> [&'static str; 1] {
        [T::resource_name_singular()]
    }
}

#[async_trait]
impl<T: Resource> ResourceService<T> for RestResource<T> {
    async fn list(&self, params: &QueryParams) -> ClientResult<Vec<T>> {
        let value = self.client.get(&self.path, params).await?;
        let items: Vec<T> = envelope::unwrap_list(value, &self.list_keys(), T::resource_name())?;
        tracing::debug!(resource = T::resource_name(), items = items.len(), "fetched collection");
        Ok(items)
    }

    async fn create(&self, draft: &T::Draft) -> ClientResult<Option<T>> {
        draft.validate()?;
        let value = self.client.post(&self.path, draft).await?;
        self.written(value)
    }

    async fn update(&self, id: &str, draft: &T::Draft) -> ClientResult<Option<T>> {
        draft.validate()?;
        let path = self.item_path(id);
        let value = match self.config.update_method {
            UpdateMethod::Patch => self.client.patch(&path, draft).await?,
            UpdateMethod::Put => self.client.put(&path, draft).await?,
        };
        self.written(value)
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&self.item_path(id)).await?;
        Ok(())
    }
}
