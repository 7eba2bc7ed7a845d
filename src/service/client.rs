//! Generic REST client for one resource: list, get, create, update, delete.

use crate::config::ResponsePolicy;
use crate::error::{AppError, ConfigError, RawResponse};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    pub policy: ResponsePolicy,
}

impl ClientConfig {
    pub fn new(base_url: Url, policy: ResponsePolicy) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Validation(format!(
                "resource URL cannot be a base: {}",
                base_url
            )));
        }
        Ok(ClientConfig { base_url, policy })
    }
}

/// Outcome of a delete: the decoded entity (permissive) or the untouched response (strict).
#[derive(Debug)]
pub enum Removed<T> {
    Entity(T),
    Raw(RawResponse),
}

/// Issues exactly one request per call against `{base}` or `{base}/{id}`. No retries.
pub struct ResourceClient<T = Value> {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        ResourceClient {
            config: self.config.clone(),
            http: self.http.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient").field("config", &self.config).finish()
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    pub fn new(http: reqwest::Client, config: ClientConfig) -> Self {
        ResourceClient {
            config: Arc::new(config),
            http,
            _entity: PhantomData,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `{base}`, with `?title=` when a non-empty filter is given.
    pub async fn list(&self, title: Option<&str>) -> Result<Vec<T>, AppError> {
        let mut request = self.http.get(self.config.base_url.clone());
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            request = request.query(&[("title", title)]);
        }
        let response = self.dispatch(request, "list").await?;
        decode(response).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<T, AppError> {
        let response = self.dispatch(self.http.get(self.item_url(id)), "get_by_id").await?;
        decode(response).await
    }

    pub async fn create<P>(&self, payload: &P) -> Result<T, AppError>
    where
        P: Serialize + ?Sized,
    {
        let request = self.http.post(self.config.base_url.clone()).json(payload);
        let response = self.dispatch(request, "create").await?;
        decode(response).await
    }

    pub async fn update<P>(&self, payload: &P, id: &str) -> Result<T, AppError>
    where
        P: Serialize + ?Sized,
    {
        let request = self.http.put(self.item_url(id)).json(payload);
        let response = self.dispatch(request, "update").await?;
        decode(response).await
    }

    pub async fn remove(&self, id: &str) -> Result<Removed<T>, AppError> {
        let response = self.dispatch(self.http.delete(self.item_url(id)), "remove").await?;
        match self.config.policy {
            ResponsePolicy::Permissive => Ok(Removed::Entity(decode(response).await?)),
            ResponsePolicy::Strict => Ok(Removed::Raw(RawResponse::new(response))),
        }
    }

    /// `{base}/{id}` with `id` encoded as a single path segment.
    pub fn item_url(&self, id: &str) -> Url {
        let mut url = self.config.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    async fn dispatch(&self, request: RequestBuilder, op: &'static str) -> Result<reqwest::Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(op, url = %response.url(), status = %status, "upstream response");
        if status.is_success() {
            return Ok(response);
        }
        tracing::error!(op, url = %response.url(), status = %status, "upstream returned non-success status");
        match self.config.policy {
            ResponsePolicy::Permissive => Ok(response),
            ResponsePolicy::Strict => Err(AppError::NonSuccess(RawResponse::new(response))),
        }
    }
}

async fn decode<D: DeserializeOwned>(response: reqwest::Response) -> Result<D, AppError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
}
