//! Loader/action bindings: serializer + resource client behind the page router contract.
//!
//! Loaders are read-only and, under `LoaderPolicy::NullOnFailure`, resolve to `None` on any
//! failure so a page renders its empty state. Actions always propagate failures.

use crate::config::{BindingOptions, LoaderPolicy, ResolvedEntity, Schema};
use crate::error::{AppError, ConfigError};
use crate::form::FormPairs;
use crate::service::{parse_form_data, ClientConfig, Removed, ResourceClient};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Query string of the page request a loader runs for.
#[derive(Clone, Debug, Default)]
pub struct LoaderRequest {
    query: HashMap<String, String>,
}

impl LoaderRequest {
    /// First occurrence of each query parameter wins.
    pub fn from_url(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    /// Decoded query pairs in request order. First occurrence of each key wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = HashMap::new();
        for (k, v) in pairs {
            query.entry(k).or_insert(v);
        }
        LoaderRequest { query }
    }

    pub fn title(&self) -> Option<&str> {
        self.query.get("title").map(String::as_str)
    }
}

/// Submitted form body of an action request.
#[derive(Clone, Debug, Default)]
pub struct ActionRequest {
    pub form: FormPairs,
}

impl ActionRequest {
    pub fn new(form: FormPairs) -> Self {
        ActionRequest { form }
    }
}

/// Path parameters matched by the page router.
#[derive(Clone, Debug, Default)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        RouteParams::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RouteParams(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Clone, Debug)]
pub struct BindingConfig {
    /// Path parameter carrying the entity id.
    pub id_key: String,
    pub options: BindingOptions,
}

/// Immutable configuration, schema and client for one entity. Cheap to clone.
pub struct EntityBinding<T = Value> {
    config: Arc<BindingConfig>,
    schema: Arc<Schema>,
    client: ResourceClient<T>,
}

impl<T> Clone for EntityBinding<T> {
    fn clone(&self) -> Self {
        EntityBinding {
            config: self.config.clone(),
            schema: self.schema.clone(),
            client: self.client.clone(),
        }
    }
}

impl<T> std::fmt::Debug for EntityBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityBinding")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish()
    }
}

impl<T: DeserializeOwned> EntityBinding<T> {
    pub fn new(
        http: reqwest::Client,
        url: Url,
        schema: Arc<Schema>,
        id_key: impl Into<String>,
        options: BindingOptions,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(http, ClientConfig::new(url, options.response)?);
        Ok(EntityBinding {
            config: Arc::new(BindingConfig {
                id_key: id_key.into(),
                options,
            }),
            schema,
            client,
        })
    }

    /// Tolerant serializer with a permissive client.
    pub fn tolerant(
        http: reqwest::Client,
        url: Url,
        schema: Arc<Schema>,
        id_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(http, url, schema, id_key, BindingOptions::tolerant())
    }

    /// Strict serializer with a strict client.
    pub fn strict(
        http: reqwest::Client,
        url: Url,
        schema: Arc<Schema>,
        id_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(http, url, schema, id_key, BindingOptions::strict())
    }

    pub fn from_entity(http: reqwest::Client, entity: &ResolvedEntity) -> Result<Self, ConfigError> {
        Self::new(
            http,
            entity.url.clone(),
            entity.schema.clone(),
            entity.id_key.clone(),
            entity.options,
        )
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn client(&self) -> &ResourceClient<T> {
        &self.client
    }

    pub fn id_key(&self) -> &str {
        &self.config.id_key
    }

    pub fn options(&self) -> BindingOptions {
        self.config.options
    }

    pub async fn loader_all(&self, request: &LoaderRequest) -> Result<Option<Vec<T>>, AppError> {
        let outcome = self.client.list(request.title()).await;
        self.settle_read(outcome, "loader_all")
    }

    pub async fn loader_by_id(&self, params: &RouteParams) -> Result<Option<T>, AppError> {
        let outcome = match self.id_param(params) {
            Ok(id) => self.client.get_by_id(id).await,
            Err(e) => Err(e),
        };
        self.settle_read(outcome, "loader_by_id")
    }

    pub async fn action_create(&self, request: ActionRequest) -> Result<T, AppError> {
        let submission = parse_form_data(&self.schema, request.form, self.config.options.form)?;
        self.client.create(&submission).await
    }

    pub async fn action_update(&self, request: ActionRequest, params: &RouteParams) -> Result<T, AppError> {
        let id = self.id_param(params)?;
        let submission = parse_form_data(&self.schema, request.form, self.config.options.form)?;
        self.client.update(&submission, id).await
    }

    pub async fn action_delete(&self, params: &RouteParams) -> Result<Removed<T>, AppError> {
        let id = self.id_param(params)?;
        self.client.remove(id).await
    }

    fn id_param<'a>(&self, params: &'a RouteParams) -> Result<&'a str, AppError> {
        params
            .get(&self.config.id_key)
            .ok_or_else(|| AppError::MissingParam(self.config.id_key.clone()))
    }

    fn settle_read<V>(&self, outcome: Result<V, AppError>, op: &'static str) -> Result<Option<V>, AppError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(err) => match self.config.options.loader {
                LoaderPolicy::NullOnFailure => {
                    tracing::warn!(
                        op,
                        url = %self.client.config().base_url,
                        error = %err,
                        "read failed; loader resolves to null"
                    );
                    Ok(None)
                }
                LoaderPolicy::Propagate => Err(err),
            },
        }
    }
}
