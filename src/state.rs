//! Shared application state for all routes. Read-only after construction.

use crate::config::ResolvedModel;
use crate::error::ConfigError;
use crate::handlers::EntityBinding;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ResolvedModel>,
    /// One binding per entity, keyed by path segment.
    pub bindings: Arc<HashMap<String, EntityBinding>>,
}

impl AppState {
    pub fn new(model: ResolvedModel, http: reqwest::Client) -> Result<Self, ConfigError> {
        let mut bindings: HashMap<String, EntityBinding> = HashMap::with_capacity(model.entities.len());
        for entity in &model.entities {
            bindings.insert(entity.path_segment.clone(), EntityBinding::from_entity(http.clone(), entity)?);
        }
        Ok(AppState {
            model: Arc::new(model),
            bindings: Arc::new(bindings),
        })
    }

    pub fn binding(&self, path_segment: &str) -> Option<&EntityBinding> {
        self.bindings.get(path_segment)
    }
}
