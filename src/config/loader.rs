//! Load entity definitions from JSON and resolve them into the runtime model.

use crate::config::resolved::{resource_url, ResolvedEntity, ResolvedModel, Schema};
use crate::config::{validate, EntityConfig};
use crate::error::ConfigError;
use reqwest::Url;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Build resolved model from entity configs. Validates first.
pub fn resolve(configs: &[EntityConfig], api_base: &Url) -> Result<ResolvedModel, ConfigError> {
    validate(configs)?;

    let mut entities = Vec::with_capacity(configs.len());
    let mut entity_by_path = HashMap::new();

    for config in configs {
        let schema = Schema::build(&config.path_segment, &config.fields.0)?;
        let entity = ResolvedEntity {
            path_segment: config.path_segment.clone(),
            url: resource_url(api_base, config.resource())?,
            schema: Arc::new(schema),
            id_key: config.id_key(),
            options: config.options(),
        };
        entity_by_path.insert(entity.path_segment.clone(), entity.clone());
        entities.push(entity);
    }

    Ok(ResolvedModel {
        entities,
        entity_by_path,
    })
}

/// Parse one config document: a single entity object or an array of them.
///
/// Parsed straight from the source so field order and repeated keys reach `FieldList` as written.
pub fn parse_entities(source: &str) -> Result<Vec<EntityConfig>, ConfigError> {
    let entities = if source.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<EntityConfig>>(source)
    } else {
        serde_json::from_str::<EntityConfig>(source).map(|entity| vec![entity])
    };
    entities.map_err(|e| ConfigError::Load(e.to_string()))
}

/// Load every `*.json` file in `dir`, in file name order.
pub async fn load_from_dir(dir: impl AsRef<Path>) -> Result<Vec<EntityConfig>, ConfigError> {
    let dir = dir.as_ref();
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", dir.display(), e)))?;

    let mut paths = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", dir.display(), e)))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut configs = Vec::new();
    for path in paths {
        tracing::debug!(path = %path.display(), "loading entity config");
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        let parsed = parse_entities(&source)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        configs.extend(parsed);
    }
    Ok(configs)
}
