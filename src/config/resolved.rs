//! Resolved entity model: config validated and flattened for runtime use.

use crate::config::validator::validate_fields;
use crate::config::{BindingOptions, FieldType, SchemaElement};
use crate::error::ConfigError;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, validated mapping from field key to its metadata.
///
/// Every schema starts with the hidden `id`, `createdAt` and `updatedAt` fields. A definition
/// that redeclares one of them keeps its position, hidden flag and type; only the remaining
/// attributes (labels, placeholder) are taken from the declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    fields: Vec<(String, SchemaElement)>,
}

impl Schema {
    pub const BASE_KEYS: [&'static str; 3] = ["id", "createdAt", "updatedAt"];

    /// Schema holding only the base fields.
    pub fn base() -> Self {
        Schema {
            fields: vec![
                ("id".into(), SchemaElement::new(FieldType::Text).hidden()),
                ("createdAt".into(), SchemaElement::new(FieldType::Date).hidden()),
                ("updatedAt".into(), SchemaElement::new(FieldType::Date).hidden()),
            ],
        }
    }

    pub fn new<I, K>(fields: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, SchemaElement)>,
        K: Into<String>,
    {
        let fields: Vec<(String, SchemaElement)> =
            fields.into_iter().map(|(k, e)| (k.into(), e)).collect();
        Self::build("schema", &fields)
    }

    pub(crate) fn build(entity: &str, declared: &[(String, SchemaElement)]) -> Result<Self, ConfigError> {
        validate_fields(entity, declared)?;
        let mut schema = Self::base();
        for (key, element) in declared {
            match schema.fields.iter_mut().find(|(k, _)| k == key) {
                Some((_, base)) => {
                    *base = SchemaElement {
                        type_: base.type_,
                        hidden: true,
                        multiple: false,
                        ..element.clone()
                    };
                }
                None => schema.fields.push((key.clone(), element.clone())),
            }
        }
        Ok(schema)
    }

    pub fn get(&self, key: &str) -> Option<&SchemaElement> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaElement)> {
        self.fields.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub path_segment: String,
    /// Base resource URL the client issues requests against.
    pub url: Url,
    pub schema: Arc<Schema>,
    pub id_key: String,
    pub options: BindingOptions,
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    pub entities: Vec<ResolvedEntity>,
    pub entity_by_path: HashMap<String, ResolvedEntity>,
}

impl ResolvedModel {
    pub fn entity_by_path(&self, path: &str) -> Option<&ResolvedEntity> {
        self.entity_by_path.get(path)
    }
}

/// Resource URL for `resource` under `api_base`. Absolute URLs are taken as they are.
pub fn resource_url(api_base: &Url, resource: &str) -> Result<Url, ConfigError> {
    if resource.starts_with("http://") || resource.starts_with("https://") {
        return Url::parse(resource).map_err(|e| ConfigError::Validation(format!("{}: {}", resource, e)));
    }
    let mut url = api_base.clone();
    url.path_segments_mut()
        .map_err(|_| ConfigError::Validation(format!("API base URL cannot be a base: {}", api_base)))?
        .pop_if_empty()
        .extend(resource.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}
