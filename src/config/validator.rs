//! Config validation: field declarations and entity uniqueness.

use crate::config::{EntityConfig, FieldType, SchemaElement};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const FIELD_KEY_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const PATH_SEGMENT_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_-]*$";

static FIELD_KEY_RE: OnceLock<Result<Regex, String>> = OnceLock::new();
static PATH_SEGMENT_RE: OnceLock<Result<Regex, String>> = OnceLock::new();

/// Compiled on first use and shared afterwards.
fn pattern(cell: &'static OnceLock<Result<Regex, String>>, source: &str) -> Result<&'static Regex, ConfigError> {
    cell.get_or_init(|| Regex::new(source).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| ConfigError::Validation(e.clone()))
}

/// Check one entity's field declarations. Runs once, when the schema is built.
pub fn validate_fields(entity: &str, fields: &[(String, SchemaElement)]) -> Result<(), ConfigError> {
    let key_re = pattern(&FIELD_KEY_RE, FIELD_KEY_PATTERN)?;
    let mut seen = HashSet::new();
    for (key, element) in fields {
        let invalid = |reason: &str| ConfigError::InvalidField {
            entity: entity.to_string(),
            key: key.clone(),
            reason: reason.to_string(),
        };
        if !key_re.is_match(key) {
            return Err(invalid("key must be an identifier"));
        }
        if !seen.insert(key.as_str()) {
            return Err(invalid("declared more than once"));
        }
        if element.multiple && element.type_ != FieldType::Select {
            return Err(invalid("multiple is only allowed on select fields"));
        }
    }
    Ok(())
}

pub fn validate(configs: &[EntityConfig]) -> Result<(), ConfigError> {
    let segment_re = pattern(&PATH_SEGMENT_RE, PATH_SEGMENT_PATTERN)?;
    let key_re = pattern(&FIELD_KEY_RE, FIELD_KEY_PATTERN)?;
    let mut path_segments = HashSet::new();

    for entity in configs {
        let segment = entity.path_segment.as_str();
        if !segment_re.is_match(segment) {
            return Err(ConfigError::Validation(format!(
                "invalid path segment: '{}'",
                segment
            )));
        }
        if !path_segments.insert(segment) {
            return Err(ConfigError::DuplicatePathSegment(segment.to_string()));
        }
        let id_key = entity.id_key();
        if !key_re.is_match(&id_key) {
            return Err(ConfigError::Validation(format!(
                "{}: invalid id key '{}'",
                segment, id_key
            )));
        }
        if entity.resource().trim().is_empty() {
            return Err(ConfigError::Validation(format!("{}: empty resource", segment)));
        }
        validate_fields(segment, &entity.fields.0)?;
    }

    Ok(())
}
