//! Schema derivation helpers: labels, placeholders, defaults and submission coercion.
//!
//! All functions are pure. Optional string overrides count as absent when empty.

use crate::config::{FieldType, Schema, SchemaElement};
use crate::form::{FormValue, SubmissionValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_TITLE_KEY: &str = "title";

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Record attribute shown as the option text when this field's entity feeds a select.
pub fn title_key(schema: &SchemaElement) -> &str {
    present(&schema.title_key).unwrap_or(DEFAULT_TITLE_KEY)
}

pub fn multiple_value(schema: &SchemaElement) -> bool {
    schema.multiple
}

pub fn hidden_value(schema: &SchemaElement) -> bool {
    schema.hidden
}

pub fn required(schema: &SchemaElement) -> bool {
    schema.required
}

/// Entity whose loader feeds a select field.
pub fn fetcher_key<'a>(schema: &'a SchemaElement, key: &'a str) -> &'a str {
    present(&schema.fetcher_key).unwrap_or(key)
}

/// Uppercase the first character only.
pub fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn table_display_key(schema: &SchemaElement, key: &str) -> String {
    capitalise(present(&schema.label_key).unwrap_or(key))
}

/// Table label with a trailing `*` for required fields.
pub fn form_display_key(schema: &SchemaElement, key: &str) -> String {
    let label = table_display_key(schema, key);
    if required(schema) {
        label + "*"
    } else {
        label
    }
}

pub fn placeholder_value(schema: &SchemaElement, key: &str) -> String {
    match present(&schema.placeholder) {
        Some(placeholder) => placeholder.to_string(),
        None => format!("Enter {}", table_display_key(schema, key)),
    }
}

/// Value used to prefill an input from a fetched record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    One(String),
    Many(Vec<String>),
}

pub fn default_value(schema: &SchemaElement, value: Option<&Value>) -> DefaultValue {
    match value {
        Some(Value::Array(items)) => {
            DefaultValue::Many(items.iter().map(|item| default_value_one(schema, Some(item))).collect())
        }
        other => DefaultValue::One(default_value_one(schema, other)),
    }
}

/// Falsy values become `""`. Date strings keep their first ten characters (`YYYY-MM-DD`).
pub fn default_value_one(schema: &SchemaElement, value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return String::new(),
        Some(v) => v,
    };
    match (schema.type_, value) {
        (_, Value::String(s)) if s.is_empty() => String::new(),
        (FieldType::Date, Value::String(s)) => s.chars().take(10).collect(),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

/// Coerce one submitted value. `""` is null; date fields parse their text.
pub fn submission_value(schema: &SchemaElement, raw: &FormValue) -> SubmissionValue {
    match raw {
        FormValue::Text(s) if s.is_empty() => SubmissionValue::Null,
        FormValue::Text(s) if schema.type_ == FieldType::Date => match parse_date(s) {
            Some(date) => SubmissionValue::Date(date),
            None => {
                tracing::warn!(value = %s, "unparseable date submitted; sending null");
                SubmissionValue::Null
            }
        },
        FormValue::Text(s) => SubmissionValue::Text(s.clone()),
        FormValue::File(blob) => SubmissionValue::File(blob.clone()),
    }
}

/// RFC 3339, a bare `YYYY-MM-DD` (UTC midnight), or a local date-time read as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    None
}

/// Everything a table or form needs to render one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub type_: FieldType,
    pub label: String,
    pub form_label: String,
    pub placeholder: String,
    pub hidden: bool,
    pub required: bool,
    pub multiple: bool,
    pub fetcher_key: String,
    pub title_key: String,
}

pub fn describe_field(schema: &SchemaElement, key: &str) -> FieldDescriptor {
    FieldDescriptor {
        key: key.to_string(),
        type_: schema.type_,
        label: table_display_key(schema, key),
        form_label: form_display_key(schema, key),
        placeholder: placeholder_value(schema, key),
        hidden: hidden_value(schema),
        required: required(schema),
        multiple: multiple_value(schema),
        fetcher_key: fetcher_key(schema, key).to_string(),
        title_key: title_key(schema).to_string(),
    }
}

pub fn describe(schema: &Schema) -> Vec<FieldDescriptor> {
    schema.iter().map(|(key, element)| describe_field(element, key)).collect()
}

/// Prefill values for every schema field from a fetched record.
pub fn form_defaults(schema: &Schema, record: &Value) -> Vec<(String, DefaultValue)> {
    schema
        .iter()
        .map(|(key, element)| (key.to_string(), default_value(element, record.get(key))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FileBlob;
    use chrono::TimeZone;
    use serde_json::json;

    fn text() -> SchemaElement {
        SchemaElement::new(FieldType::Text)
    }

    fn date() -> SchemaElement {
        SchemaElement::new(FieldType::Date)
    }

    #[test]
    fn capitalise_first_char_only() {
        assert_eq!(capitalise(""), "");
        assert_eq!(capitalise("abc"), "Abc");
        assert_eq!(capitalise("dataFile"), "DataFile");
        assert_eq!(capitalise("élan"), "Élan");
    }

    #[test]
    fn flags_default_to_false() {
        let plain = text();
        assert!(!multiple_value(&plain));
        assert!(!hidden_value(&plain));
        assert!(!required(&plain));
        assert!(multiple_value(&SchemaElement::new(FieldType::Select).multiple()));
        assert!(hidden_value(&text().hidden()));
    }

    #[test]
    fn title_and_fetcher_keys() {
        assert_eq!(title_key(&text()), "title");
        let mut custom = text();
        custom.title_key = Some("name".into());
        assert_eq!(title_key(&custom), "name");
        custom.title_key = Some(String::new());
        assert_eq!(title_key(&custom), "title");

        assert_eq!(fetcher_key(&text(), "investigation"), "investigation");
        let vocab = SchemaElement::new(FieldType::Select).fetcher("vocabulary");
        assert_eq!(fetcher_key(&vocab, "institutionType"), "vocabulary");
    }

    #[test]
    fn display_keys_and_placeholders() {
        assert_eq!(table_display_key(&text(), "title"), "Title");
        let labelled = text().label("investigation");
        assert_eq!(table_display_key(&labelled, "investigationId"), "Investigation");

        assert_eq!(form_display_key(&text(), "title"), "Title");
        assert_eq!(form_display_key(&text().required(), "title"), "Title*");
        assert_eq!(form_display_key(&labelled.clone().required(), "investigationId"), "Investigation*");

        assert_eq!(placeholder_value(&text(), "description"), "Enter Description");
        assert_eq!(placeholder_value(&labelled, "investigationId"), "Enter Investigation");
        let mut custom = text();
        custom.placeholder = Some("e.g. Soil survey".into());
        assert_eq!(placeholder_value(&custom, "title"), "e.g. Soil survey");
    }

    #[test]
    fn default_value_slices_dates_textually() {
        assert_eq!(default_value_one(&date(), Some(&json!("2024-01-01T00:00:00.000Z"))), "2024-01-01");
        assert_eq!(default_value_one(&date(), Some(&json!("2024-1-1"))), "2024-1-1");
        assert_eq!(default_value_one(&text(), Some(&json!("2024-01-01T00:00:00.000Z"))), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn default_value_falsy_is_empty() {
        assert_eq!(default_value_one(&text(), None), "");
        assert_eq!(default_value_one(&text(), Some(&Value::Null)), "");
        assert_eq!(default_value_one(&date(), Some(&json!(""))), "");
        assert_eq!(default_value_one(&text(), Some(&json!(0))), "");
        assert_eq!(default_value_one(&text(), Some(&json!(42))), "42");
        assert_eq!(default_value_one(&text(), Some(&json!(true))), "true");
    }

    #[test]
    fn default_value_maps_arrays() {
        let select = SchemaElement::new(FieldType::Select).multiple();
        assert_eq!(
            default_value(&select, Some(&json!(["staff0", null, "staff2"]))),
            DefaultValue::Many(vec!["staff0".into(), "".into(), "staff2".into()])
        );
        assert_eq!(default_value(&select, Some(&json!("staff0"))), DefaultValue::One("staff0".into()));
    }

    #[test]
    fn submission_value_coercion() {
        assert_eq!(submission_value(&text(), &"".into()), SubmissionValue::Null);
        assert_eq!(submission_value(&date(), &"".into()), SubmissionValue::Null);
        assert_eq!(
            submission_value(&date(), &"2024-01-01".into()),
            SubmissionValue::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            submission_value(&date(), &"2024-03-05T10:30:00+02:00".into()),
            SubmissionValue::Date(Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap())
        );
        assert_eq!(submission_value(&date(), &"soon".into()), SubmissionValue::Null);
        assert_eq!(submission_value(&text(), &"plate 7".into()), SubmissionValue::Text("plate 7".into()));

        let blob = FileBlob {
            name: Some("scan.tif".into()),
            content_type: None,
            bytes: vec![1, 2, 3],
        };
        assert_eq!(
            submission_value(&date(), &FormValue::File(blob.clone())),
            SubmissionValue::File(blob)
        );
    }

    #[test]
    fn describe_keeps_schema_order() {
        let schema = Schema::new([
            ("title", text().required()),
            ("institutionType", SchemaElement::new(FieldType::Select).fetcher("vocabulary")),
        ])
        .unwrap();
        let fields = describe(&schema);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].key, "id");
        assert!(fields[0].hidden);
        assert_eq!(fields[3].form_label, "Title*");
        assert_eq!(fields[4].fetcher_key, "vocabulary");
        assert_eq!(fields[4].placeholder, "Enter InstitutionType");
    }

    #[test]
    fn form_defaults_cover_every_field() {
        let schema = Schema::new([("title", text())]).unwrap();
        let record = json!({ "id": "s1", "createdAt": "2023-06-30T12:00:00Z", "title": "Survey" });
        let defaults = form_defaults(&schema, &record);
        assert_eq!(
            defaults,
            vec![
                ("id".to_string(), DefaultValue::One("s1".into())),
                ("createdAt".to_string(), DefaultValue::One("2023-06-30".into())),
                ("updatedAt".to_string(), DefaultValue::One("".into())),
                ("title".to_string(), DefaultValue::One("Survey".into())),
            ]
        );
    }
}
