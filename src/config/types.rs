//! Raw config types matching the entity definition JSON files.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Input kind of one field. Only `date` and `select` change how values are coerced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Date,
    Select,
    Number,
    Textarea,
    File,
}

/// Display, validation and coercion metadata for one field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaElement {
    #[serde(rename = "type", default)]
    pub type_: FieldType,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub required: bool,
    /// Only valid together with `FieldType::Select`.
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Name of the entity whose loader feeds a select field. Defaults to the field key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetcher_key: Option<String>,
}

impl SchemaElement {
    pub fn new(type_: FieldType) -> Self {
        SchemaElement {
            type_,
            ..Default::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn label(mut self, label_key: impl Into<String>) -> Self {
        self.label_key = Some(label_key.into());
        self
    }

    pub fn fetcher(mut self, fetcher_key: impl Into<String>) -> Self {
        self.fetcher_key = Some(fetcher_key.into());
        self
    }
}

/// Serializer strictness for submitted keys that the schema does not declare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormPolicy {
    /// Unknown keys are dropped.
    #[default]
    Tolerant,
    /// Unknown keys fail the whole submission.
    Strict,
}

/// What the resource client does with a non-success HTTP status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponsePolicy {
    /// Log, then decode the body as if the call succeeded.
    #[default]
    Permissive,
    /// Log, then fail with the undecoded response attached.
    Strict,
}

/// What loaders do when the underlying read fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoaderPolicy {
    #[default]
    NullOnFailure,
    Propagate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingOptions {
    #[serde(default)]
    pub form: FormPolicy,
    #[serde(default)]
    pub response: ResponsePolicy,
    #[serde(default)]
    pub loader: LoaderPolicy,
}

impl BindingOptions {
    /// Tolerant serializer, permissive client.
    pub fn tolerant() -> Self {
        BindingOptions::default()
    }

    /// Strict serializer, strict client.
    pub fn strict() -> Self {
        BindingOptions {
            form: FormPolicy::Strict,
            response: ResponsePolicy::Strict,
            loader: LoaderPolicy::NullOnFailure,
        }
    }
}

/// Field declarations in document order. Duplicate keys are kept so validation can reject them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldList(pub Vec<(String, SchemaElement)>);

impl<'de> Deserialize<'de> for FieldList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldListVisitor;

        impl<'de> Visitor<'de> for FieldListVisitor {
            type Value = FieldList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping field keys to field definitions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<FieldList, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, element)) = map.next_entry::<String, SchemaElement>()? {
                    fields.push((key, element));
                }
                Ok(FieldList(fields))
            }
        }

        deserializer.deserialize_map(FieldListVisitor)
    }
}

/// One entity definition as written in a config file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub path_segment: String,
    /// Resource path under the API base URL (or an absolute URL). Defaults to `path_segment`.
    #[serde(default)]
    pub resource: Option<String>,
    /// Path parameter carrying the entity id. Defaults to `<path_segment>Id`.
    #[serde(default)]
    pub id_key: Option<String>,
    #[serde(default)]
    pub form_policy: FormPolicy,
    #[serde(default)]
    pub response_policy: ResponsePolicy,
    #[serde(default)]
    pub loader_policy: LoaderPolicy,
    #[serde(default)]
    pub fields: FieldList,
}

impl EntityConfig {
    pub fn resource(&self) -> &str {
        self.resource.as_deref().unwrap_or(&self.path_segment)
    }

    pub fn id_key(&self) -> String {
        self.id_key
            .clone()
            .unwrap_or_else(|| format!("{}Id", self.path_segment))
    }

    pub fn options(&self) -> BindingOptions {
        BindingOptions {
            form: self.form_policy,
            response: self.response_policy,
            loader: self.loader_policy,
        }
    }
}
