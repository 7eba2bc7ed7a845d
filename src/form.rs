//! Submitted form values and their typed submission counterparts.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Uploaded file part of a multipart submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileBlob {
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Files go over the JSON wire as metadata only.
impl Serialize for FileBlob {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("FileBlob", 3)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("type", &self.content_type)?;
        s.serialize_field("size", &self.bytes.len())?;
        s.end()
    }
}

/// One raw submitted value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FileBlob),
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

/// Ordered submitted pairs. A key repeats for multi-valued controls.
pub type FormPairs = Vec<(String, FormValue)>;

/// Build `FormPairs` from text pairs.
pub fn text_pairs<I, K, V>(pairs: I) -> FormPairs
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), FormValue::Text(v.into())))
        .collect()
}

/// Typed value of one field in a submission.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionValue {
    Null,
    Text(String),
    Many(Vec<String>),
    Date(DateTime<Utc>),
    File(FileBlob),
}

impl Serialize for SubmissionValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SubmissionValue::Null => serializer.serialize_unit(),
            SubmissionValue::Text(s) => serializer.serialize_str(s),
            SubmissionValue::Many(values) => values.serialize(serializer),
            SubmissionValue::Date(d) => serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            SubmissionValue::File(blob) => blob.serialize(serializer),
        }
    }
}

/// Typed submission keyed by schema field, in first-submitted order. Serializes as a JSON object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmissionForm {
    entries: Vec<(String, SubmissionValue)>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        SubmissionForm::default()
    }

    pub fn get(&self, key: &str) -> Option<&SubmissionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SubmissionValue> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: SubmissionValue) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubmissionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SubmissionForm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
