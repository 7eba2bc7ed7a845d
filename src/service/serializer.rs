//! Form submission serializer: raw submitted pairs to a typed `SubmissionForm`.

use crate::config::{FieldType, FormPolicy, Schema};
use crate::descriptor::{multiple_value, submission_value};
use crate::error::AppError;
use crate::form::{FormValue, SubmissionForm, SubmissionValue};
use std::collections::HashSet;

/// Serialize submitted pairs against `schema`.
///
/// Multi-select fields accumulate their values in submission order; an empty selection sets the
/// field to null and ignores any later values for it. Single-valued fields keep the last value.
/// Keys missing from the schema are dropped under `FormPolicy::Tolerant` and rejected with
/// `AppError::SchemaViolation` under `FormPolicy::Strict`.
pub fn parse_form_data<I>(schema: &Schema, pairs: I, policy: FormPolicy) -> Result<SubmissionForm, AppError>
where
    I: IntoIterator<Item = (String, FormValue)>,
{
    let mut form = SubmissionForm::new();
    let mut collapsed: HashSet<String> = HashSet::new();

    for (key, value) in pairs {
        let Some(element) = schema.get(&key) else {
            match policy {
                FormPolicy::Tolerant => {
                    tracing::debug!(key = %key, "dropping submitted key not in schema");
                    continue;
                }
                FormPolicy::Strict => return Err(AppError::SchemaViolation { key }),
            }
        };

        if multiple_value(element) && element.type_ == FieldType::Select {
            if collapsed.contains(&key) {
                continue;
            }
            let value = match value {
                FormValue::Text(s) => s,
                FormValue::File(_) => {
                    tracing::warn!(key = %key, "ignoring file submitted to a multi-select field");
                    continue;
                }
            };
            if value.is_empty() {
                form.insert(key.clone(), SubmissionValue::Null);
                collapsed.insert(key);
                continue;
            }
            match form.get_mut(&key) {
                Some(SubmissionValue::Many(values)) => values.push(value),
                _ => form.insert(key, SubmissionValue::Many(vec![value])),
            }
        } else {
            let typed = submission_value(element, &value);
            form.insert(key, typed);
        }
    }

    Ok(form)
}

pub fn parse_form_data_tolerant<I>(schema: &Schema, pairs: I) -> SubmissionForm
where
    I: IntoIterator<Item = (String, FormValue)>,
{
    // Tolerant parsing never fails.
    parse_form_data(schema, pairs, FormPolicy::Tolerant).unwrap_or_default()
}

pub fn parse_form_data_strict<I>(schema: &Schema, pairs: I) -> Result<SubmissionForm, AppError>
where
    I: IntoIterator<Item = (String, FormValue)>,
{
    parse_form_data(schema, pairs, FormPolicy::Strict)
}
