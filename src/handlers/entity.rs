//! Entity handlers: run an entity's loaders and actions for the admin HTTP surface.

use crate::descriptor::{describe, form_defaults};
use crate::error::AppError;
use crate::extractors::FormSubmission;
use crate::handlers::binding::{ActionRequest, EntityBinding, LoaderRequest, RouteParams};
use crate::response::{loaded_many, success_many, success_one, success_one_ok};
use crate::service::Removed;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use serde_json::Value;

fn lookup<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a EntityBinding, AppError> {
    state
        .binding(path_segment)
        .ok_or_else(|| AppError::NotFound(path_segment.to_string()))
}

fn id_params(binding: &EntityBinding, id: String) -> RouteParams {
    RouteParams::new().with(binding.id_key(), id)
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    let rows = binding.loader_all(&LoaderRequest::from_pairs(pairs)).await?;
    Ok(loaded_many(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    let row = binding.loader_by_id(&id_params(binding, id)).await?;
    Ok(success_one_ok(row))
}

/// Prefill values for the edit form of one record, or null when the record cannot be loaded.
pub async fn form_values(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    let row = binding.loader_by_id(&id_params(binding, id)).await?;
    let defaults = row.map(|record| {
        form_defaults(binding.schema(), &record)
            .into_iter()
            .map(|(key, value)| (key, serde_json::to_value(value).unwrap_or(Value::Null)))
            .collect::<serde_json::Map<String, Value>>()
    });
    Ok(success_one_ok(defaults))
}

pub async fn schema(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    Ok(success_many(describe(binding.schema())))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    FormSubmission(form): FormSubmission,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    let row = binding.action_create(ActionRequest::new(form)).await?;
    tracing::info!(entity = %path_segment, "created");
    Ok(success_one(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
    FormSubmission(form): FormSubmission,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    let params = id_params(binding, id);
    let row = binding.action_update(ActionRequest::new(form), &params).await?;
    tracing::info!(entity = %path_segment, "updated");
    Ok(success_one_ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let binding = lookup(&state, &path_segment)?;
    let removed = binding.action_delete(&id_params(binding, id)).await?;
    tracing::info!(entity = %path_segment, "deleted");
    let data = match removed {
        Removed::Entity(row) => row,
        Removed::Raw(raw) => serde_json::json!({ "status": raw.status().as_u16() }),
    };
    Ok(success_one_ok(data))
}
