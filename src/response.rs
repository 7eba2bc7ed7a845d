//! Response envelopes: `{"data": ..., "meta": ...}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaCount>,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize)]
pub struct MetaCount {
    pub count: u64,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::CREATED, Json(SuccessOne { data, meta: None }))
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data, meta: None }))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data,
            meta: MetaCount { count },
        }),
    )
}

/// List loader result. A degraded read is `{"data": null}` with no count.
pub fn loaded_many<T: Serialize>(rows: Option<Vec<T>>) -> (StatusCode, Json<SuccessOne<Option<Vec<T>>>>) {
    let meta = rows.as_ref().map(|r| MetaCount { count: r.len() as u64 });
    (StatusCode::OK, Json(SuccessOne { data: rows, meta }))
}
