//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("invalid field '{key}' in {entity}: {reason}")]
    InvalidField {
        entity: String,
        key: String,
        reason: String,
    },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Upstream response that was not decoded. The body is left unread so callers can inspect it.
#[derive(Debug)]
pub struct RawResponse(reqwest::Response);

impl RawResponse {
    pub fn new(response: reqwest::Response) -> Self {
        RawResponse(response)
    }

    pub fn status(&self) -> StatusCode {
        self.0.status()
    }

    pub fn url(&self) -> &reqwest::Url {
        self.0.url()
    }

    pub fn headers(&self) -> &reqwest::header::HeaderMap {
        self.0.headers()
    }

    pub fn into_inner(self) -> reqwest::Response {
        self.0
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {} for {}", .0.status(), .0.url())]
    NonSuccess(RawResponse),
    #[error("key cannot be found in schema: {key}")]
    SchemaViolation { key: String },
    #[error("decode: {0}")]
    Decode(String),
    #[error("missing path parameter: {0}")]
    MissingParam(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Transport(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
            AppError::NonSuccess(raw) => {
                let upstream = raw.status();
                details = Some(serde_json::json!({ "status": upstream.as_u16() }));
                if upstream.is_client_error() {
                    (upstream, "upstream_error")
                } else {
                    (StatusCode::BAD_GATEWAY, "upstream_error")
                }
            }
            AppError::SchemaViolation { key } => {
                details = Some(serde_json::json!({ "key": key }));
                (StatusCode::UNPROCESSABLE_ENTITY, "schema_violation")
            }
            AppError::Decode(_) => (StatusCode::BAD_GATEWAY, "decode_error"),
            AppError::MissingParam(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
