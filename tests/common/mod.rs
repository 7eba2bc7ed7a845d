//! Stub REST upstream: records every request and answers with a configurable status and body.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use records_admin::{FieldType, Schema, SchemaElement};
use reqwest::Url;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Default)]
struct Inner {
    requests: Mutex<Vec<Recorded>>,
    reply: Mutex<(u16, String)>,
}

#[derive(Clone)]
pub struct Upstream {
    pub addr: SocketAddr,
    inner: Arc<Inner>,
}

impl Upstream {
    pub async fn start(status: StatusCode, body: Value) -> Self {
        Self::start_raw(status, body.to_string()).await
    }

    /// Reply with a body that is not necessarily JSON.
    pub async fn start_raw(status: StatusCode, body: impl Into<String>) -> Self {
        let inner = Arc::new(Inner::default());
        *inner.reply.lock().unwrap() = (status.as_u16(), body.into());
        let app = Router::new().fallback(record).with_state(inner.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Upstream { addr, inner }
    }

    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, path)).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().unwrap().clone()
    }
}

async fn record(State(inner): State<Arc<Inner>>, method: Method, uri: Uri, body: Bytes) -> impl IntoResponse {
    inner.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
    });
    let (status, body) = inner.reply.lock().unwrap().clone();
    (
        StatusCode::from_u16(status).unwrap(),
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Study schema used across the integration tests.
pub fn study_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new([
            ("title", SchemaElement::new(FieldType::Text).required()),
            ("startDate", SchemaElement::new(FieldType::Date)),
            ("contacts", SchemaElement::new(FieldType::Select).multiple().fetcher("staff")),
            ("investigationId", SchemaElement::new(FieldType::Select).label("investigation")),
        ])
        .unwrap(),
    )
}
