//! Resource client against a stub upstream: request shapes and both response policies.

mod common;

use axum::http::{Method, StatusCode};
use common::Upstream;
use records_admin::{AppError, ClientConfig, Removed, ResourceClient, ResponsePolicy};
use serde::Deserialize;
use serde_json::{json, Value};

fn client(upstream: &Upstream, policy: ResponsePolicy) -> ResourceClient {
    let config = ClientConfig::new(upstream.url("/api/study"), policy).unwrap();
    ResourceClient::new(reqwest::Client::new(), config)
}

#[tokio::test]
async fn create_posts_json_once_and_decodes_reply() {
    let upstream = Upstream::start(StatusCode::CREATED, json!({ "id": "s1", "title": "x" })).await;
    let created = client(&upstream, ResponsePolicy::Permissive)
        .create(&json!({ "title": "x" }))
        .await
        .unwrap();

    assert_eq!(created, json!({ "id": "s1", "title": "x" }));
    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/api/study");
    assert_eq!(requests[0].json(), json!({ "title": "x" }));
}

#[tokio::test]
async fn list_adds_title_filter_only_when_given() {
    let upstream = Upstream::start(StatusCode::OK, json!([{ "id": "s1", "title": "soil survey" }])).await;
    let study = client(&upstream, ResponsePolicy::Strict);

    let rows = study.list(None).await.unwrap();
    assert_eq!(rows.len(), 1);
    study.list(Some("soil survey")).await.unwrap();
    study.list(Some("")).await.unwrap();

    let requests = upstream.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.method == Method::GET && r.path == "/api/study"));
    assert_eq!(requests[0].query, None);
    assert_eq!(requests[1].query.as_deref(), Some("title=soil+survey"));
    assert_eq!(requests[2].query, None);
}

#[tokio::test]
async fn get_update_and_remove_target_the_item() {
    let upstream = Upstream::start(StatusCode::OK, json!({ "id": "s1" })).await;
    let study = client(&upstream, ResponsePolicy::Permissive);

    study.get_by_id("s1").await.unwrap();
    study.update(&json!({ "title": "renamed" }), "s1").await.unwrap();
    let removed = study.remove("s1").await.unwrap();
    assert!(matches!(removed, Removed::Entity(v) if v == json!({ "id": "s1" })));

    let requests = upstream.requests();
    let calls: Vec<(Method, &str)> = requests.iter().map(|r| (r.method.clone(), r.path.as_str())).collect();
    assert_eq!(
        calls,
        vec![
            (Method::GET, "/api/study/s1"),
            (Method::PUT, "/api/study/s1"),
            (Method::DELETE, "/api/study/s1"),
        ]
    );
    assert_eq!(requests[1].json(), json!({ "title": "renamed" }));
}

#[tokio::test]
async fn permissive_policy_returns_error_body_as_data() {
    let upstream = Upstream::start(StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "boom" })).await;
    let body = client(&upstream, ResponsePolicy::Permissive).get_by_id("s1").await.unwrap();
    assert_eq!(body, json!({ "detail": "boom" }));
}

#[tokio::test]
async fn strict_policy_raises_with_response_attached() {
    let upstream = Upstream::start(StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "boom" })).await;
    let err = client(&upstream, ResponsePolicy::Strict)
        .create(&json!({ "title": "x" }))
        .await
        .unwrap_err();
    match err {
        AppError::NonSuccess(raw) => assert_eq!(raw.status(), StatusCode::INTERNAL_SERVER_ERROR),
        other => panic!("expected NonSuccess, got {other:?}"),
    }
}

#[tokio::test]
async fn strict_remove_on_404_leaves_body_unread() {
    let upstream = Upstream::start(StatusCode::NOT_FOUND, json!({ "detail": "no such study" })).await;
    let err = client(&upstream, ResponsePolicy::Strict).remove("missing").await.unwrap_err();

    let AppError::NonSuccess(raw) = err else {
        panic!("expected NonSuccess");
    };
    assert_eq!(raw.status(), StatusCode::NOT_FOUND);
    assert_eq!(raw.url().path(), "/api/study/missing");
    let body = raw.into_inner().text().await.unwrap();
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "detail": "no such study" }));
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn strict_remove_success_returns_raw_response() {
    let upstream = Upstream::start_raw(StatusCode::OK, "").await;
    let removed = client(&upstream, ResponsePolicy::Strict).remove("s1").await.unwrap();
    match removed {
        Removed::Raw(raw) => assert_eq!(raw.status(), StatusCode::OK),
        Removed::Entity(_) => panic!("strict remove must not decode"),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_failure() {
    let upstream = Upstream::start_raw(StatusCode::OK, "<html>gateway</html>").await;
    let err = client(&upstream, ResponsePolicy::Permissive).list(None).await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = reqwest::Url::parse(&format!("http://{addr}/api/study")).unwrap();
    let study: ResourceClient = ResourceClient::new(
        reqwest::Client::new(),
        ClientConfig::new(base, ResponsePolicy::Permissive).unwrap(),
    );
    assert!(matches!(study.list(None).await, Err(AppError::Transport(_))));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Study {
    id: String,
    title: String,
}

#[tokio::test]
async fn decodes_into_typed_entities() {
    let upstream = Upstream::start(StatusCode::OK, json!([{ "id": "s1", "title": "x", "extra": 1 }])).await;
    let config = ClientConfig::new(upstream.url("/api/study"), ResponsePolicy::Strict).unwrap();
    let study: ResourceClient<Study> = ResourceClient::new(reqwest::Client::new(), config);
    let rows = study.list(None).await.unwrap();
    assert_eq!(rows, vec![Study { id: "s1".into(), title: "x".into() }]);
}
