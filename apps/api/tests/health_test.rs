//! Integration tests for the HTTP surface
//!
//! Exercises the full router over an in-memory store: health probes, the
//! GraphQL endpoint (single and batched requests) and the playground.

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::*;
use feedgraph_api::MemoryStore;
use serde_json::json;
use tower::ServiceExt;

async fn get(store: &MemoryStore, uri: &str) -> (StatusCode, String) {
    let response = test_app(store)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_root_endpoint() {
    let (status, body) = get(&MemoryStore::new(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Feedgraph"));
}

#[tokio::test]
async fn test_simple_health_check() {
    let (status, body) = get(&MemoryStore::new(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_liveness_probe() {
    let (status, body) = get(&MemoryStore::new(), "/health/live").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "alive");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_probe_pings_store() {
    let store = MemoryStore::new();

    let (status, _) = get(&store, "/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.calls("ping"), 1);
}

#[tokio::test]
async fn test_readiness_probe_reports_unavailable_store() {
    let store = MemoryStore::new();
    store.fail_next("ping", 1);

    let (status, body) = get(&store, "/health/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("unavailable"));
}

#[tokio::test]
async fn test_playground_is_served() {
    let (status, body) = get(&MemoryStore::new(), "/graphql/playground").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/graphql"));
}

#[tokio::test]
async fn test_graphql_endpoint_batches_per_request() {
    let graph = seeded_graph();

    let (status, body) = post_graphql(
        test_app(&graph.store),
        json!({ "query": "{ users { id posts { id } userSubscribedTo { id } } }" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"].as_array().unwrap().len(), 3);
    assert_eq!(graph.store.calls("users"), 1);
    assert_eq!(graph.store.calls("posts_by_author_ids"), 1);
    assert_eq!(graph.store.calls("users_by_ids"), 0);
}

#[tokio::test]
async fn test_loaders_are_not_shared_between_http_requests() {
    let graph = seeded_graph();
    let app = test_app(&graph.store);
    let query = json!({
        "query": "query($id: UUID!) { user(id: $id) { name } }",
        "variables": { "id": graph.user(0).id },
    });

    post_graphql(app.clone(), query.clone()).await;
    post_graphql(app, query).await;

    assert_eq!(graph.store.calls("users_by_ids"), 2);
}

#[tokio::test]
async fn test_batched_http_request_sees_its_own_mutation() {
    let graph = seeded_graph();
    let id = graph.user(2).id;
    let read = json!({
        "query": "query($id: UUID!) { user(id: $id) { name } }",
        "variables": { "id": id },
    });

    let (status, body) = post_graphql(
        test_app(&graph.store),
        json!([
            read,
            {
                "query": "mutation($id: UUID!) { changeUser(id: $id, dto: { name: \"X\" }) { id } }",
                "variables": { "id": id },
            },
            read,
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["data"]["user"]["name"], "cy");
    assert_eq!(body[2]["data"]["user"]["name"], "X");
    assert_eq!(graph.store.calls("users_by_ids"), 2);
}
