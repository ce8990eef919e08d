//! GraphQL execution helpers

use std::sync::Arc;

use async_graphql::{Request, Variables};
use axum::body::Body;
use axum::http::{header, Request as HttpRequest, StatusCode};
use axum::Router;
use feedgraph_api::graphql::DEFAULT_DEPTH_LIMIT;
use feedgraph_api::routes::{build_router, execute_in_order};
use feedgraph_api::{build_schema, FeedSchema, MemoryStore, RequestContext};
use feedgraph_shared_config::LoaderConfig;
use serde_json::Value;
use tower::ServiceExt;

pub fn schema() -> FeedSchema {
    build_schema(DEFAULT_DEPTH_LIMIT)
}

/// A fresh request context over `store`
pub fn context(store: &MemoryStore) -> RequestContext {
    RequestContext::new(Arc::new(store.clone()), &LoaderConfig::default())
}

/// A fresh request context whose loaders wait `batch_delay_ms` per batch
pub fn context_with_delay(store: &MemoryStore, batch_delay_ms: u64) -> RequestContext {
    let config = LoaderConfig {
        batch_delay_ms,
        ..LoaderConfig::default()
    };
    RequestContext::new(Arc::new(store.clone()), &config)
}

/// Execute one operation with its own request context
pub async fn execute(store: &MemoryStore, query: &str, variables: Value) -> Value {
    execute_in(&context(store), query, variables).await
}

/// Execute one operation within an existing request context
pub async fn execute_in(context: &RequestContext, query: &str, variables: Value) -> Value {
    let request = Request::new(query)
        .variables(Variables::from_json(variables))
        .data(context.clone());
    let response = schema().execute(request).await;
    serde_json::to_value(&response).expect("response serializes")
}

/// Execute several operations as one batched request
pub async fn execute_batch(store: &MemoryStore, operations: Vec<(&str, Value)>) -> Vec<Value> {
    let requests = operations
        .into_iter()
        .map(|(query, variables)| Request::new(query).variables(Variables::from_json(variables)))
        .collect();
    let response = execute_in_order(&schema(), requests, &context(store)).await;
    match serde_json::to_value(&response).expect("response serializes") {
        Value::Array(responses) => responses,
        single => vec![single],
    }
}

/// The full router over `store`
pub fn test_app(store: &MemoryStore) -> Router {
    build_router(schema(), Arc::new(store.clone()), LoaderConfig::default())
}

/// POST a JSON body to `/graphql`
pub async fn post_graphql(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            HttpRequest::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// The `extensions.code` of every error in a response
pub fn error_codes(response: &Value) -> Vec<String> {
    response["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["extensions"]["code"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
