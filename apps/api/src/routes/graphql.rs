//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a query, mutation or batch of operations
//! - `GET /graphql/playground` - GraphQL Playground UI

use async_graphql::{BatchRequest, BatchResponse, Request};
use async_graphql_axum::{GraphQLBatchRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use feedgraph_shared_config::LoaderConfig;

use crate::graphql::{FeedSchema, RequestContext};
use crate::store::SharedStore;

/// Shared state for the GraphQL handlers
#[derive(Clone)]
pub struct GraphqlState {
    pub schema: FeedSchema,
    pub store: SharedStore,
    pub loader_config: LoaderConfig,
}

/// Create the GraphQL router
pub fn graphql_router(state: GraphqlState) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        .with_state(state)
}

/// Execute GraphQL operations against the schema
///
/// Every HTTP request gets its own [`RequestContext`] with a fresh loader
/// set. The operations of a batched request run one after another over
/// that context, so a mutation's cache effects are visible to the
/// operations after it and to none before it.
async fn graphql_handler(
    State(state): State<GraphqlState>,
    req: GraphQLBatchRequest,
) -> GraphQLResponse {
    let context = RequestContext::new(state.store.clone(), &state.loader_config);

    match req.into_inner() {
        BatchRequest::Single(request) => {
            tracing::debug!(operations = 1, "Executing GraphQL request");
            state.schema.execute(request.data(context)).await.into()
        }
        BatchRequest::Batch(requests) => {
            tracing::debug!(operations = requests.len(), "Executing GraphQL batch");
            execute_in_order(&state.schema, requests, &context).await.into()
        }
    }
}

/// Run batched operations sequentially over one shared context
pub async fn execute_in_order(
    schema: &FeedSchema,
    requests: Vec<Request>,
    context: &RequestContext,
) -> BatchResponse {
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        responses.push(schema.execute(request.data(context.clone())).await);
    }
    BatchResponse::Batch(responses)
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
