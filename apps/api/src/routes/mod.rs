//! HTTP route handlers for the Feedgraph API
//!
//! This module contains all endpoint handlers including:
//! - The GraphQL endpoint and playground
//! - Health check endpoints

pub mod graphql;
pub mod health;

pub use graphql::{execute_in_order, graphql_router, GraphqlState};
pub use health::{health_router, HealthState};

use axum::{routing::get, Router};
use feedgraph_shared_config::LoaderConfig;
use tower_http::trace::TraceLayer;

use crate::graphql::FeedSchema;
use crate::store::SharedStore;

/// Build the application router without the CORS layer
pub fn build_router(schema: FeedSchema, store: SharedStore, loader_config: LoaderConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(graphql_router(GraphqlState {
            schema,
            store: store.clone(),
            loader_config,
        }))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(HealthState::new(store)))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "Feedgraph GraphQL API"
}
