//! GraphQL schema and resolvers for Feedgraph
//!
//! This module contains the async-graphql schema including:
//! - Query and mutation resolvers per entity
//! - Object types whose relation fields resolve through batch loaders
//! - The per-request context carrying the store and loader set
//! - Cache effects applied by mutations

pub mod context;
pub mod effects;
pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod selection;
pub mod types;

pub use context::RequestContext;
pub use loaders::Loaders;
pub use schema::{build_schema, FeedSchema, DEFAULT_DEPTH_LIMIT};

use async_graphql::Context;

use crate::error::ApiError;

/// The request context installed by the HTTP handler
pub(crate) fn request<'ctx>(ctx: &Context<'ctx>) -> async_graphql::Result<&'ctx RequestContext> {
    ctx.data::<RequestContext>()
}

/// Convert a service-layer error into a GraphQL field error
pub(crate) fn to_graphql_error(error: impl Into<ApiError>) -> async_graphql::Error {
    error.into().into_graphql()
}
