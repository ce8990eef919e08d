//! GraphQL schema builder for Feedgraph

use async_graphql::{EmptySubscription, Schema};

use super::mutation::Mutation;
use super::query::Query;

/// Default maximum query depth
pub const DEFAULT_DEPTH_LIMIT: usize = 5;

/// The Feedgraph GraphQL schema type
pub type FeedSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create the GraphQL schema.
///
/// The schema holds no request state; the store and loaders arrive with each
/// request as [`super::RequestContext`] data.
pub fn build_schema(depth_limit: usize) -> FeedSchema {
    Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .limit_depth(depth_limit)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdl_exposes_relation_fields() {
        let sdl = build_schema(DEFAULT_DEPTH_LIMIT).sdl();

        assert!(sdl.contains("userSubscribedTo: [User!]!"));
        assert!(sdl.contains("subscribedToUser: [User!]!"));
        assert!(sdl.contains("unsubscribeFrom("));
        assert!(sdl.contains("enum MemberTypeId"));
    }
}
