//! Post queries for Feedgraph GraphQL API

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::types::Post;
use crate::graphql::{request, to_graphql_error};

/// Post-related queries
#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// List all posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let posts = request(ctx)?
            .store
            .posts()
            .await
            .map_err(to_graphql_error)?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Get a post by ID
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        let post = request(ctx)?
            .store
            .post(id)
            .await
            .map_err(to_graphql_error)?;
        Ok(post.map(Post::from))
    }
}
