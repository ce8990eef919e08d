//! Post mutations for Feedgraph GraphQL API

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::types::Post;
use crate::graphql::{request, to_graphql_error};
use crate::models::{CreatePost, UpdatePost};

use super::DeleteOutcome;

/// Input for creating a post
#[derive(Debug, Clone, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

/// Input for changing a post; omitted fields are left unchanged
#[derive(Debug, Clone, Default, InputObject)]
pub struct ChangePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Post mutations
#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a post for an existing author
    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostInput) -> Result<Post> {
        let request = request(ctx)?;

        let post = request
            .store
            .create_post(CreatePost {
                title: dto.title,
                content: dto.content,
                author_id: dto.author_id,
            })
            .await
            .map_err(to_graphql_error)?;

        request.loaders.post_written(&post);
        Ok(Post::from(post))
    }

    async fn change_post(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangePostInput,
    ) -> Result<Post> {
        let request = request(ctx)?;

        let post = request
            .store
            .update_post(
                id,
                UpdatePost {
                    title: dto.title,
                    content: dto.content,
                },
            )
            .await
            .map_err(to_graphql_error)?;

        request.loaders.post_written(&post);
        Ok(Post::from(post))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let request = request(ctx)?;

        let outcome = DeleteOutcome::from(request.store.delete_post(id).await);
        let Some(post) = outcome.into_deleted("post", id) else {
            return Ok(false);
        };

        request.loaders.post_written(&post);
        Ok(true)
    }
}
