//! User GraphQL type
//!
//! Relation fields resolve through the request's loaders, so the same field
//! requested on many users costs one store call per batch.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::Loaders;
use crate::graphql::{request, to_graphql_error};
use crate::models::User as DbUser;

use super::post::Post;
use super::profile::Profile;

/// User exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl User {
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Unique user identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn name(&self) -> &str {
        &self.inner.name
    }

    async fn balance(&self) -> f64 {
        self.inner.balance
    }

    // Relationship resolvers

    /// The user's profile, if one was created
    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        let loaders = &request(ctx)?.loaders;
        let profile = loaders
            .profiles
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(profile.map(Profile::from))
    }

    /// Posts written by this user
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let loaders = &request(ctx)?.loaders;
        let posts = loaders
            .posts
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        Ok(posts
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect())
    }

    /// Authors this user subscribes to
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = &request(ctx)?.loaders;
        let ids = loaders
            .subscribed_to
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        load_users(loaders, ids.unwrap_or_default()).await
    }

    /// Users subscribing to this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = &request(ctx)?.loaders;
        let ids = loaders
            .subscribers
            .load(self.inner.id)
            .await
            .map_err(to_graphql_error)?;
        load_users(loaders, ids.unwrap_or_default()).await
    }
}

/// Resolve user IDs in order, dropping users that no longer exist
async fn load_users(loaders: &Loaders, ids: Vec<Uuid>) -> Result<Vec<User>> {
    loaders
        .users
        .load_many(ids)
        .await
        .into_iter()
        .filter_map(|user| user.transpose())
        .map(|user| user.map(User::from).map_err(to_graphql_error))
        .collect()
}
