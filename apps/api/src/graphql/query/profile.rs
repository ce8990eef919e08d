//! Profile queries for Feedgraph GraphQL API

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::types::Profile;
use crate::graphql::{request, to_graphql_error};

/// Profile-related queries
#[derive(Default)]
pub struct ProfileQuery;

#[Object]
impl ProfileQuery {
    /// List all profiles
    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let profiles = request(ctx)?
            .store
            .profiles()
            .await
            .map_err(to_graphql_error)?;
        Ok(profiles.into_iter().map(Profile::from).collect())
    }

    /// Get a profile by its own ID
    async fn profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Profile>> {
        let profile = request(ctx)?
            .store
            .profile(id)
            .await
            .map_err(to_graphql_error)?;
        Ok(profile.map(Profile::from))
    }
}
