//! User queries for Feedgraph GraphQL API
//!
//! - users: every user, eagerly fetching the subscription edges the query selects
//! - user: one user by ID, through the user loader

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::types::User;
use crate::graphql::{request, to_graphql_error};
use crate::store::RelationSelection;

/// User-related queries
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// List all users
    ///
    /// When the selection includes `userSubscribedTo` or `subscribedToUser`,
    /// the edges are fetched together with the users and primed into the
    /// loaders, so nested user lookups do not hit the store again.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let request = request(ctx)?;
        let include = RelationSelection::from_requested_fields(
            ctx.field().selection_set().map(|field| field.name()),
        );

        let rows = request
            .store
            .users(include)
            .await
            .map_err(to_graphql_error)?;
        tracing::debug!(users = rows.len(), ?include, "Eager user fetch");

        request.loaders.prime_users(&rows);
        Ok(rows.into_iter().map(|row| User::from(row.user)).collect())
    }

    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let user = request(ctx)?
            .loaders
            .users
            .load(id)
            .await
            .map_err(to_graphql_error)?;
        Ok(user.map(User::from))
    }
}
