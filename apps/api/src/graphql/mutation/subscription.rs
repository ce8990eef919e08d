//! Subscription edge mutations for Feedgraph GraphQL API
//!
//! - subscribeTo: Make a user follow an author
//! - unsubscribeFrom: Remove that edge again

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::types::User;
use crate::graphql::{request, to_graphql_error};
use crate::models::Subscription;

use super::DeleteOutcome;

/// Subscription edge mutations
#[derive(Default)]
pub struct SubscriptionMutation;

#[Object]
impl SubscriptionMutation {
    /// Subscribe `user_id` to `author_id`; returns the subscriber
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<User> {
        let request = request(ctx)?;

        request
            .store
            .create_subscription(Subscription::new(user_id, author_id))
            .await
            .map_err(to_graphql_error)?;
        request.loaders.subscription_changed(user_id, author_id);

        let subscriber = request
            .loaders
            .users
            .load(user_id)
            .await
            .map_err(to_graphql_error)?
            .ok_or_else(|| to_graphql_error(ApiError::not_found("user", user_id)))?;
        Ok(User::from(subscriber))
    }

    /// Remove the edge from `user_id` to `author_id`
    ///
    /// Returns `false` when there was no such edge.
    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let request = request(ctx)?;

        let removed = request
            .store
            .delete_subscription(Subscription::new(user_id, author_id))
            .await
            .map(|removed| removed.then_some(()));
        if DeleteOutcome::from(removed)
            .into_deleted("subscription", format!("{user_id}->{author_id}"))
            .is_none()
        {
            return Ok(false);
        }

        request.loaders.subscription_changed(user_id, author_id);
        Ok(true)
    }
}
