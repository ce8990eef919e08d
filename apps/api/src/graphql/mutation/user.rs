//! User mutations for Feedgraph GraphQL API
//!
//! - createUser: Create a user
//! - changeUser: Update a user's name or balance
//! - deleteUser: Delete a user with its profile, posts and subscriptions

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::types::User;
use crate::graphql::{request, to_graphql_error};
use crate::models::{CreateUser, UpdateUser};

use super::DeleteOutcome;

/// Maximum length of a user name
const MAX_NAME_LENGTH: usize = 255;

/// Input for creating a user
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub balance: f64,
}

/// Input for changing a user; omitted fields are left unchanged
#[derive(Debug, Clone, Default, InputObject)]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// User mutations
#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create a new user
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserInput) -> Result<User> {
        validate_name(&dto.name).map_err(to_graphql_error)?;
        let request = request(ctx)?;

        let user = request
            .store
            .create_user(CreateUser {
                name: dto.name,
                balance: dto.balance,
            })
            .await
            .map_err(to_graphql_error)?;

        request.loaders.user_created(&user);
        tracing::info!(user_id = %user.id, "User created");
        Ok(User::from(user))
    }

    /// Change a user's fields
    async fn change_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeUserInput,
    ) -> Result<User> {
        if let Some(name) = &dto.name {
            validate_name(name).map_err(to_graphql_error)?;
        }
        let request = request(ctx)?;

        let user = request
            .store
            .update_user(
                id,
                UpdateUser {
                    name: dto.name,
                    balance: dto.balance,
                },
            )
            .await
            .map_err(to_graphql_error)?;

        request.loaders.user_changed(id);
        Ok(User::from(user))
    }

    /// Delete a user
    ///
    /// Returns `false` when the user does not exist or the delete failed.
    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let request = request(ctx)?;

        let outcome = DeleteOutcome::from(request.store.delete_user(id).await);
        let Some(user) = outcome.into_deleted("user", id) else {
            return Ok(false);
        };

        request.loaders.user_deleted(user.id);
        tracing::info!(user_id = %id, "User deleted");
        Ok(true)
    }
}
