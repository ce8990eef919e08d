//! Profile mutations for Feedgraph GraphQL API

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::types::{MemberTypeId, Profile};
use crate::graphql::{request, to_graphql_error};
use crate::models::{CreateProfile, UpdateProfile};

use super::DeleteOutcome;

/// Input for creating a profile; a user has at most one
#[derive(Debug, Clone, InputObject)]
pub struct CreateProfileInput {
    pub user_id: Uuid,
    pub member_type_id: MemberTypeId,
    pub is_male: bool,
    pub year_of_birth: i32,
}

/// Input for changing a profile; omitted fields are left unchanged
#[derive(Debug, Clone, Default, InputObject)]
pub struct ChangeProfileInput {
    pub member_type_id: Option<MemberTypeId>,
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
}

/// Profile mutations
#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileInput) -> Result<Profile> {
        let request = request(ctx)?;

        let profile = request
            .store
            .create_profile(CreateProfile {
                user_id: dto.user_id,
                member_type_id: dto.member_type_id.into(),
                is_male: dto.is_male,
                year_of_birth: dto.year_of_birth,
            })
            .await
            .map_err(to_graphql_error)?;

        request.loaders.profile_created(&profile);
        Ok(Profile::from(profile))
    }

    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileInput,
    ) -> Result<Profile> {
        let request = request(ctx)?;

        let profile = request
            .store
            .update_profile(
                id,
                UpdateProfile {
                    member_type_id: dto.member_type_id.map(Into::into),
                    is_male: dto.is_male,
                    year_of_birth: dto.year_of_birth,
                },
            )
            .await
            .map_err(to_graphql_error)?;

        request.loaders.profile_written(&profile);
        Ok(Profile::from(profile))
    }

    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let request = request(ctx)?;

        let outcome = DeleteOutcome::from(request.store.delete_profile(id).await);
        let Some(profile) = outcome.into_deleted("profile", id) else {
            return Ok(false);
        };

        request.loaders.profile_written(&profile);
        Ok(true)
    }
}
