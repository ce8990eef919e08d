//! PostgreSQL store adapter
//!
//! Composes the repositories into the [`Store`] interface and translates
//! their `sqlx` failures into [`StoreError`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{attach_edges, RelationSelection, Store, StoreError, StoreResult};
use crate::models::{
    CreatePost, CreateProfile, CreateUser, MemberType, MemberTypeId, Post, Profile, Subscription,
    UpdatePost, UpdateProfile, UpdateUser, User, UserWithEdges,
};
use crate::repositories::utils::classify_write_error;
use crate::repositories::{
    MemberTypeRepository, PostRepository, ProfileRepository, SubscriptionRepository,
    UserRepository,
};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    users: UserRepository,
    profiles: ProfileRepository,
    posts: PostRepository,
    member_types: MemberTypeRepository,
    subscriptions: SubscriptionRepository,
}

impl PgStore {
    /// Create a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            member_types: MemberTypeRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(self.users.find_by_ids(ids).await?)
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        Ok(self.profiles.find_by_user_ids(user_ids).await?)
    }

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        Ok(self.posts.find_by_author_ids(author_ids).await?)
    }

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> StoreResult<Vec<MemberType>> {
        Ok(self.member_types.find_by_ids(ids).await?)
    }

    async fn subscriptions_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> StoreResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .find_by_subscriber_ids(subscriber_ids)
            .await?)
    }

    async fn subscriptions_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> StoreResult<Vec<Subscription>> {
        Ok(self.subscriptions.find_by_author_ids(author_ids).await?)
    }

    async fn users(&self, include: RelationSelection) -> StoreResult<Vec<UserWithEdges>> {
        let users = self.users.find_all().await?;
        if !include.any() {
            return Ok(users.into_iter().map(UserWithEdges::bare).collect());
        }

        let edges = self.subscriptions.find_all().await?;
        Ok(attach_edges(users, &edges, include))
    }

    async fn posts(&self) -> StoreResult<Vec<Post>> {
        Ok(self.posts.find_all().await?)
    }

    async fn post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self.posts.find_by_id(id).await?)
    }

    async fn profiles(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.profiles.find_all().await?)
    }

    async fn profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.find_by_id(id).await?)
    }

    async fn member_types(&self) -> StoreResult<Vec<MemberType>> {
        Ok(self.member_types.find_all().await?)
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        self.users
            .create(&input)
            .await
            .map_err(classify_write_error)
    }

    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> StoreResult<User> {
        self.users
            .update(id, &changes)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.users.delete(id).await.map_err(classify_write_error)
    }

    async fn create_post(&self, input: CreatePost) -> StoreResult<Post> {
        self.posts
            .create(&input)
            .await
            .map_err(classify_write_error)
    }

    async fn update_post(&self, id: Uuid, changes: UpdatePost) -> StoreResult<Post> {
        self.posts
            .update(id, &changes)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| StoreError::not_found("post", id))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        self.posts.delete(id).await.map_err(classify_write_error)
    }

    async fn create_profile(&self, input: CreateProfile) -> StoreResult<Profile> {
        self.profiles
            .create(&input)
            .await
            .map_err(classify_write_error)
    }

    async fn update_profile(&self, id: Uuid, changes: UpdateProfile) -> StoreResult<Profile> {
        self.profiles
            .update(id, &changes)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| StoreError::not_found("profile", id))
    }

    async fn delete_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        self.profiles.delete(id).await.map_err(classify_write_error)
    }

    async fn create_subscription(&self, edge: Subscription) -> StoreResult<()> {
        self.subscriptions
            .create(edge)
            .await
            .map_err(|e| match classify_write_error(e) {
                StoreError::UniqueViolation(_) => StoreError::DuplicateEdge {
                    subscriber_id: edge.subscriber_id,
                    author_id: edge.author_id,
                },
                other => other,
            })
    }

    async fn delete_subscription(&self, edge: Subscription) -> StoreResult<bool> {
        self.subscriptions
            .delete(edge)
            .await
            .map_err(classify_write_error)
    }
}
