//! Entity store adapter
//!
//! The batch loaders never talk to the database directly. They go through
//! the [`Store`] trait, which exposes "fetch many by key" primitives per
//! entity type plus the writes the mutation resolvers need.
//!
//! Two adapters are provided:
//! - [`PgStore`]: PostgreSQL via the repository layer
//! - [`MemoryStore`]: in-memory tables with call accounting, used by tests
//!   and for running the API without a database

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreatePost, CreateProfile, CreateUser, MemberType, MemberTypeId, Post, Profile, Subscription,
    UpdatePost, UpdateProfile, UpdateUser, User, UserWithEdges,
};

/// Errors surfaced by store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database failure (connection, query, decoding)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The row targeted by an update does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The subscription edge already exists
    #[error("{subscriber_id} is already subscribed to {author_id}")]
    DuplicateEdge { subscriber_id: Uuid, author_id: Uuid },

    /// A unique constraint other than the edge key was violated
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),

    /// The store cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to the store used by every request
pub type SharedStore = Arc<dyn Store>;

/// Which subscription edge lists the eager user fetch should include
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationSelection {
    /// Include the users subscribing to each user (`subscribedToUser`)
    pub subscribers: bool,

    /// Include the authors each user subscribes to (`userSubscribedTo`)
    pub subscribed_to: bool,
}

impl RelationSelection {
    /// Both edge lists
    pub fn all() -> Self {
        Self {
            subscribers: true,
            subscribed_to: true,
        }
    }

    /// Whether any edge list is requested
    pub fn any(&self) -> bool {
        self.subscribers || self.subscribed_to
    }
}

/// Attach the selected edge lists to each user.
///
/// Users without edges get an empty list for every selected relation, so a
/// selected relation is never left `None`.
pub(crate) fn attach_edges(
    users: Vec<User>,
    edges: &[Subscription],
    include: RelationSelection,
) -> Vec<UserWithEdges> {
    let mut subscribed_to: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut subscribers: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for edge in edges {
        subscribed_to
            .entry(edge.subscriber_id)
            .or_default()
            .push(edge.author_id);
        subscribers
            .entry(edge.author_id)
            .or_default()
            .push(edge.subscriber_id);
    }

    users
        .into_iter()
        .map(|user| {
            let id = user.id;
            UserWithEdges {
                user,
                subscribed_to: include
                    .subscribed_to
                    .then(|| subscribed_to.remove(&id).unwrap_or_default()),
                subscribers: include
                    .subscribers
                    .then(|| subscribers.remove(&id).unwrap_or_default()),
            }
        })
        .collect()
}

/// Bulk-fetch and write primitives over the relational store.
///
/// Bulk reads take a key slice and return only the rows that exist, in no
/// particular order; callers match results back to keys themselves.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Check that the store is reachable
    async fn ping(&self) -> StoreResult<()>;

    // ========== Bulk reads used by the loaders ==========

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>>;

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> StoreResult<Vec<Post>>;

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> StoreResult<Vec<MemberType>>;

    /// Edges whose subscriber is one of `subscriber_ids`
    async fn subscriptions_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> StoreResult<Vec<Subscription>>;

    /// Edges whose author is one of `author_ids`
    async fn subscriptions_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> StoreResult<Vec<Subscription>>;

    // ========== Root reads ==========

    /// All users, with the selected edge lists attached
    async fn users(&self, include: RelationSelection) -> StoreResult<Vec<UserWithEdges>>;

    async fn posts(&self) -> StoreResult<Vec<Post>>;

    async fn post(&self, id: Uuid) -> StoreResult<Option<Post>>;

    async fn profiles(&self) -> StoreResult<Vec<Profile>>;

    async fn profile(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    async fn member_types(&self) -> StoreResult<Vec<MemberType>>;

    // ========== Writes ==========

    async fn create_user(&self, input: CreateUser) -> StoreResult<User>;

    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> StoreResult<User>;

    /// Delete a user; `None` when no such user exists
    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create_post(&self, input: CreatePost) -> StoreResult<Post>;

    async fn update_post(&self, id: Uuid, changes: UpdatePost) -> StoreResult<Post>;

    async fn delete_post(&self, id: Uuid) -> StoreResult<Option<Post>>;

    async fn create_profile(&self, input: CreateProfile) -> StoreResult<Profile>;

    async fn update_profile(&self, id: Uuid, changes: UpdateProfile) -> StoreResult<Profile>;

    async fn delete_profile(&self, id: Uuid) -> StoreResult<Option<Profile>>;

    async fn create_subscription(&self, edge: Subscription) -> StoreResult<()>;

    /// Remove an edge; `false` when the edge did not exist
    async fn delete_subscription(&self, edge: Subscription) -> StoreResult<bool>;
}
