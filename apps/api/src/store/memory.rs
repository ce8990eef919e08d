//! In-memory store adapter
//!
//! [`MemoryStore`] keeps every table in process memory and enforces the same
//! constraints as the PostgreSQL schema (unique profile per user, unique
//! subscription edges, foreign keys, cascading user deletes).
//!
//! Every store call is recorded together with the keys it was given, so
//! tests can assert how many bulk fetches a query caused and with which
//! key sets. Read failures can be injected per operation to exercise
//! batch-level errors.
//!
//! # Lock Poisoning Recovery
//!
//! Locks are acquired with `unwrap_or_else(|e| e.into_inner())` so that a
//! panicking test does not poison the store for later assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{attach_edges, RelationSelection, Store, StoreError, StoreResult};
use crate::models::{
    CreatePost, CreateProfile, CreateUser, MemberType, MemberTypeId, Post, Profile, Subscription,
    UpdatePost, UpdateProfile, UpdateUser, User, UserWithEdges,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, Profile>,
    posts: HashMap<Uuid, Post>,
    member_types: HashMap<MemberTypeId, MemberType>,
    subscriptions: Vec<Subscription>,
}

/// In-memory [`Store`] with call accounting
///
/// All clones share the same tables and call log.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    calls: Arc<Mutex<HashMap<&'static str, Vec<Vec<String>>>>>,
    failing_reads: Arc<Mutex<HashMap<String, usize>>>,
}

impl MemoryStore {
    /// Create a store seeded with the standard member types
    pub fn new() -> Self {
        let store = Self::default();
        {
            let mut tables = store.write();
            for member_type in default_member_types() {
                tables.member_types.insert(member_type.id, member_type);
            }
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    // ========== Fixtures (not recorded) ==========

    /// Insert a user directly
    pub fn insert_user(&self, name: &str, balance: f64) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            balance,
        };
        self.write().users.insert(user.id, user.clone());
        user
    }

    /// Insert a post directly
    pub fn insert_post(&self, author_id: Uuid, title: &str) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: format!("{} content", title),
            author_id,
        };
        self.write().posts.insert(post.id, post.clone());
        post
    }

    /// Insert a profile directly
    pub fn insert_profile(&self, user_id: Uuid, member_type_id: MemberTypeId) -> Profile {
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id,
            is_male: true,
            year_of_birth: 1990,
            member_type_id,
        };
        self.write().profiles.insert(profile.id, profile.clone());
        profile
    }

    /// Insert a subscription edge directly
    pub fn insert_subscription(&self, subscriber_id: Uuid, author_id: Uuid) {
        self.write()
            .subscriptions
            .push(Subscription::new(subscriber_id, author_id));
    }

    /// Whether the edge is currently stored
    pub fn has_subscription(&self, subscriber_id: Uuid, author_id: Uuid) -> bool {
        self.read()
            .subscriptions
            .contains(&Subscription::new(subscriber_id, author_id))
    }

    /// Number of stored edges
    pub fn subscription_count(&self) -> usize {
        self.read().subscriptions.len()
    }

    // ========== Call accounting ==========

    /// How many times `operation` was invoked
    pub fn calls(&self, operation: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(operation).map_or(0, Vec::len)
    }

    /// The key sets passed to each invocation of `operation`, in call order
    pub fn recorded_keys(&self, operation: &str) -> Vec<Vec<String>> {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(operation).cloned().unwrap_or_default()
    }

    /// Total number of read operations recorded
    pub fn total_reads(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls
            .iter()
            .filter(|(operation, _)| !is_write(operation))
            .map(|(_, invocations)| invocations.len())
            .sum()
    }

    /// Make the next `count` calls of the read `operation` fail with
    /// [`StoreError::Unavailable`]
    pub fn fail_next(&self, operation: &str, count: usize) {
        self.failing_reads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(operation.to_string(), count);
    }

    fn record<K: ToString>(&self, operation: &'static str, keys: &[K]) {
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls
            .entry(operation)
            .or_default()
            .push(keys.iter().map(ToString::to_string).collect());
    }

    fn begin_read<K: ToString>(&self, operation: &'static str, keys: &[K]) -> StoreResult<()> {
        self.record(operation, keys);
        let injected = {
            let mut failing = self.failing_reads.lock().unwrap_or_else(|e| e.into_inner());
            match failing.get_mut(operation) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };
        if injected {
            tracing::debug!(operation, "Injected store read failure");
            return Err(StoreError::Unavailable(format!(
                "injected failure in {}",
                operation
            )));
        }
        Ok(())
    }

    fn begin_write(&self, operation: &'static str) {
        self.record::<String>(operation, &[]);
    }
}

fn is_write(operation: &str) -> bool {
    ["create_", "update_", "delete_"]
        .iter()
        .any(|prefix| operation.starts_with(prefix))
}

/// The member types seeded by the initial migration
pub(crate) fn default_member_types() -> [MemberType; 2] {
    [
        MemberType {
            id: MemberTypeId::Basic,
            discount: 2.3,
            posts_limit_per_month: 20,
        },
        MemberType {
            id: MemberTypeId::Business,
            discount: 7.7,
            posts_limit_per_month: 100,
        },
    ]
}

fn sorted_users(tables: &Tables) -> Vec<User> {
    let mut users: Vec<User> = tables.users.values().cloned().collect();
    users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    users
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.begin_read::<String>("ping", &[])
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        self.begin_read("users_by_ids", ids)?;
        let tables = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        self.begin_read("profiles_by_user_ids", user_ids)?;
        let tables = self.read();
        Ok(tables
            .profiles
            .values()
            .filter(|profile| user_ids.contains(&profile.user_id))
            .cloned()
            .collect())
    }

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        self.begin_read("posts_by_author_ids", author_ids)?;
        let tables = self.read();
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| author_ids.contains(&post.author_id))
            .cloned()
            .collect();
        posts.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(posts)
    }

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> StoreResult<Vec<MemberType>> {
        self.begin_read("member_types_by_ids", ids)?;
        let tables = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.member_types.get(id).cloned())
            .collect())
    }

    async fn subscriptions_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> StoreResult<Vec<Subscription>> {
        self.begin_read("subscriptions_by_subscriber_ids", subscriber_ids)?;
        let tables = self.read();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|edge| subscriber_ids.contains(&edge.subscriber_id))
            .copied()
            .collect())
    }

    async fn subscriptions_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> StoreResult<Vec<Subscription>> {
        self.begin_read("subscriptions_by_author_ids", author_ids)?;
        let tables = self.read();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|edge| author_ids.contains(&edge.author_id))
            .copied()
            .collect())
    }

    async fn users(&self, include: RelationSelection) -> StoreResult<Vec<UserWithEdges>> {
        self.begin_read::<String>("users", &[])?;
        let tables = self.read();
        let users = sorted_users(&tables);
        if !include.any() {
            return Ok(users.into_iter().map(UserWithEdges::bare).collect());
        }
        Ok(attach_edges(users, &tables.subscriptions, include))
    }

    async fn posts(&self) -> StoreResult<Vec<Post>> {
        self.begin_read::<String>("posts", &[])?;
        let mut posts: Vec<Post> = self.read().posts.values().cloned().collect();
        posts.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        self.begin_read("post", &[id])?;
        Ok(self.read().posts.get(&id).cloned())
    }

    async fn profiles(&self) -> StoreResult<Vec<Profile>> {
        self.begin_read::<String>("profiles", &[])?;
        let mut profiles: Vec<Profile> = self.read().profiles.values().cloned().collect();
        profiles.sort_by_key(|profile| profile.id);
        Ok(profiles)
    }

    async fn profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        self.begin_read("profile", &[id])?;
        Ok(self.read().profiles.get(&id).cloned())
    }

    async fn member_types(&self) -> StoreResult<Vec<MemberType>> {
        self.begin_read::<String>("member_types", &[])?;
        let mut member_types: Vec<MemberType> =
            self.read().member_types.values().cloned().collect();
        member_types.sort_by_key(|member_type| member_type.id.as_str());
        Ok(member_types)
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        self.begin_write("create_user");
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            balance: input.balance,
        };
        self.write().users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> StoreResult<User> {
        self.begin_write("update_user");
        let mut tables = self.write();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(balance) = changes.balance {
            user.balance = balance;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.begin_write("delete_user");
        let mut tables = self.write();
        let Some(user) = tables.users.remove(&id) else {
            return Ok(None);
        };
        tables.profiles.retain(|_, profile| profile.user_id != id);
        tables.posts.retain(|_, post| post.author_id != id);
        tables
            .subscriptions
            .retain(|edge| edge.subscriber_id != id && edge.author_id != id);
        Ok(Some(user))
    }

    async fn create_post(&self, input: CreatePost) -> StoreResult<Post> {
        self.begin_write("create_post");
        let mut tables = self.write();
        if !tables.users.contains_key(&input.author_id) {
            return Err(StoreError::ForeignKeyViolation(
                "posts_author_id_fkey".to_string(),
            ));
        }
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, changes: UpdatePost) -> StoreResult<Post> {
        self.begin_write("update_post");
        let mut tables = self.write();
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("post", id))?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        self.begin_write("delete_post");
        Ok(self.write().posts.remove(&id))
    }

    async fn create_profile(&self, input: CreateProfile) -> StoreResult<Profile> {
        self.begin_write("create_profile");
        let mut tables = self.write();
        if !tables.users.contains_key(&input.user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "profiles_user_id_fkey".to_string(),
            ));
        }
        if tables
            .profiles
            .values()
            .any(|profile| profile.user_id == input.user_id)
        {
            return Err(StoreError::UniqueViolation(
                "profiles_user_id_key".to_string(),
            ));
        }
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id,
        };
        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, changes: UpdateProfile) -> StoreResult<Profile> {
        self.begin_write("update_profile");
        let mut tables = self.write();
        let profile = tables
            .profiles
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("profile", id))?;
        if let Some(member_type_id) = changes.member_type_id {
            profile.member_type_id = member_type_id;
        }
        if let Some(is_male) = changes.is_male {
            profile.is_male = is_male;
        }
        if let Some(year_of_birth) = changes.year_of_birth {
            profile.year_of_birth = year_of_birth;
        }
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        self.begin_write("delete_profile");
        Ok(self.write().profiles.remove(&id))
    }

    async fn create_subscription(&self, edge: Subscription) -> StoreResult<()> {
        self.begin_write("create_subscription");
        let mut tables = self.write();
        if !tables.users.contains_key(&edge.subscriber_id)
            || !tables.users.contains_key(&edge.author_id)
        {
            return Err(StoreError::ForeignKeyViolation(
                "subscribers_on_authors_fkey".to_string(),
            ));
        }
        if tables.subscriptions.contains(&edge) {
            return Err(StoreError::DuplicateEdge {
                subscriber_id: edge.subscriber_id,
                author_id: edge.author_id,
            });
        }
        tables.subscriptions.push(edge);
        Ok(())
    }

    async fn delete_subscription(&self, edge: Subscription) -> StoreResult<bool> {
        self.begin_write("delete_subscription");
        let mut tables = self.write();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|existing| *existing != edge);
        Ok(tables.subscriptions.len() < before)
    }
}
