//! Batch loaders for GraphQL relation fields
//!
//! Each loader batches key lookups issued by sibling resolvers into a single
//! store call, solving the N+1 problem for relationship fields.
//!
//! There are two kinds of loaders:
//! - Single-entity loaders: resolve a key to at most one row
//! - Collection loaders: resolve a parent key to a (possibly empty) list
//!
//! A fresh [`Loaders`] set is built for every HTTP request and discarded
//! afterwards, so caches never leak between requests.

mod member_type;
mod posts_by_author;
mod profile;
mod subscriptions;
mod user;

pub use member_type::MemberTypeLoader;
pub use posts_by_author::PostsByAuthorLoader;
pub use profile::ProfileLoader;
pub use subscriptions::{SubscribedToLoader, SubscribersLoader};
pub use user::UserLoader;

use feedgraph_shared_config::LoaderConfig;
use uuid::Uuid;

use crate::batch::{BatchLoader, Loader};
use crate::models::{MemberTypeId, UserWithEdges};
use crate::store::SharedStore;

/// The per-request loader set
pub struct Loaders {
    pub users: BatchLoader<Uuid, UserLoader>,
    pub profiles: BatchLoader<Uuid, ProfileLoader>,
    pub posts: BatchLoader<Uuid, PostsByAuthorLoader>,
    pub member_types: BatchLoader<MemberTypeId, MemberTypeLoader>,
    pub subscribed_to: BatchLoader<Uuid, SubscribedToLoader>,
    pub subscribers: BatchLoader<Uuid, SubscribersLoader>,
}

impl Loaders {
    /// Build an independent loader set with empty caches
    pub fn build(store: SharedStore, config: &LoaderConfig) -> Self {
        Self {
            users: batch_loader(UserLoader::new(store.clone()), config),
            profiles: batch_loader(ProfileLoader::new(store.clone()), config),
            posts: batch_loader(PostsByAuthorLoader::new(store.clone()), config),
            member_types: batch_loader(MemberTypeLoader::new(store.clone()), config),
            subscribed_to: batch_loader(SubscribedToLoader::new(store.clone()), config),
            subscribers: batch_loader(SubscribersLoader::new(store), config),
        }
    }

    /// Seed the caches with users returned by an eager root fetch.
    ///
    /// Edge lists are primed only when they were fetched; a relation that
    /// was not selected is left for its loader to resolve on demand.
    pub fn prime_users(&self, rows: &[UserWithEdges]) {
        for row in rows {
            let id = row.user.id;
            self.users.prime(id, row.user.clone());
            if let Some(authors) = &row.subscribed_to {
                self.subscribed_to.prime(id, authors.clone());
            }
            if let Some(subscribers) = &row.subscribers {
                self.subscribers.prime(id, subscribers.clone());
            }
        }
    }
}

fn batch_loader<K, L>(loader: L, config: &LoaderConfig) -> BatchLoader<K, L>
where
    K: Send + Sync + std::hash::Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    BatchLoader::with_options(loader, config.batch_delay(), config.max_batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::User;
    use crate::store::MemoryStore;

    fn loaders(store: &MemoryStore) -> Loaders {
        Loaders::build(Arc::new(store.clone()), &LoaderConfig::default())
    }

    #[tokio::test]
    async fn test_sibling_loads_batch_into_one_store_call() {
        let store = MemoryStore::new();
        let ada = store.insert_user("ada", 1.0);
        let bob = store.insert_user("bob", 2.0);
        let loaders = loaders(&store);

        let (a, b, again) = tokio::join!(
            loaders.users.load(ada.id),
            loaders.users.load(bob.id),
            loaders.users.load(ada.id)
        );

        assert_eq!(a.unwrap(), Some(ada.clone()));
        assert_eq!(b.unwrap(), Some(bob));
        assert_eq!(again.unwrap(), Some(ada));
        assert_eq!(store.calls("users_by_ids"), 1);
        assert_eq!(store.recorded_keys("users_by_ids")[0].len(), 2);
    }

    #[tokio::test]
    async fn test_author_without_posts_gets_empty_list() {
        let store = MemoryStore::new();
        let ada = store.insert_user("ada", 0.0);
        let bob = store.insert_user("bob", 0.0);
        store.insert_post(ada.id, "first");
        let loaders = loaders(&store);

        let results = loaders.posts.load_many([ada.id, bob.id]).await;

        let lists: Vec<Vec<_>> = results
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .collect();
        assert_eq!(lists[0].len(), 1);
        assert!(lists[1].is_empty());
        assert_eq!(store.calls("posts_by_author_ids"), 1);
    }

    #[tokio::test]
    async fn test_profiles_resolve_by_owner() {
        let store = MemoryStore::new();
        let ada = store.insert_user("ada", 0.0);
        let bob = store.insert_user("bob", 0.0);
        let profile = store.insert_profile(ada.id, MemberTypeId::Business);
        let loaders = loaders(&store);

        assert_eq!(loaders.profiles.load(ada.id).await.unwrap(), Some(profile));
        assert_eq!(loaders.profiles.load(bob.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prime_users_covers_fetched_relations_only() {
        let store = MemoryStore::new();
        let loaders = loaders(&store);
        let user = User {
            id: Uuid::new_v4(),
            name: "ghost".to_string(),
            balance: 0.0,
        };
        let row = UserWithEdges {
            user: user.clone(),
            subscribed_to: Some(vec![]),
            subscribers: None,
        };

        loaders.prime_users(&[row]);

        assert_eq!(loaders.users.load(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            loaders.subscribed_to.load(user.id).await.unwrap(),
            Some(vec![])
        );
        assert_eq!(store.calls("users_by_ids"), 0);
        assert_eq!(store.calls("subscriptions_by_subscriber_ids"), 0);

        loaders.subscribers.load(user.id).await.unwrap();
        assert_eq!(store.calls("subscriptions_by_author_ids"), 1);
    }

    #[tokio::test]
    async fn test_loader_sets_are_independent() {
        let store = MemoryStore::new();
        let ada = store.insert_user("ada", 0.0);

        let first = loaders(&store);
        let second = loaders(&store);
        first.users.load(ada.id).await.unwrap();
        second.users.load(ada.id).await.unwrap();

        assert_eq!(store.calls("users_by_ids"), 2);
    }
}
