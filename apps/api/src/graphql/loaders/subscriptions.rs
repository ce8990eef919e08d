//! Subscription edge loaders
//!
//! The subscription relation is a set of (subscriber, author) pairs. These
//! loaders resolve one side of the relation to the list of user IDs on the
//! other side; the users themselves are then resolved through
//! [`super::UserLoader`]. Like posts-by-author, every requested key gets an
//! entry, empty when the user has no edges.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::batch::Loader;
use crate::store::{SharedStore, StoreError};

/// Authors each subscriber follows (`User.userSubscribedTo`)
#[derive(Clone)]
pub struct SubscribedToLoader {
    store: SharedStore,
}

impl SubscribedToLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for SubscribedToLoader {
    type Value = Vec<Uuid>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let edges = self
            .store
            .subscriptions_by_subscriber_ids(keys)
            .await
            .map_err(Arc::new)?;

        Ok(group(keys, edges.into_iter().map(|e| (e.subscriber_id, e.author_id))))
    }
}

/// Subscribers of each author (`User.subscribedToUser`)
#[derive(Clone)]
pub struct SubscribersLoader {
    store: SharedStore,
}

impl SubscribersLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for SubscribersLoader {
    type Value = Vec<Uuid>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let edges = self
            .store
            .subscriptions_by_author_ids(keys)
            .await
            .map_err(Arc::new)?;

        Ok(group(keys, edges.into_iter().map(|e| (e.author_id, e.subscriber_id))))
    }
}

fn group(
    keys: &[Uuid],
    pairs: impl Iterator<Item = (Uuid, Uuid)>,
) -> HashMap<Uuid, Vec<Uuid>> {
    let mut result: HashMap<Uuid, Vec<Uuid>> =
        keys.iter().map(|key| (*key, Vec::new())).collect();
    for (key, other) in pairs {
        result.entry(key).or_default().push(other);
    }
    result
}
