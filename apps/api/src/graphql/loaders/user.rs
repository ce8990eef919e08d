//! User loader
//!
//! Batches user ID lookups into one `users_by_ids` store call per batch.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::batch::Loader;
use crate::models::User;
use crate::store::{SharedStore, StoreError};

/// Bulk fetch of users by ID
#[derive(Clone)]
pub struct UserLoader {
    store: SharedStore,
}

impl UserLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for UserLoader {
    type Value = User;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let users = self.store.users_by_ids(keys).await.map_err(Arc::new)?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
