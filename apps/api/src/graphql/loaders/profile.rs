//! Profile-by-user loader
//!
//! Profiles are keyed by the owning user's ID, which is how the `User.profile`
//! field reaches them. A user without a profile resolves to `None`.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::batch::Loader;
use crate::models::Profile;
use crate::store::{SharedStore, StoreError};

/// Bulk fetch of profiles by owning user ID
#[derive(Clone)]
pub struct ProfileLoader {
    store: SharedStore,
}

impl ProfileLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for ProfileLoader {
    type Value = Profile;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let profiles = self
            .store
            .profiles_by_user_ids(keys)
            .await
            .map_err(Arc::new)?;

        Ok(profiles.into_iter().map(|p| (p.user_id, p)).collect())
    }
}
