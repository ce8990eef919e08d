//! Member type loader

use std::collections::HashMap;
use std::sync::Arc;

use crate::batch::Loader;
use crate::models::{MemberType, MemberTypeId};
use crate::store::{SharedStore, StoreError};

/// Bulk fetch of member types by ID
#[derive(Clone)]
pub struct MemberTypeLoader {
    store: SharedStore,
}

impl MemberTypeLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<MemberTypeId> for MemberTypeLoader {
    type Value = MemberType;
    type Error = Arc<StoreError>;

    async fn load(
        &self,
        keys: &[MemberTypeId],
    ) -> Result<HashMap<MemberTypeId, Self::Value>, Self::Error> {
        let member_types = self
            .store
            .member_types_by_ids(keys)
            .await
            .map_err(Arc::new)?;

        Ok(member_types.into_iter().map(|m| (m.id, m)).collect())
    }
}
