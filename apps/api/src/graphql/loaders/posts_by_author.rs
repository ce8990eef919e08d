//! Posts-by-author loader
//!
//! This loader batches author ID lookups into a single store call and groups
//! the returned posts by author. Every requested author gets an entry, so an
//! author without posts resolves to an empty list rather than a miss.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::batch::Loader;
use crate::models::Post;
use crate::store::{SharedStore, StoreError};

/// Bulk fetch of posts grouped by author
#[derive(Clone)]
pub struct PostsByAuthorLoader {
    store: SharedStore,
}

impl PostsByAuthorLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for PostsByAuthorLoader {
    type Value = Vec<Post>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let posts = self
            .store
            .posts_by_author_ids(keys)
            .await
            .map_err(Arc::new)?;

        let mut result: HashMap<Uuid, Vec<Post>> = HashMap::new();
        for post in posts {
            result.entry(post.author_id).or_default().push(post);
        }

        // Ensure all requested keys have an entry (even if empty)
        for key in keys {
            result.entry(*key).or_default();
        }

        Ok(result)
    }
}
