//! Per-request resolver context

use std::sync::Arc;

use feedgraph_shared_config::LoaderConfig;

use super::loaders::Loaders;
use crate::store::SharedStore;

/// Everything a resolver needs for one external request.
///
/// Built once at the request boundary and handed to the executor as request
/// data. Every operation of a batched request sees the same instance, so a
/// mutation's cache invalidation is visible to later queries in the batch.
#[derive(Clone)]
pub struct RequestContext {
    pub store: SharedStore,
    pub loaders: Arc<Loaders>,
}

impl RequestContext {
    /// Create a context with a fresh loader set
    pub fn new(store: SharedStore, config: &LoaderConfig) -> Self {
        let loaders = Arc::new(Loaders::build(store.clone(), config));
        Self { store, loaders }
    }
}
