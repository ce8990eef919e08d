//! Request-scoped batching and caching of keyed fetches
//!
//! A [`BatchLoader`] wraps a [`Loader`] (a bulk fetch by key set) and turns
//! many concurrent single-key `load` calls into one bulk call per batch
//! window. Keys requested while a batch is open are deduplicated; every
//! waiter for a key receives the same result.
//!
//! Results are memoized per key for the lifetime of the loader, including
//! misses, so a missing row is fetched at most once. Failures are delivered
//! to every waiter of the failed batch and are never cached.
//!
//! A loader is meant to live for one request. It is not `Clone`; share it
//! behind an `Arc` (see [`crate::graphql::loaders::Loaders`]).

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use tokio::sync::Notify;

/// Default batch window
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1);

/// Default upper bound on keys per bulk fetch
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// A bulk fetch by key set.
///
/// Implementations return an entry for every key they found. Keys absent
/// from the returned map resolve to `None`; this is how a bulk fetch reports
/// a per-key miss without failing the batch.
pub trait Loader<K>: Send + Sync + 'static
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
{
    type Value: Send + Sync + Clone + 'static;
    type Error: Send + Sync + Clone + 'static;

    fn load(
        &self,
        keys: &[K],
    ) -> impl Future<Output = Result<HashMap<K, Self::Value>, Self::Error>> + Send;
}

type BatchResult<K, V, E> = Result<Arc<HashMap<K, V>>, E>;
type BatchFuture<K, V, E> = Shared<BoxFuture<'static, BatchResult<K, V, E>>>;
type LoaderFuture<K, L> = BatchFuture<K, <L as Loader<K>>::Value, <L as Loader<K>>::Error>;

struct OpenBatch<F> {
    id: u64,
    full: Arc<Notify>,
    future: F,
}

struct State<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    /// Settled results, misses included
    cache: HashMap<K, Option<L::Value>>,
    /// Keys waiting on a batch, tagged with the batch id
    pending: HashMap<K, (u64, LoaderFuture<K, L>)>,
    /// The batch still accepting keys
    open: Option<OpenBatch<LoaderFuture<K, L>>>,
    /// Keys of batches that have not been dispatched yet, in request order
    batches: HashMap<u64, Vec<K>>,
    next_batch: u64,
}

impl<K, L> State<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            pending: HashMap::new(),
            open: None,
            batches: HashMap::new(),
            next_batch: 0,
        }
    }
}

struct Inner<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    loader: L,
    name: &'static str,
    delay: Duration,
    max_batch_size: usize,
    state: Mutex<State<K, L>>,
}

impl<K, L> Inner<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    fn lock(&self) -> MutexGuard<'_, State<K, L>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add `key` to the open batch, opening one if needed.
    fn enqueue(self: &Arc<Self>, state: &mut State<K, L>, key: K) -> LoaderFuture<K, L> {
        let open = state
            .open
            .as_ref()
            .map(|open| (open.id, Arc::clone(&open.full), open.future.clone()));
        let (id, full, future) = match open {
            Some(open) => open,
            None => {
                let id = state.next_batch;
                state.next_batch += 1;

                let full = Arc::new(Notify::new());
                let future = Arc::clone(self).batch(id, Arc::clone(&full));
                state.open = Some(OpenBatch {
                    id,
                    full: Arc::clone(&full),
                    future: future.clone(),
                });
                (id, full, future)
            }
        };

        let keys = state.batches.entry(id).or_default();
        keys.push(key.clone());
        let is_full = keys.len() >= self.max_batch_size;
        state.pending.insert(key, (id, future.clone()));

        if is_full {
            state.open = None;
            full.notify_one();
        }

        future
    }

    fn batch(self: Arc<Self>, id: u64, full: Arc<Notify>) -> LoaderFuture<K, L> {
        let delay = self.delay;
        async move {
            if delay.is_zero() {
                // Waiters polling the shared future must not advance the window
                let window = tokio::spawn(Arc::clone(&self).settle(id));
                if let Err(err) = window.await {
                    tracing::warn!(loader = self.name, batch = id, error = %err, "Batch window aborted");
                }
            } else {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = full.notified() => {}
                }
            }
            self.dispatch(id).await
        }
        .boxed()
        .shared()
    }

    /// Yield until batch `id` stops growing or is closed for being full.
    async fn settle(self: Arc<Self>, id: u64) {
        let mut seen = self.batch_len(id);
        loop {
            tokio::task::yield_now().await;
            let len = self.batch_len(id);
            if len == seen || !self.is_open(id) {
                return;
            }
            seen = len;
        }
    }

    fn batch_len(&self, id: u64) -> usize {
        self.lock().batches.get(&id).map_or(0, Vec::len)
    }

    fn is_open(&self, id: u64) -> bool {
        self.lock().open.as_ref().is_some_and(|open| open.id == id)
    }

    async fn dispatch(&self, id: u64) -> BatchResult<K, L::Value, L::Error> {
        let keys = {
            let mut state = self.lock();
            if state.open.as_ref().is_some_and(|open| open.id == id) {
                state.open = None;
            }
            state.batches.remove(&id).unwrap_or_default()
        };

        tracing::debug!(loader = self.name, batch = id, keys = keys.len(), "Dispatching batch");

        let result = if keys.is_empty() {
            Ok(HashMap::new())
        } else {
            self.loader.load(&keys).await
        };

        let mut guard = self.lock();
        let state = &mut *guard;
        for key in &keys {
            // A key cleared mid-flight may already belong to a newer batch
            if !matches!(state.pending.get(key), Some((batch, _)) if *batch == id) {
                continue;
            }
            state.pending.remove(key);
            if let Ok(values) = &result {
                state.cache.insert(key.clone(), values.get(key).cloned());
            }
        }
        drop(guard);

        if result.is_err() {
            tracing::warn!(loader = self.name, batch = id, keys = keys.len(), "Batch fetch failed");
        }

        result.map(Arc::new)
    }
}

/// Batching, deduplicating, memoizing front for a [`Loader`]
pub struct BatchLoader<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    inner: Arc<Inner<K, L>>,
}

impl<K, L> BatchLoader<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    /// Create a loader with the default window and batch size
    pub fn new(loader: L) -> Self {
        Self::with_options(loader, DEFAULT_DELAY, DEFAULT_MAX_BATCH_SIZE)
    }

    /// Create a loader with an explicit window and batch size.
    ///
    /// A zero `delay` dispatches once a scheduler pass adds no more keys to
    /// the batch. A batch that reaches `max_batch_size` keys dispatches
    /// immediately.
    pub fn with_options(loader: L, delay: Duration, max_batch_size: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                name: short_type_name::<L>(),
                delay,
                max_batch_size: max_batch_size.max(1),
                state: Mutex::new(State::new()),
            }),
        }
    }

    /// The wrapped bulk fetch
    pub fn loader(&self) -> &L {
        &self.inner.loader
    }

    /// Resolve one key; `Ok(None)` when the store has no such row.
    pub async fn load(&self, key: K) -> Result<Option<L::Value>, L::Error> {
        let future = {
            let mut guard = self.inner.lock();
            let state = &mut *guard;
            if let Some(value) = state.cache.get(&key) {
                return Ok(value.clone());
            }
            let in_flight = state.pending.get(&key).map(|(_, future)| future.clone());
            match in_flight {
                Some(future) => future,
                None => self.inner.enqueue(state, key.clone()),
            }
        };

        let values = future.await?;
        Ok(values.get(&key).cloned())
    }

    /// Resolve several keys; one result per key, in input order.
    ///
    /// A failure for one key does not affect the others unless they shared
    /// the failed batch.
    pub async fn load_many<I>(&self, keys: I) -> Vec<Result<Option<L::Value>, L::Error>>
    where
        I: IntoIterator<Item = K>,
    {
        join_all(keys.into_iter().map(|key| self.load(key))).await
    }

    /// Seed the cache with a known value.
    ///
    /// Only takes effect for a key that is neither cached nor waiting on a
    /// batch. Returns whether the value was stored.
    pub fn prime(&self, key: K, value: L::Value) -> bool {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        if state.cache.contains_key(&key) || state.pending.contains_key(&key) {
            return false;
        }
        state.cache.insert(key, Some(value));
        true
    }

    /// Evict one key.
    ///
    /// A key whose batch is already in flight is detached from it, so the
    /// next `load` starts a fresh fetch instead of reusing the old result.
    pub fn clear(&self, key: &K) {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        state.cache.remove(key);
        let dispatched = state
            .pending
            .get(key)
            .is_some_and(|(batch, _)| !state.batches.contains_key(batch));
        if dispatched {
            state.pending.remove(key);
        }
    }

    /// Evict every key
    pub fn clear_all(&self) {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        state.cache.clear();
        let batches = &state.batches;
        state
            .pending
            .retain(|_, (batch, _)| batches.contains_key(batch));
    }
}

impl<K, L> Drop for BatchLoader<K, L>
where
    K: Send + Sync + Hash + Eq + Clone + 'static,
    L: Loader<K>,
{
    fn drop(&mut self) {
        // Pending futures hold the inner state alive; release them.
        let mut state = self.inner.lock();
        state.pending.clear();
        state.open = None;
        state.cache.clear();
    }
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
