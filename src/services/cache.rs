use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use crate::services::store::{Collection, DocumentStore, Filter, StoreError, StoredDocument};

/// Read-through query cache in front of another document store
///
/// Query results are kept in an in-memory `moka` cache. Each collection has a
/// generation counter that is part of the cache key; an insert bumps the
/// generation, so earlier results for that collection are never served again
/// and age out on their own.
pub struct CachedStore<S> {
    inner: S,
    cache: moka::future::Cache<String, Vec<StoredDocument>>,
    generations: HashMap<Collection, AtomicU64>,
}

impl<S: DocumentStore> CachedStore<S> {
    /// Wrap a store with a cache of at most `capacity` query results
    pub fn new(inner: S, capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        let generations = Collection::ALL
            .iter()
            .map(|collection| (*collection, AtomicU64::new(0)))
            .collect();

        Self {
            inner,
            cache,
            generations,
        }
    }

    fn generation(&self, collection: Collection) -> u64 {
        self.generations
            .get(&collection)
            .map(|g| g.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    fn invalidate(&self, collection: Collection) {
        if let Some(g) = self.generations.get(&collection) {
            g.fetch_add(1, Ordering::AcqRel);
        }
        tracing::trace!("Invalidated cached queries for {}", collection);
    }
}

impl<S: DocumentStore> DocumentStore for CachedStore<S> {
    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = self.inner.insert(collection, document).await?;
        self.invalidate(collection);
        Ok(id)
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let key = CacheKey::query(collection, self.generation(collection), filter);

        if let Some(documents) = self.cache.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(documents);
        }

        let documents = self.inner.query(collection, filter).await?;
        self.cache.insert(key.clone(), documents.clone()).await;
        tracing::trace!("Cache set: {}", key);

        Ok(documents)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list_collections().await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.inner.health_check().await
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a collection query
    pub fn query(collection: Collection, generation: u64, filter: &Filter) -> String {
        format!("query:{}:{}:{}", collection, generation, filter.to_value())
    }
}
