//! Caching layer for search results to reduce provider calls

use crate::search::SearchHit;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Cache key for one search request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub query: String,
    pub max_results: usize,
}

impl SearchKey {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
        }
    }
}

/// Thread-safe, time-limited cache of search hits
///
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct SearchCache {
    cache: Arc<RwLock<TimedCache<SearchKey, Vec<SearchHit>>>>,
}

impl SearchCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    pub async fn get(&self, key: &SearchKey) -> Option<Vec<SearchHit>> {
        // TimedCache evicts on read, so reads need the write lock
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    pub async fn insert(&self, key: SearchKey, hits: Vec<SearchHit>) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, hits);
    }

    /// Return cached hits or run `fetcher` and cache what it returns
    ///
    /// Errors are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: SearchKey, fetcher: F) -> Result<Vec<SearchHit>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<SearchHit>, E>>,
    {
        if let Some(hits) = self.get(&key).await {
            debug!(query = %key.query, "search cache hit");
            return Ok(hits);
        }

        debug!(query = %key.query, "search cache miss");
        let hits = fetcher().await?;
        self.insert(key, hits.clone()).await;
        Ok(hits)
    }

    pub async fn clear(&self) {
        self.cache.write().await.cache_clear();
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            href: "https://example.com".to_string(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = SearchCache::new(Duration::from_secs(60));
        let key = SearchKey::new("Austin TX job market trends", 3);

        assert!(cache.get(&key).await.is_none());
        cache.insert(key.clone(), vec![hit("Jobs report")]).await;

        assert_eq!(cache.get(&key).await, Some(vec![hit("Jobs report")]));
        assert!(cache.get(&SearchKey::new("Austin TX job market trends", 5)).await.is_none());
    }

    #[tokio::test]
    async fn test_get_or_fetch_calls_once() {
        let cache = SearchCache::new(Duration::from_secs(60));
        let key = SearchKey::new("Dallas TX housing shortage statistics", 3);

        let mut calls = 0;
        let first = cache
            .get_or_fetch(key.clone(), || {
                calls += 1;
                async { Ok::<_, String>(vec![hit("Shortage")]) }
            })
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = cache
            .get_or_fetch(key, || {
                calls += 1;
                async { Ok::<_, String>(Vec::new()) }
            })
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let cache = SearchCache::new(Duration::from_secs(60));
        let key = SearchKey::new("q", 1);

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<Vec<SearchHit>, _>("down") })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);

        cache.insert(key, vec![hit("a")]).await;
        assert_eq!(cache.len().await, 1);
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
