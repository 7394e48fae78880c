// ABOUTME: In-memory cache implementation with LRU eviction and TTL support
// ABOUTME: Includes background cleanup task for expired entries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use std::time::Duration;

use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{CacheConfig, CacheKey};
use crate::errors::{ClientError, ClientResult};
use crate::logging::AppLogger;

type Store = RwLock<LruCache<String, CacheEntry>>;

/// Serialized value plus the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    timestamp: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            timestamp: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.timestamp.elapsed() >= self.ttl
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.timestamp.elapsed())
    }
}

/// In-memory cache with LRU eviction and background cleanup
///
/// Values are stored serialized, so one cache can hold week details and week
/// lists side by side. Clones share the same store. The cleanup task holds
/// only a weak reference and exits once the last clone is dropped.
#[derive(Clone)]
pub struct InMemoryCache {
    name: &'static str,
    store: Arc<Store>,
}

impl InMemoryCache {
    /// Default cache capacity when config specifies zero entries
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a named cache; spawns the cleanup task when enabled and a tokio runtime is running
    #[must_use]
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);
        let store = Arc::new(RwLock::new(LruCache::new(capacity)));

        if config.enable_background_cleanup {
            match Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(Self::cleanup_loop(
                        name,
                        Arc::downgrade(&store),
                        config.cleanup_interval,
                    ));
                }
                Err(_) => warn!(cache = name, "No tokio runtime, background cleanup disabled"),
            }
        }

        Self { name, store }
    }

    /// Cache name used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    async fn cleanup_loop(name: &'static str, store: Weak<Store>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(store) = store.upgrade() else {
                debug!(cache = name, "Cache dropped, stopping cleanup task");
                break;
            };
            Self::cleanup_expired(name, &store).await;
        }
    }

    /// Remove all expired entries from cache
    async fn cleanup_expired(name: &'static str, store: &Store) {
        let mut store_guard = store.write().await;

        let expired_keys: Vec<String> = store_guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            store_guard.pop(key);
        }
        drop(store_guard);

        if !expired_keys.is_empty() {
            debug!(cache = name, removed = expired_keys.len(), "Cleaned up expired cache entries");
        }
    }

    /// Store a value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized
    pub async fn set<T: Serialize + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> ClientResult<()> {
        let serialized =
            serde_json::to_vec(value).map_err(|e| ClientError::serialization("cache entry", e))?;
        self.store
            .write()
            .await
            .push(key.to_string(), CacheEntry::new(serialized, ttl));
        Ok(())
    }

    /// Fetch a fresh value; expired entries are evicted and read as a miss
    ///
    /// # Errors
    ///
    /// Returns an error if the stored bytes do not deserialize into `T`
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> ClientResult<Option<T>> {
        let key = key.to_string();
        let mut store = self.store.write().await;

        let Some(entry) = store.get(&key) else {
            drop(store);
            AppLogger::log_cache_lookup(self.name, &key, false);
            return Ok(None);
        };

        if entry.is_expired() {
            store.pop(&key);
            drop(store);
            AppLogger::log_cache_lookup(self.name, &key, false);
            return Ok(None);
        }

        let value = serde_json::from_slice(&entry.data)
            .map_err(|e| ClientError::serialization("cache entry", e));
        drop(store);
        AppLogger::log_cache_lookup(self.name, &key, true);
        value.map(Some)
    }

    /// Remove one entry
    pub async fn invalidate(&self, key: &CacheKey) {
        self.store.write().await.pop(&key.to_string());
    }

    /// Remove every entry whose key matches a glob pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob
    pub async fn invalidate_pattern(&self, pattern: &str) -> ClientResult<u64> {
        self.invalidate_pattern_where(pattern, |_| true).await
    }

    /// Remove entries whose key matches a glob pattern and passes `confirm`
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob
    pub async fn invalidate_pattern_where<F>(&self, pattern: &str, confirm: F) -> ClientResult<u64>
    where
        F: Fn(&str) -> bool + Send,
    {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ClientError::internal(format!("Invalid glob pattern '{pattern}': {e}")))?;

        let mut store = self.store.write().await;
        let keys_to_remove: Vec<String> = store
            .iter()
            .filter(|(key, _)| glob_pattern.matches(key) && confirm(key.as_str()))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys_to_remove {
            store.pop(key);
        }
        drop(store);

        Ok(keys_to_remove.len() as u64)
    }

    /// Whether a fresh entry exists
    pub async fn exists(&self, key: &CacheKey) -> bool {
        self.ttl(key).await.is_some()
    }

    /// Remaining lifetime of a fresh entry
    pub async fn ttl(&self, key: &CacheKey) -> Option<Duration> {
        let store = self.store.read().await;
        store
            .peek(&key.to_string())
            .filter(|entry| !entry.is_expired())
            .and_then(CacheEntry::remaining_ttl)
    }

    /// Number of stored entries, expired ones included until evicted
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Clear all cache entries
    pub async fn clear_all(&self) {
        self.store.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache(max_entries: usize) -> InMemoryCache {
        InMemoryCache::new(
            "test",
            &CacheConfig {
                max_entries,
                enable_background_cleanup: false,
                ..CacheConfig::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_is_stale_exactly_at_ttl() -> ClientResult<()> {
        let cache = test_cache(10);
        let key = CacheKey::Categories;
        cache.set(&key, &vec!["a"], Duration::from_millis(100)).await?;

        tokio::time::advance(Duration::from_millis(99)).await;
        assert_eq!(cache.get::<Vec<String>>(&key).await?, Some(vec!["a".to_owned()]));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(cache.get::<Vec<String>>(&key).await?, None);
        // Expired read evicts the entry
        assert!(cache.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_lru_capacity() -> ClientResult<()> {
        let cache = test_cache(2);
        for n in 1..=3 {
            cache
                .set(&CacheKey::week("c", n), &n, Duration::from_secs(60))
                .await?;
        }
        assert_eq!(cache.len().await, 2);
        assert!(!cache.exists(&CacheKey::week("c", 1)).await);
        assert!(cache.exists(&CacheKey::week("c", 3)).await);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_cleanup_removes_expired_entries() -> ClientResult<()> {
        let cache = InMemoryCache::new(
            "cleanup",
            &CacheConfig {
                cleanup_interval: Duration::from_secs(1),
                enable_background_cleanup: true,
                ..CacheConfig::default()
            },
        );
        cache
            .set(&CacheKey::Categories, &1_u8, Duration::from_millis(500))
            .await?;
        assert_eq!(cache.len().await, 1);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        tokio::task::yield_now().await;
        assert_eq!(cache.len().await, 0);
        Ok(())
    }
}
