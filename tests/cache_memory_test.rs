// ABOUTME: Unit tests for in-memory cache implementation
// ABOUTME: Tests TTL expiration, capacity limits, pattern invalidation and shared clones
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sparkrepo_client::cache::{CacheConfig, CacheKey, InMemoryCache};
use sparkrepo_client::models::ResourceId;
use sparkrepo_client::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct TestData {
    value: String,
    count: u32,
}

/// Helper: Create in-memory cache with custom capacity
fn create_test_cache(max_entries: usize) -> InMemoryCache {
    let config = CacheConfig {
        max_entries,
        enable_background_cleanup: false, // Disable in tests to avoid tokio runtime conflicts
        ..CacheConfig::default()
    };
    InMemoryCache::new("test", &config)
}

#[tokio::test]
async fn test_cache_set_and_get() -> Result<()> {
    let cache = create_test_cache(100);
    let key = CacheKey::week("c1", 1);
    let data = TestData {
        value: "test".to_owned(),
        count: 42,
    };

    cache.set(&key, &data, Duration::from_secs(10)).await?;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, Some(data));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cache_expiration() -> Result<()> {
    let cache = create_test_cache(100);
    let key = CacheKey::Categories;
    let data = TestData {
        value: "expires".to_owned(),
        count: 1,
    };

    cache.set(&key, &data, Duration::from_secs(60)).await?;
    assert!(cache.exists(&key).await);

    tokio::time::advance(Duration::from_secs(59)).await;
    assert_eq!(cache.get::<TestData>(&key).await?, Some(data));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(!cache.exists(&key).await);
    assert_eq!(cache.get::<TestData>(&key).await?, None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cache_remaining_ttl() -> Result<()> {
    let cache = create_test_cache(100);
    let key = CacheKey::weeks("c1");
    cache.set(&key, &1_u32, Duration::from_secs(30)).await?;

    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(cache.ttl(&key).await, Some(Duration::from_secs(20)));
    assert_eq!(cache.ttl(&CacheKey::weeks("missing")).await, None);
    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate() -> Result<()> {
    let cache = create_test_cache(100);
    let key = CacheKey::week("c1", 2);
    cache.set(&key, &"week", Duration::from_secs(10)).await?;

    cache.invalidate(&key).await;
    assert!(!cache.exists(&key).await);
    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate_pattern() -> Result<()> {
    let cache = create_test_cache(100);
    for week_number in 1..=3 {
        cache
            .set(&CacheKey::week("c1", week_number), &week_number, Duration::from_secs(10))
            .await?;
    }
    cache
        .set(&CacheKey::week("c10", 1), &1_u32, Duration::from_secs(10))
        .await?;
    cache
        .set(&CacheKey::weeks("c1"), &Vec::<u32>::new(), Duration::from_secs(10))
        .await?;

    assert_eq!(cache.invalidate_pattern("week:c1:*").await?, 3);
    assert!(cache.exists(&CacheKey::week("c10", 1)).await);
    assert!(cache.exists(&CacheKey::weeks("c1")).await);

    let invalid = cache.invalidate_pattern("week:[").await;
    assert!(matches!(invalid, Err(ClientError::Internal { .. })));
    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate_pattern_with_confirmation() -> Result<()> {
    let cache = create_test_cache(100);
    let a = ResourceId::from("a");
    for key in [
        CacheKey::week("a", 1),
        CacheKey::weeks("a"),
        CacheKey::week("a:1", 2),
        CacheKey::weeks("a:1"),
    ] {
        cache.set(&key, &0_u32, Duration::from_secs(10)).await?;
    }

    let mut removed = 0;
    for pattern in CacheKey::category_patterns(&a) {
        removed += cache
            .invalidate_pattern_where(&pattern, |key| CacheKey::belongs_to(key, &a))
            .await?;
    }

    assert_eq!(removed, 2);
    assert!(!cache.exists(&CacheKey::week("a", 1)).await);
    assert!(!cache.exists(&CacheKey::weeks("a")).await);
    assert!(cache.exists(&CacheKey::week("a:1", 2)).await);
    assert!(cache.exists(&CacheKey::weeks("a:1")).await);
    Ok(())
}

#[tokio::test]
async fn test_cache_capacity_evicts_least_recently_used() -> Result<()> {
    let cache = create_test_cache(2);
    let (a, b, c) = (
        CacheKey::week("c1", 1),
        CacheKey::week("c1", 2),
        CacheKey::week("c1", 3),
    );

    cache.set(&a, &1_u32, Duration::from_secs(10)).await?;
    cache.set(&b, &2_u32, Duration::from_secs(10)).await?;
    // Reading `a` makes `b` the eviction candidate
    assert_eq!(cache.get::<u32>(&a).await?, Some(1));
    cache.set(&c, &3_u32, Duration::from_secs(10)).await?;

    assert_eq!(cache.len().await, 2);
    assert!(cache.exists(&a).await);
    assert!(!cache.exists(&b).await);
    assert!(cache.exists(&c).await);
    Ok(())
}

#[tokio::test]
async fn test_cache_type_mismatch_is_an_error() -> Result<()> {
    let cache = create_test_cache(10);
    let key = CacheKey::Categories;
    cache.set(&key, &"not a number", Duration::from_secs(10)).await?;

    let result = cache.get::<u32>(&key).await;
    assert!(matches!(result, Err(ClientError::Serialization { .. })));
    Ok(())
}

#[tokio::test]
async fn test_cache_clones_share_entries_and_clear_all() -> Result<()> {
    let cache = create_test_cache(10);
    let clone = cache.clone();
    cache
        .set(&CacheKey::Categories, &vec!["Scratch Jr"], Duration::from_secs(10))
        .await?;
    assert!(clone.exists(&CacheKey::Categories).await);

    clone.clear_all().await;
    assert!(cache.is_empty().await);
    Ok(())
}
