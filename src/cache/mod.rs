// ABOUTME: Response cache configuration and structured cache keys
// ABOUTME: Keys encode resource type plus identifying arguments for the category and week caches
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// In-memory cache implementation
pub mod memory;

pub use memory::InMemoryCache;

use std::fmt;
use std::time::Duration;

use crate::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, TTL_CATEGORIES_MS, TTL_WEEKS_MS,
};
use crate::models::ResourceId;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries per cache
    pub max_entries: usize,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// TTL per resource type
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            ttl: CacheTtlConfig::default(),
        }
    }
}

/// Cache TTL configuration for different resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtlConfig {
    /// Categories list TTL in milliseconds (default: 60 seconds)
    pub categories_ms: u64,
    /// Week detail and week list TTL in milliseconds (default: 30 seconds)
    pub weeks_ms: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            categories_ms: TTL_CATEGORIES_MS,
            weeks_ms: TTL_WEEKS_MS,
        }
    }
}

impl CacheTtlConfig {
    /// TTL for a specific cache key
    #[must_use]
    pub const fn ttl_for(&self, key: &CacheKey) -> Duration {
        match key {
            CacheKey::Categories => Duration::from_millis(self.categories_ms),
            CacheKey::Week { .. } | CacheKey::Weeks { .. } => Duration::from_millis(self.weeks_ms),
        }
    }
}

/// Cached resources
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The sorted categories list
    Categories,
    /// One week with its submissions
    Week {
        /// Category id
        category_id: ResourceId,
        /// Week number within the category
        week_number: u32,
    },
    /// All weeks of a category
    Weeks {
        /// Category id
        category_id: ResourceId,
    },
}

impl CacheKey {
    /// Key for one week
    pub fn week(category_id: impl Into<ResourceId>, week_number: u32) -> Self {
        Self::Week {
            category_id: category_id.into(),
            week_number,
        }
    }

    /// Key for a category's week list
    pub fn weeks(category_id: impl Into<ResourceId>) -> Self {
        Self::Weeks {
            category_id: category_id.into(),
        }
    }

    /// Glob patterns preselecting the week entries of a category
    ///
    /// `*` also crosses `:`, so `week:a:*` catches category `a:1` too. Confirm
    /// candidates with [`CacheKey::belongs_to`].
    #[must_use]
    pub fn category_patterns(category_id: &ResourceId) -> [String; 2] {
        let escaped = glob::Pattern::escape(category_id.as_str());
        [format!("week:{escaped}:*"), format!("weeks:{escaped}")]
    }

    /// Rebuild a key from its string form
    ///
    /// Week numbers never contain `:`, so the last separator splits a week key
    /// even when the category id has colons of its own.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        if key == "categories" {
            return Some(Self::Categories);
        }
        if let Some(rest) = key.strip_prefix("weeks:") {
            return Some(Self::weeks(rest));
        }
        let (category_id, week_number) = key.strip_prefix("week:")?.rsplit_once(':')?;
        Some(Self::week(category_id, week_number.parse().ok()?))
    }

    /// Category the entry belongs to
    #[must_use]
    pub const fn category_id(&self) -> Option<&ResourceId> {
        match self {
            Self::Categories => None,
            Self::Week { category_id, .. } | Self::Weeks { category_id } => Some(category_id),
        }
    }

    /// Whether the string key is a week entry of exactly this category
    #[must_use]
    pub fn belongs_to(key: &str, category_id: &ResourceId) -> bool {
        Self::parse(key).is_some_and(|key| key.category_id() == Some(category_id))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categories => write!(f, "categories"),
            Self::Week {
                category_id,
                week_number,
            } => write!(f, "week:{category_id}:{week_number}"),
            Self::Weeks { category_id } => write!(f, "weeks:{category_id}"),
        }
    }
}
