//! Rate limiter for login attempts
//!
//! Fixed window counter per login identifier. The counters live in a
//! [`RateLimitStore`] so several service instances can share them through
//! Redis; a single instance can keep them in memory.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::cache::RedisPool;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed per window
    pub max_attempts: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 900, // 15 minutes
        }
    }
}

/// Attempts recorded for one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitEntry {
    /// Attempts made in the current window, at least 1
    pub count: u32,
    /// End of the current window
    pub reset_at: DateTime<Utc>,
}

/// Storage for rate limit entries
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<RateLimitEntry>>;
    async fn put(&self, key: &str, entry: &RateLimitEntry) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store. Stale entries are only replaced, never swept.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<RateLimitEntry>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: &RateLimitEntry) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store shared through Redis. Keys expire together with their window.
#[derive(Clone)]
pub struct RedisStore {
    redis_pool: RedisPool,
}

impl RedisStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    fn redis_key(key: &str) -> String {
        format!("rate_limit:login:{}", key)
    }

    /// Seconds the key lives: until the window ends, at least one
    fn ttl_seconds(entry: &RateLimitEntry, now: DateTime<Utc>) -> u64 {
        (entry.reset_at - now).num_seconds().max(1) as u64
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<RateLimitEntry>> {
        let raw = self.redis_pool.get(&Self::redis_key(key)).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, entry: &RateLimitEntry) -> Result<()> {
        let ttl = Self::ttl_seconds(entry, Utc::now());
        let value = serde_json::to_string(entry)?;
        self.redis_pool
            .set(&Self::redis_key(key), &value, Some(ttl))
            .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.redis_pool.delete(&Self::redis_key(key)).await
    }
}

/// Bucket key for a submitted username: surrounding whitespace and case do
/// not open a new bucket.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    /// Create a new rate limiter over the given store
    pub fn new(config: RateLimiterConfig, store: Arc<dyn RateLimitStore>) -> Self {
        Self { config, store }
    }

    /// Rate limiter keeping its counters in process memory
    pub fn in_memory(config: RateLimiterConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Record an attempt for `identifier` and report whether it may proceed
    pub async fn is_allowed(&self, identifier: &str) -> Result<bool> {
        self.is_allowed_at(identifier, Utc::now()).await
    }

    /// Same as [`RateLimiter::is_allowed`] with an explicit clock
    pub async fn is_allowed_at(&self, identifier: &str, now: DateTime<Utc>) -> Result<bool> {
        let key = normalize_identifier(identifier);

        match self.store.get(&key).await? {
            Some(entry) if now <= entry.reset_at => {
                if entry.count >= self.config.max_attempts {
                    info!("Login attempts exhausted for {} until {}", key, entry.reset_at);
                    return Ok(false);
                }

                let entry = RateLimitEntry {
                    count: entry.count + 1,
                    reset_at: entry.reset_at,
                };
                self.store.put(&key, &entry).await?;
                Ok(true)
            }
            // First attempt, or the previous window is over
            _ => {
                let entry = RateLimitEntry {
                    count: 1,
                    reset_at: self.window_end(now)?,
                };
                self.store.put(&key, &entry).await?;
                Ok(true)
            }
        }
    }

    /// Forget every attempt recorded for `identifier`
    pub async fn clear(&self, identifier: &str) -> Result<()> {
        self.store.remove(&normalize_identifier(identifier)).await
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    fn window_end(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        i64::try_from(self.config.window_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| {
                anyhow!(
                    "Rate limit window out of range: {}s",
                    self.config.window_seconds
                )
            })
    }
}
