//! Service configuration
//!
//! Settings come from built-in defaults overridden by `GOURMET_*`
//! environment variables (e.g. `GOURMET_API_BASE_URL`).

use std::time::Duration;

use anyhow::Result;
use common::http::RetryPolicy;
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_BASE_URL: &str = "https://gourmet.cours.quimerch.com";
/// Longest accepted rate limit window, one year
const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

/// Where login attempt counters are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    /// Process-local table
    Memory,
    /// Shared Redis keys, see `common::cache::RedisConfig`
    Redis,
}

/// Web service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Base URL of the remote recipe API
    pub api_base_url: String,
    /// Marks session cookies `Secure` when true
    pub production: bool,
    /// Per-request timeout for calls to the recipe API
    pub request_timeout_secs: u64,
    /// Extra attempts on transient network failures
    pub retries: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
    pub rate_limit_max_attempts: u32,
    pub rate_limit_window_secs: u64,
    pub rate_limit_backend: RateLimitBackend,
    /// Revalidation period of the recipe list
    pub recipes_revalidate_secs: u64,
    /// Revalidation period of a single recipe
    pub recipe_revalidate_secs: u64,
    /// Revalidation period of a user's favorites
    pub favorites_revalidate_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            production: false,
            request_timeout_secs: 10,
            retries: 3,
            retry_delay_ms: 1000,
            rate_limit_max_attempts: 5,
            rate_limit_window_secs: 900, // 15 minutes
            rate_limit_backend: RateLimitBackend::Memory,
            recipes_revalidate_secs: 60,
            recipe_revalidate_secs: 3600,
            favorites_revalidate_secs: 60,
        }
    }
}

impl WebConfig {
    /// Create a new WebConfig from environment variables
    ///
    /// # Environment Variables
    /// - `GOURMET_BIND_ADDR` (default: "0.0.0.0:3000")
    /// - `GOURMET_API_BASE_URL` (default: "https://gourmet.cours.quimerch.com")
    /// - `GOURMET_PRODUCTION` (default: false)
    /// - `GOURMET_REQUEST_TIMEOUT_SECS` (default: 10)
    /// - `GOURMET_RETRIES` / `GOURMET_RETRY_DELAY_MS` (default: 3 / 1000)
    /// - `GOURMET_RATE_LIMIT_MAX_ATTEMPTS` / `GOURMET_RATE_LIMIT_WINDOW_SECS` (default: 5 / 900)
    /// - `GOURMET_RATE_LIMIT_BACKEND`: "memory" or "redis" (default: "memory")
    /// - `GOURMET_RECIPES_REVALIDATE_SECS`, `GOURMET_RECIPE_REVALIDATE_SECS`,
    ///   `GOURMET_FAVORITES_REVALIDATE_SECS` (default: 60, 3600, 60)
    pub fn from_env() -> Result<Self> {
        let defaults = WebConfig::default();

        let settings = config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("production", defaults.production)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("retries", defaults.retries as i64)?
            .set_default("retry_delay_ms", defaults.retry_delay_ms as i64)?
            .set_default(
                "rate_limit_max_attempts",
                defaults.rate_limit_max_attempts as i64,
            )?
            .set_default(
                "rate_limit_window_secs",
                defaults.rate_limit_window_secs as i64,
            )?
            .set_default("rate_limit_backend", "memory")?
            .set_default(
                "recipes_revalidate_secs",
                defaults.recipes_revalidate_secs as i64,
            )?
            .set_default(
                "recipe_revalidate_secs",
                defaults.recipe_revalidate_secs as i64,
            )?
            .set_default(
                "favorites_revalidate_secs",
                defaults.favorites_revalidate_secs as i64,
            )?
            .add_source(config::Environment::with_prefix("GOURMET").try_parsing(true))
            .build()?;

        let config: WebConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the rate limiter cannot work with
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (1..=MAX_RATE_LIMIT_WINDOW_SECS).contains(&self.rate_limit_window_secs),
            "rate_limit_window_secs must be between 1 and {}, got {}",
            MAX_RATE_LIMIT_WINDOW_SECS,
            self.rate_limit_window_secs
        );
        anyhow::ensure!(
            self.rate_limit_max_attempts > 0,
            "rate_limit_max_attempts must be at least 1"
        );
        Ok(())
    }

    /// Retry policy applied to calls to the recipe API
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn rate_limiter(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_attempts: self.rate_limit_max_attempts,
            window_seconds: self.rate_limit_window_secs,
        }
    }
}
