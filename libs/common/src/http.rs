//! Retrying HTTP helper
//!
//! Requests to the remote recipe API occasionally fail at the transport
//! layer (DNS hiccups inside containers, resets, timeouts). This module
//! retries those failures with exponential backoff and hands every completed
//! response, whatever its status, back to the caller.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use tracing::warn;

/// Retry configuration for outbound requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of additional attempts after the first one
    pub retries: u32,
    /// Base delay, doubled after every failed attempt
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(retries: u32, retry_delay: Duration) -> Self {
        Self {
            retries,
            retry_delay,
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay to wait after the given zero-based attempt failed
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Classification of failures that are worth retrying
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for reqwest::Error {
    // Status errors never show up here: responses are returned as-is and
    // nothing calls `error_for_status`.
    fn is_transient(&self) -> bool {
        self.is_connect() || self.is_timeout() || self.is_request()
    }
}

/// Run `operation` until it succeeds, fails with a non-transient error, or
/// the policy runs out of retries. The last error is returned unchanged.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    target: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.retries => {
                let wait = policy.backoff(attempt);
                warn!(
                    target_url = %target,
                    attempt = attempt + 1,
                    wait_ms = wait.as_millis() as u64,
                    error = %err,
                    "Request failed, retrying with backoff"
                );

                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Send the request produced by `build`, retrying transient transport
/// failures. `build` is called once per attempt so every attempt carries the
/// same method, headers and body.
pub async fn fetch_with_retry<F>(
    policy: &RetryPolicy,
    url: &str,
    build: F,
) -> reqwest::Result<Response>
where
    F: Fn() -> RequestBuilder,
{
    retry(policy, url, || build().send()).await
}
