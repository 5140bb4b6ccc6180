//! View cache
//!
//! Keeps upstream payloads behind the catalog pages for a while so every
//! page view does not hit the recipe API. Entries are keyed by page path and
//! an optional variant (the session for per-user pages); invalidating a path
//! drops all of its variants.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Recipe list page
pub const RECIPES_VIEW: &str = "/recipes";
/// Favorites page, one variant per user
pub const FAVORITES_VIEW: &str = "/favorites";

/// Page of a single recipe
pub fn recipe_view(id: &str) -> String {
    format!("/recipes/{}", id)
}

/// Variant of a per-user view. Bound to the bearer token as well as the
/// username, since both come from client cookies.
pub fn session_variant(token: &str, username: Option<&str>) -> String {
    serde_json::json!([username.unwrap_or_default(), token]).to_string()
}

struct CachedView {
    body: serde_json::Value,
    expires_at: Instant,
}

/// Cached page payloads
#[derive(Clone, Default)]
pub struct ViewCache {
    entries: Arc<RwLock<HashMap<String, HashMap<String, CachedView>>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached value for `path`, if any
    pub async fn get<T: DeserializeOwned>(&self, path: &str, variant: Option<&str>) -> Option<T> {
        let entries = self.entries.read().await;
        let view = entries.get(path)?.get(variant.unwrap_or_default())?;

        if view.expires_at <= Instant::now() {
            return None;
        }

        serde_json::from_value(view.body.clone()).ok()
    }

    /// Cache `value` for `path` during `ttl`
    pub async fn put<T: Serialize>(
        &self,
        path: &str,
        variant: Option<&str>,
        value: &T,
        ttl: Duration,
    ) {
        let body = match serde_json::to_value(value) {
            Ok(body) => body,
            Err(e) => {
                warn!("Not caching view {}: {}", path, e);
                return;
            }
        };

        self.entries
            .write()
            .await
            .entry(path.to_string())
            .or_default()
            .insert(
                variant.unwrap_or_default().to_string(),
                CachedView {
                    body,
                    expires_at: Instant::now() + ttl,
                },
            );
    }

    /// Drop every cached variant of `path`
    pub async fn invalidate(&self, path: &str) {
        if self.entries.write().await.remove(path).is_some() {
            debug!("Invalidated cached view {}", path);
        }
    }
}
