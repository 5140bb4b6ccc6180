//! Application state shared across handlers

use std::time::Duration;

use anyhow::Result;

use crate::{
    client::RecipeApiClient, config::WebConfig, rate_limiter::RateLimiter,
    session::CookiePolicy, views::ViewCache,
};

/// How long each kind of page payload stays cached
#[derive(Debug, Clone, Copy)]
pub struct Revalidation {
    pub recipes: Duration,
    pub recipe: Duration,
    pub favorites: Duration,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: RecipeApiClient,
    pub rate_limiter: RateLimiter,
    pub views: ViewCache,
    pub cookies: CookiePolicy,
    pub revalidation: Revalidation,
}

impl AppState {
    pub fn new(config: &WebConfig, rate_limiter: RateLimiter) -> Result<Self> {
        let api = RecipeApiClient::from_config(config)?;

        Ok(Self {
            api,
            rate_limiter,
            views: ViewCache::new(),
            cookies: CookiePolicy {
                secure: config.production,
            },
            revalidation: Revalidation {
                recipes: Duration::from_secs(config.recipes_revalidate_secs),
                recipe: Duration::from_secs(config.recipe_revalidate_secs),
                favorites: Duration::from_secs(config.favorites_revalidate_secs),
            },
        })
    }
}
