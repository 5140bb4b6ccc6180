use std::sync::Arc;

use anyhow::Result;
use common::cache::{RedisConfig, RedisPool};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use web::{
    AppState,
    config::{RateLimitBackend, WebConfig},
    rate_limiter::{RateLimiter, RedisStore},
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Gourmet Hunter web service");

    let config = WebConfig::from_env()?;
    info!("Using recipe API at {}", config.api_base_url);

    let rate_limiter = match config.rate_limit_backend {
        RateLimitBackend::Memory => RateLimiter::in_memory(config.rate_limiter()),
        RateLimitBackend::Redis => {
            let redis_config = RedisConfig::from_env()?;
            let redis_pool = RedisPool::new(&redis_config).await?;

            if redis_pool.health_check().await? {
                info!("Redis connection successful");
            } else {
                anyhow::bail!("Failed to connect to Redis");
            }

            RateLimiter::new(
                config.rate_limiter(),
                Arc::new(RedisStore::new(redis_pool)),
            )
        }
    };

    let app_state = AppState::new(&config, rate_limiter)?;

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Web service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
