//! Shared setup for the web service integration tests

#![allow(dead_code)]

use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{Value, json};
use web::{
    AppState,
    config::WebConfig,
    rate_limiter::RateLimiter,
    session::{self, SESSION_COOKIE, Session},
};

/// State talking to `api_base_url` with fast retries
pub fn state_for(api_base_url: &str) -> AppState {
    let config = WebConfig {
        api_base_url: api_base_url.to_string(),
        request_timeout_secs: 2,
        retries: 1,
        retry_delay_ms: 1,
        ..WebConfig::default()
    };

    AppState::new(&config, RateLimiter::in_memory(config.rate_limiter()))
        .expect("test state")
}

/// Base URL of a local port with no listener behind it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

/// Jar carrying the combined session cookie
pub fn session_jar(token: &str, username: &str) -> CookieJar {
    CookieJar::new().add(Cookie::new(
        SESSION_COOKIE,
        session::encode(&Session::new(token, username)),
    ))
}

/// `Cookie` request header value for the combined session cookie
pub fn session_header(token: &str, username: &str) -> String {
    format!(
        "{}={}",
        SESSION_COOKIE,
        session::encode(&Session::new(token, username))
    )
}

pub fn recipe_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "Dinner",
        "prep_time": 10,
        "cook_time": 20,
        "servings": 4,
    })
}
