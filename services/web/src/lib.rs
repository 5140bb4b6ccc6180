//! Gourmet Hunter web front end
//!
//! Serves the recipe catalog backed by the remote recipe API, and handles
//! login, logout and favorites on behalf of the browser session.

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
pub mod views;

pub use state::AppState;
