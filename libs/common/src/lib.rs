//! Common library for the Gourmet Hunter application
//!
//! This crate provides shared functionality used by the web service:
//! a retrying HTTP helper for calls to the remote recipe API and a Redis
//! pool used as shared storage between service instances.
//!
//! ```rust,no_run
//! use common::http::{RetryPolicy, fetch_with_retry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = reqwest::Client::new();
//!     let policy = RetryPolicy::default();
//!     let url = "https://gourmet.cours.quimerch.com/recipes";
//!     let response = fetch_with_retry(&policy, url, || client.get(url)).await?;
//!     println!("Recipes status: {}", response.status());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod http;
