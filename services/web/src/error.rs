//! Custom error types for the web service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the recipe API
#[derive(Error, Debug)]
pub enum ApiClientError {
    /// Transport failure, after retries where they apply
    #[error("Request to recipe API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Completed response with a non-success status
    #[error("Recipe API responded with {0}")]
    Status(reqwest::StatusCode),

    /// Successful response without an expected field
    #[error("Recipe API response is missing `{0}`")]
    MissingField(&'static str),

    #[error("Invalid recipe API URL: {0}")]
    InvalidUrl(String),
}

/// Reasons a login attempt does not produce a session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Username is required.")]
    MissingUsername,

    #[error("Password is required.")]
    MissingPassword,

    #[error("Username must be at least 3 characters.")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Too many login attempts. Please try again later.")]
    TooManyAttempts,

    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,

    #[error("Login failed. No token received.")]
    NoToken,

    #[error("Unable to connect to the server. Please try again later.")]
    Unreachable,
}

impl LoginError {
    pub fn status(&self) -> StatusCode {
        match self {
            LoginError::MissingUsername
            | LoginError::MissingPassword
            | LoginError::UsernameTooShort
            | LoginError::PasswordTooShort => StatusCode::BAD_REQUEST,
            LoginError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LoginError::NoToken => StatusCode::BAD_GATEWAY,
            LoginError::Unreachable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Reasons a favorite toggle is refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to update favorite")]
    UpdateFailed,
}

impl IntoResponse for FavoriteError {
    fn into_response(self) -> Response {
        let status = match self {
            FavoriteError::Unauthorized => StatusCode::UNAUTHORIZED,
            FavoriteError::UpdateFailed => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Error type for page handlers
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] ApiClientError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WebError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            WebError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "Failed to fetch data".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for page handler results
pub type WebResult<T> = Result<T, WebError>;
