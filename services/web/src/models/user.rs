//! User model and authentication payloads

use serde::{Deserialize, Serialize};

/// User entity as returned by `GET /me`; only the username is relied upon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub username: String,
    pub created_at: Option<String>,
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// `POST /login` body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
}

/// Navigation state exposed to the front end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub username: Option<String>,
}
