//! Session cookie handling
//!
//! The session is a bearer token plus the username it belongs to, stored as
//! JSON in a single `session` cookie. Older deployments wrote the two values
//! to separate `session_token` and `username` cookies; those are still read
//! as a fallback and removed on logout, but never written.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Duration;

use crate::models::SessionStatus;

/// Combined session cookie
pub const SESSION_COOKIE: &str = "session";
/// Legacy token cookie, read-only
pub const LEGACY_TOKEN_COOKIE: &str = "session_token";
/// Legacy username cookie, read-only
pub const LEGACY_USERNAME_COOKIE: &str = "username";

const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Authenticated identity carried between requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

/// Serialize a session into a cookie value
pub fn encode(session: &Session) -> String {
    json!({
        "token": session.token,
        "username": session.username,
    })
    .to_string()
}

/// Parse a cookie value. Malformed JSON or an empty token means no session.
pub fn decode(value: &str) -> Option<Session> {
    serde_json::from_str::<Session>(value)
        .ok()
        .filter(|session| !session.token.is_empty())
}

/// Whatever could be recovered from the request cookies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSession {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl ResolvedSession {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            logged_in: self.is_logged_in(),
            username: self.username.clone(),
        }
    }

    /// The session when it carries a token
    pub fn authenticated(self) -> Option<AuthSession> {
        let token = self.token?;
        Some(AuthSession {
            token,
            username: self.username,
        })
    }
}

/// Session known to carry a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub username: Option<String>,
}

/// Resolve the session: the combined cookie first, then the legacy token
/// and legacy username cookies for whatever is still missing.
pub fn resolve(jar: &CookieJar) -> ResolvedSession {
    let mut resolved = ResolvedSession::default();

    if let Some(session) = jar.get(SESSION_COOKIE).and_then(|c| decode(c.value())) {
        resolved.token = Some(session.token);
        resolved.username = Some(session.username).filter(|u| !u.is_empty());
    }

    if resolved.token.is_none() {
        resolved.token = non_empty(jar, LEGACY_TOKEN_COOKIE);
    }
    if resolved.username.is_none() {
        resolved.username = non_empty(jar, LEGACY_USERNAME_COOKIE);
    }

    resolved
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Attributes of the session cookie
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// Only send the cookie over HTTPS
    pub secure: bool,
}

impl CookiePolicy {
    /// Add the session cookie to the jar
    pub fn store(&self, jar: CookieJar, session: &Session) -> CookieJar {
        let cookie = Cookie::build((SESSION_COOKIE, encode(session)))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
            .path("/");

        jar.add(cookie)
    }

    /// Remove the session cookie and both legacy cookies
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        [SESSION_COOKIE, LEGACY_TOKEN_COOKIE, LEGACY_USERNAME_COOKIE]
            .into_iter()
            .fold(jar, |jar, name| jar.remove(Cookie::build(name).path("/")))
    }
}
