//! User-facing mutations: login, logout and favorite toggling
//!
//! Each action runs within a single request. Failures are turned into
//! user-facing errors here; none of them escape as server errors.

use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::{ApiClientError, FavoriteError, LoginError},
    session::{self, AuthSession, Session},
    validation::validate_login,
    views::{FAVORITES_VIEW, recipe_view},
};

/// Submitted login form; either field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Authenticate against the recipe API and store the session.
///
/// On success the returned jar carries the new session cookie and the caller
/// is expected to send the user to the landing page.
pub async fn login(
    state: &AppState,
    jar: CookieJar,
    form: LoginForm,
) -> Result<CookieJar, LoginError> {
    let payload = validate_login(form.username.as_deref(), form.password.as_deref())?;

    match state.rate_limiter.is_allowed(&payload.username).await {
        Ok(true) => {}
        Ok(false) => {
            warn!("Too many login attempts for user: {}", payload.username);
            return Err(LoginError::TooManyAttempts);
        }
        Err(e) => {
            // Fail open when the store is unreachable
            error!("Rate limiter unavailable, allowing attempt: {}", e);
        }
    }

    info!("Login attempt for user: {}", payload.username);

    let token = match state.api.login(&payload).await {
        Ok(token) => token,
        Err(ApiClientError::Status(status)) => {
            info!("Login rejected for user {}: {}", payload.username, status);
            return Err(LoginError::InvalidCredentials);
        }
        Err(ApiClientError::MissingField(_)) => {
            warn!("Login for user {} returned no token", payload.username);
            return Err(LoginError::NoToken);
        }
        Err(e) => {
            error!("Login request failed: {}", e);
            return Err(LoginError::Unreachable);
        }
    };

    let jar = state
        .cookies
        .store(jar, &Session::new(token, payload.username.clone()));

    if let Err(e) = state.rate_limiter.clear(&payload.username).await {
        warn!("Failed to reset login attempts for {}: {}", payload.username, e);
    }

    info!("User {} logged in", payload.username);
    Ok(jar)
}

/// Drop the session and every legacy session cookie
pub fn logout(state: &AppState, jar: CookieJar) -> CookieJar {
    info!("Logout request");
    state.cookies.clear(jar)
}

/// Username of the session, asking the identity endpoint when no cookie
/// carries it. Any failure of that lookup is reported as `None`.
pub async fn resolve_username(state: &AppState, session: &AuthSession) -> Option<String> {
    if let Some(username) = &session.username {
        return Some(username.clone());
    }

    match state.api.current_username(&session.token).await {
        Ok(username) => Some(username),
        Err(e) => {
            warn!("Failed to look up current user: {}", e);
            None
        }
    }
}

/// Add the recipe to the user's favorites, or remove it when it already is
/// one, then drop the cached pages showing it.
pub async fn toggle_favorite(
    state: &AppState,
    jar: &CookieJar,
    recipe_id: &str,
    is_currently_favorite: bool,
) -> Result<(), FavoriteError> {
    let session = session::resolve(jar)
        .authenticated()
        .ok_or(FavoriteError::Unauthorized)?;
    let username = resolve_username(state, &session)
        .await
        .ok_or(FavoriteError::Unauthorized)?;

    let token = &session.token;
    let result = if is_currently_favorite {
        state.api.remove_favorite(token, &username, recipe_id).await
    } else {
        state.api.add_favorite(token, &username, recipe_id).await
    };

    if let Err(e) = result {
        error!("Error toggling favorite {} for {}: {}", recipe_id, username, e);
        return Err(FavoriteError::UpdateFailed);
    }

    state.views.invalidate(FAVORITES_VIEW).await;
    state.views.invalidate(&recipe_view(recipe_id)).await;

    info!(
        "Favorite {} {} for user {}",
        recipe_id,
        if is_currently_favorite { "removed" } else { "added" },
        username
    );
    Ok(())
}
