//! Middleware guarding pages that need a session

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::session;

/// Redirect to the login page unless the request carries a session token.
/// The session is added to the request extensions as an `AuthSession`.
pub async fn require_session(jar: CookieJar, mut req: Request<Body>, next: Next) -> Response {
    let Some(auth) = session::resolve(&jar).authenticated() else {
        debug!("No session on {}, redirecting to login", req.uri().path());
        return Redirect::to("/login").into_response();
    };

    req.extensions_mut().insert(auth);

    next.run(req).await
}
