//! Web routes

use axum::{
    Extension, Form, Json, Router,
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    AppState,
    actions::{self, LoginForm},
    error::{ApiClientError, FavoriteError, LoginError, WebError, WebResult},
    middleware::require_session,
    models::{Recipe, RecipeCard, RecipeDetail, SessionStatus},
    session::{self, AuthSession},
    views::{FAVORITES_VIEW, RECIPES_VIEW, recipe_view, session_variant},
};

/// Body of a favorite toggle
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub is_currently_favorite: bool,
}

/// Create the router for the web front end
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/favorites", get(favorites_page))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .route("/health", get(health_check))
        .route("/session", get(session_status))
        .route("/", get(recipes_page))
        .route("/recipes", get(recipes_page))
        .route("/recipes/:id", get(recipe_page))
        .route("/recipes/:id/favorite", post(toggle_favorite))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gourmet-web"
    }))
}

/// Login state shown in the navigation bar
pub async fn session_status(jar: CookieJar) -> Json<SessionStatus> {
    Json(session::resolve(&jar).status())
}

/// Recipe catalog
pub async fn recipes_page(State(state): State<AppState>) -> WebResult<Json<Vec<RecipeCard>>> {
    let recipes = match state.views.get::<Vec<Recipe>>(RECIPES_VIEW, None).await {
        Some(recipes) => recipes,
        None => {
            let recipes = state.api.list_recipes().await?;
            state
                .views
                .put(RECIPES_VIEW, None, &recipes, state.revalidation.recipes)
                .await;
            recipes
        }
    };

    Ok(Json(recipes.iter().map(RecipeCard::from).collect()))
}

/// Single recipe, flagged when it is one of the user's favorites
pub async fn recipe_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> WebResult<Json<RecipeDetail>> {
    let session = session::resolve(&jar).authenticated();
    let logged_in = session.is_some();

    let (recipe, is_favorite) = tokio::join!(
        load_recipe(&state, &id),
        is_favorite(&state, session, &id)
    );

    let recipe = recipe?.ok_or_else(|| WebError::NotFound("Recipe".to_string()))?;

    Ok(Json(RecipeDetail {
        total_time: recipe.total_time(),
        recipe,
        is_favorite,
        logged_in,
    }))
}

/// Favorites of the logged-in user
pub async fn favorites_page(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> WebResult<Json<Vec<RecipeCard>>> {
    let favorites = load_favorites(&state, &session.token, session.username.as_deref()).await?;

    Ok(Json(favorites.iter().map(RecipeCard::from).collect()))
}

/// Login form submission
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), LoginError> {
    let jar = actions::login(&state, jar, form).await?;
    Ok((jar, Redirect::to("/")))
}

/// Logout endpoint
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (actions::logout(&state, jar), Redirect::to("/login"))
}

/// Favorite button
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Json(payload): Json<ToggleFavoriteRequest>,
) -> Result<impl IntoResponse, FavoriteError> {
    actions::toggle_favorite(&state, &jar, &id, payload.is_currently_favorite).await?;

    Ok(Json(json!({ "success": true })))
}

async fn load_recipe(state: &AppState, id: &str) -> Result<Option<Recipe>, ApiClientError> {
    let path = recipe_view(id);
    if let Some(recipe) = state.views.get::<Recipe>(&path, None).await {
        return Ok(Some(recipe));
    }

    let recipe = state.api.get_recipe(id).await?;
    if let Some(recipe) = &recipe {
        state
            .views
            .put(&path, None, recipe, state.revalidation.recipe)
            .await;
    }

    Ok(recipe)
}

/// Favorites of the session, cached per username and token
async fn load_favorites(
    state: &AppState,
    token: &str,
    username: Option<&str>,
) -> Result<Vec<Recipe>, ApiClientError> {
    let variant = session_variant(token, username);
    if let Some(cached) = state
        .views
        .get::<Vec<Recipe>>(FAVORITES_VIEW, Some(&variant))
        .await
    {
        return Ok(cached);
    }

    let favorites = state.api.list_favorites(token, username).await?;
    state
        .views
        .put(
            FAVORITES_VIEW,
            Some(&variant),
            &favorites,
            state.revalidation.favorites,
        )
        .await;

    Ok(favorites)
}

async fn is_favorite(state: &AppState, session: Option<AuthSession>, recipe_id: &str) -> bool {
    let Some(session) = session else {
        return false;
    };
    let Some(username) = actions::resolve_username(state, &session).await else {
        debug!("No username for session, recipe {} shown as not favorite", recipe_id);
        return false;
    };

    match load_favorites(state, &session.token, Some(&username)).await {
        Ok(favorites) => favorites.iter().any(|recipe| recipe.id == recipe_id),
        Err(e) => {
            warn!("Failed to load favorites for {}: {}", username, e);
            false
        }
    }
}
