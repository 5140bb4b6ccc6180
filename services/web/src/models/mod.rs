//! Wire types of the recipe API and the view models built from them

pub mod favorite;
pub mod recipe;
pub mod user;

// Re-export for convenience
pub use favorite::{FavoriteEntry, FavoritesPayload};
pub use recipe::{Recipe, RecipeCard, RecipeDetail};
pub use user::{LoginPayload, SessionStatus, TokenResponse, User};
