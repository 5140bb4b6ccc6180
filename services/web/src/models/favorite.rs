//! Favorites payloads
//!
//! Depending on the API revision a favorites listing is either an array of
//! recipes or an array of wrapper objects carrying the recipe under
//! `recipe`. Both are accepted.

use serde::Deserialize;

use super::recipe::Recipe;

/// One element of a favorites listing
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FavoriteEntry {
    Wrapped { recipe: Recipe },
    Bare(Recipe),
}

impl FavoriteEntry {
    pub fn into_recipe(self) -> Recipe {
        match self {
            FavoriteEntry::Wrapped { recipe } => recipe,
            FavoriteEntry::Bare(recipe) => recipe,
        }
    }
}

/// Whole favorites listing
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct FavoritesPayload(pub Vec<FavoriteEntry>);

impl FavoritesPayload {
    pub fn into_recipes(self) -> Vec<Recipe> {
        self.0.into_iter().map(FavoriteEntry::into_recipe).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_recipe_array() {
        let payload: FavoritesPayload = serde_json::from_value(json!([
            {"id": "r1", "name": "Pancakes"},
            {"id": "r2", "name": "Crepes"},
        ]))
        .unwrap();

        let ids: Vec<String> = payload.into_recipes().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[test]
    fn test_wrapped_recipe_array() {
        let payload: FavoritesPayload = serde_json::from_value(json!([
            {
                "recipe": {"id": "r3", "name": "Quiche"},
                "created_at": "2024-05-01T10:00:00Z",
                "username": "chef",
            },
        ]))
        .unwrap();

        let recipes = payload.into_recipes();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Quiche");
    }
}
