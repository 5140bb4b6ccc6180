//! Recipe model and the views built on it

use serde::{Deserialize, Serialize};

/// Recipe as served by the recipe API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub when_to_eat: String,
    // Not every API revision sends the fields below
    pub calories: Option<u32>,
    pub cook_time: Option<u32>,
    pub cost: Option<f64>,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub description: Option<String>,
    pub disclaimer: Option<String>,
    pub image_url: Option<String>,
    pub prep_time: Option<u32>,
    pub servings: Option<u32>,
}

impl Recipe {
    /// Preparation plus cooking time in minutes, missing parts count as zero
    pub fn total_time(&self) -> u32 {
        self.prep_time.unwrap_or(0) + self.cook_time.unwrap_or(0)
    }
}

/// Recipe list item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCard {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_time: u32,
    pub servings: u32,
}

impl From<&Recipe> for RecipeCard {
    fn from(recipe: &Recipe) -> Self {
        let category = if recipe.category.trim().is_empty() {
            "General".to_string()
        } else {
            recipe.category.clone()
        };

        Self {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            category,
            description: recipe.description.clone(),
            image_url: recipe.image_url.clone(),
            total_time: recipe.total_time(),
            servings: recipe.servings.unwrap_or(0),
        }
    }
}

/// Recipe page
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub total_time: u32,
    pub is_favorite: bool,
    pub logged_in: bool,
}
