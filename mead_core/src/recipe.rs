//! # Recipe Documents
//!
//! A `Recipe` is a saved batch plan: catalog ingredient references with
//! amounts, the solve mode, and the estimates from the last calculation.
//! Recipes serialize to `.mead` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Recipe
//! ├── meta: RecipeMeta (schema version, timestamps)
//! ├── id, name, description
//! ├── ingredients: Vec<RecipeIngredient> (catalog id + amount)
//! ├── mode, target_value
//! └── estimates: Option<CalculationResult>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mead_core::recipe::Recipe;
//!
//! let mut recipe = Recipe::new("Traditional Clover");
//! recipe.add_ingredient(1, 1500.0);
//! recipe.add_ingredient(41, 3500.0);
//!
//! let json = serde_json::to_string_pretty(&recipe).unwrap();
//! assert!(json.contains("Traditional Clover"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::abv::{CalculationMode, CalculationResult};

/// Current schema version for .mead files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root recipe document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub meta: RecipeMeta,

    pub id: Uuid,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Ingredient lines, in the order they were added
    pub ingredients: Vec<RecipeIngredient>,

    #[serde(default)]
    pub mode: CalculationMode,

    /// Target ABV (%) or volume (ml) for the solve modes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,

    /// Estimates from the last calculation, cleared whenever inputs change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimates: Option<CalculationResult>,
}

impl Recipe {
    /// Create an empty recipe.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Recipe {
            meta: RecipeMeta {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            ingredients: Vec::new(),
            mode: CalculationMode::default(),
            target_value: None,
            estimates: None,
        }
    }

    /// Append an ingredient line.
    pub fn add_ingredient(&mut self, ingredient_id: u32, amount: f64) {
        self.ingredients.push(RecipeIngredient { ingredient_id, amount });
        self.invalidate();
    }

    /// Change what the recipe solves for.
    pub fn set_mode(&mut self, mode: CalculationMode, target_value: Option<f64>) {
        self.mode = mode;
        self.target_value = target_value;
        self.invalidate();
    }

    /// Store fresh estimates.
    pub fn set_estimates(&mut self, estimates: CalculationResult) {
        self.estimates = Some(estimates);
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    fn invalidate(&mut self) {
        self.estimates = None;
        self.touch();
    }
}

/// Recipe header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMeta {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// A catalog ingredient reference with an amount in the ingredient's unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: u32,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_creation() {
        let recipe = Recipe::new("Orange Blossom Show Mead");
        assert_eq!(recipe.name, "Orange Blossom Show Mead");
        assert_eq!(recipe.meta.version, SCHEMA_VERSION);
        assert_eq!(recipe.mode, CalculationMode::HoneyWeight);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.estimates.is_none());
    }

    #[test]
    fn test_recipe_serialization() {
        let mut recipe = Recipe::new("Cyser");
        recipe.description = "Apple and wildflower".to_string();
        recipe.add_ingredient(2, 1200.0);
        recipe.add_ingredient(31, 2000.0);
        recipe.set_mode(CalculationMode::TargetAbv, Some(13.0));

        let json = serde_json::to_string_pretty(&recipe).unwrap();
        assert!(json.contains("\"ingredient_id\": 31"));
        assert!(json.contains("\"TargetABV\""));
        assert!(!json.contains("estimates"));

        let roundtrip: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, recipe);
    }

    #[test]
    fn test_add_ingredient_keeps_order() {
        let mut recipe = Recipe::new("Test");
        recipe.add_ingredient(1, 1500.0);
        recipe.add_ingredient(41, 3500.0);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].ingredient_id, 1);
        assert_eq!(recipe.ingredients[1].amount, 3500.0);
    }

    #[test]
    fn test_editing_clears_estimates() {
        let mut recipe = Recipe::new("Test");
        recipe.set_estimates(CalculationResult {
            total_volume_ml: 0.0,
            total_fermentable_sugars_grams: 0.0,
            estimated_abv: 0.0,
            estimated_original_gravity: 1.0,
            estimated_final_gravity: 1.0,
            ingredients: Vec::new(),
            calculated_honey_weight_grams: None,
            calculated_volume_ml: None,
            calculated_abv: Some(0.0),
        });
        assert!(recipe.estimates.is_some());

        recipe.add_ingredient(1, 100.0);
        assert!(recipe.estimates.is_none());
    }

    #[test]
    fn test_modified_moves_forward() {
        let mut recipe = Recipe::new("Test");
        let created = recipe.meta.created;
        recipe.add_ingredient(1, 100.0);
        assert!(recipe.meta.modified >= created);
    }
}
