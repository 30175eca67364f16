//! # Ingredient Catalog
//!
//! Reference ingredients (honeys, fruits, juices, water) with their typical
//! sugar content. The built-in catalog ships as a TOML data asset compiled
//! into the library; a different catalog file can be loaded at runtime with
//! the same schema.
//!
//! ## Example
//!
//! ```rust
//! use mead_core::catalog::{IngredientCatalog, IngredientRepository};
//! use mead_core::calculations::abv::IngredientType;
//!
//! let catalog = IngredientCatalog::builtin().unwrap();
//! let clover = catalog.by_id(1).unwrap();
//! assert_eq!(clover.name, "Clover Honey");
//! assert_eq!(catalog.by_type(IngredientType::Honey).len(), 4);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::IngredientRepository;
use crate::calculations::abv::{IngredientQuantity, IngredientType};
use crate::errors::{CalcError, CalcResult};

const BUILTIN_CATALOG: &str = include_str!("../../data/ingredients.toml");

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub ingredient_type: IngredientType,
    /// Typical sugar content, percent (0-100)
    pub sugar_content_percentage: f64,
    /// "g" for solids, "ml" for liquids
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

impl Ingredient {
    /// Engine input line for `amount` of this ingredient
    pub fn quantity(&self, amount: f64) -> IngredientQuantity {
        IngredientQuantity {
            ingredient_type: self.ingredient_type,
            amount,
            sugar_content_percentage: self.sugar_content_percentage,
            unit: self.unit.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    ingredient: Vec<Ingredient>,
}

/// Read-only ingredient catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngredientCatalog {
    ingredients: Vec<Ingredient>,
}

impl IngredientCatalog {
    /// Catalog compiled into the library.
    pub fn builtin() -> CalcResult<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Build a catalog from entries, rejecting duplicate ids and bad sugar values.
    pub fn new(ingredients: Vec<Ingredient>) -> CalcResult<Self> {
        let mut seen = HashSet::new();
        for ingredient in &ingredients {
            if !seen.insert(ingredient.id) {
                return Err(CalcError::invalid_input(
                    "ingredient.id",
                    ingredient.id.to_string(),
                    "Duplicate ingredient id",
                ));
            }
            if !(0.0..=100.0).contains(&ingredient.sugar_content_percentage) {
                return Err(CalcError::invalid_input(
                    format!("ingredient[{}].sugar_content_percentage", ingredient.id),
                    ingredient.sugar_content_percentage.to_string(),
                    "Sugar content must be between 0 and 100",
                ));
            }
        }
        Ok(IngredientCatalog { ingredients })
    }

    /// Parse a catalog in the `[[ingredient]]` TOML schema.
    pub fn from_toml_str(contents: &str) -> CalcResult<Self> {
        let file: CatalogFile =
            toml::from_str(contents).map_err(|e| CalcError::serialization(e.to_string()))?;
        Self::new(file.ingredient)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("read catalog", path.display().to_string(), e.to_string())
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), count = catalog.len(), "loaded ingredient catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Case-insensitive lookup by name
    pub fn by_name(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl IngredientRepository for IngredientCatalog {
    fn all(&self) -> &[Ingredient] {
        &self.ingredients
    }

    fn by_id(&self, id: u32) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    fn by_type(&self, ingredient_type: IngredientType) -> Vec<&Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.ingredient_type == ingredient_type)
            .collect()
    }
}
