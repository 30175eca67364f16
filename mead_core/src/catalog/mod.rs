//! # Reference Catalogs
//!
//! Read-only reference data supplied to the calculators: the ingredient
//! catalog and the nutrient additive catalog. Both are built once and shared
//! by reference; nothing here mutates after construction.
//!
//! Code that only needs ingredient lookups takes an
//! [`IngredientRepository`], so tests and alternative data sources can stand
//! in for the built-in catalog.

pub mod additives;
pub mod ingredients;

pub use additives::{AdditiveCatalog, LimitExceedance, NutrientAdditive};
pub use ingredients::{Ingredient, IngredientCatalog};

use crate::calculations::abv::IngredientType;

/// Read-only access to ingredient reference data.
pub trait IngredientRepository {
    /// Every ingredient, in catalog order
    fn all(&self) -> &[Ingredient];

    fn by_id(&self, id: u32) -> Option<&Ingredient>;

    fn by_type(&self, ingredient_type: IngredientType) -> Vec<&Ingredient>;
}
