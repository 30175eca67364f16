//! # Calculator Service
//!
//! The validating front door to the calculators. `MeadService` owns the
//! engine configuration and the ingredient catalog, rejects requests the
//! engine has no meaningful answer for, and turns catalog references into
//! engine inputs.
//!
//! Engine functions never fail; every error a caller sees comes from here.
//!
//! ## Example
//!
//! ```rust
//! use mead_core::service::MeadService;
//! use mead_core::recipe::RecipeIngredient;
//! use mead_core::calculations::abv::{CalculationInput, CalculationMode};
//!
//! let service = MeadService::builtin().unwrap();
//! let ingredients = service
//!     .resolve(&[
//!         RecipeIngredient { ingredient_id: 1, amount: 1500.0 },
//!         RecipeIngredient { ingredient_id: 41, amount: 3500.0 },
//!     ])
//!     .unwrap();
//!
//! let result = service
//!     .calculate(&CalculationInput {
//!         ingredients,
//!         mode: CalculationMode::HoneyWeight,
//!         target_value: None,
//!     })
//!     .unwrap();
//! assert_eq!(result.estimated_abv, 11.32);
//! ```

use crate::calculations::abv::{self, CalculationInput, CalculationResult, IngredientQuantity, IngredientType};
use crate::calculations::nutrients::{self, SnaRequest, SnaSchedule, YanInput, YanResult};
use crate::catalog::{AdditiveCatalog, Ingredient, IngredientCatalog, IngredientRepository, NutrientAdditive};
use crate::config::EngineConfig;
use crate::errors::{CalcError, CalcResult};
use crate::recipe::{Recipe, RecipeIngredient};
use crate::units::Gallons;

/// Validating facade over the calculators and catalogs.
#[derive(Debug, Clone)]
pub struct MeadService<R: IngredientRepository = IngredientCatalog> {
    config: EngineConfig,
    ingredients: R,
    additives: AdditiveCatalog,
}

impl MeadService<IngredientCatalog> {
    /// Service over the built-in catalog and reference constants.
    pub fn builtin() -> CalcResult<Self> {
        Ok(Self::new(IngredientCatalog::builtin()?, EngineConfig::default()))
    }
}

impl<R: IngredientRepository> MeadService<R> {
    pub fn new(ingredients: R, config: EngineConfig) -> Self {
        MeadService {
            config,
            ingredients,
            additives: AdditiveCatalog::builtin().clone(),
        }
    }

    /// Replace the built-in additive table.
    pub fn with_additives(mut self, additives: AdditiveCatalog) -> Self {
        self.additives = additives;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ingredients(&self) -> &R {
        &self.ingredients
    }

    // ------------------------------------------------------------------------
    // ABV / gravity
    // ------------------------------------------------------------------------

    /// Estimate ABV and gravity.
    ///
    /// Rejects an empty ingredient list, negative or non-finite amounts,
    /// sugar content outside 0-100%, and a negative or non-finite target.
    pub fn calculate(&self, input: &CalculationInput) -> CalcResult<CalculationResult> {
        if input.ingredients.is_empty() {
            return Err(CalcError::invalid_input(
                "ingredients",
                "[]",
                "At least one ingredient is required",
            ));
        }
        for (index, line) in input.ingredients.iter().enumerate() {
            validate_line(index, line)?;
        }
        if let Some(target) = input.target_value {
            if !(target.is_finite() && target >= 0.0) {
                return Err(CalcError::invalid_input(
                    "target_value",
                    target.to_string(),
                    "Target must be a non-negative number",
                ));
            }
        }

        let result = abv::calculate_with(input, &self.config.fermentation);
        tracing::info!(
            mode = ?input.mode,
            ingredients = input.ingredients.len(),
            abv = result.estimated_abv,
            og = result.estimated_original_gravity,
            "calculated fermentation estimate"
        );
        Ok(result)
    }

    /// Turn catalog references into engine input lines.
    pub fn resolve(&self, lines: &[RecipeIngredient]) -> CalcResult<Vec<IngredientQuantity>> {
        lines
            .iter()
            .map(|line| -> CalcResult<IngredientQuantity> {
                Ok(self.ingredient(line.ingredient_id)?.quantity(line.amount))
            })
            .collect()
    }

    /// Resolve and calculate a recipe, storing the estimates on it.
    pub fn calculate_recipe(&self, recipe: &mut Recipe) -> CalcResult<CalculationResult> {
        let input = CalculationInput {
            ingredients: self.resolve(&recipe.ingredients)?,
            mode: recipe.mode,
            target_value: recipe.target_value,
        };
        let result = self.calculate(&input)?;
        recipe.set_estimates(result.clone());
        Ok(result)
    }

    // ------------------------------------------------------------------------
    // Nutrients
    // ------------------------------------------------------------------------

    /// Required YAN for a must. Rejects negative, infinite or NaN existing YAN.
    pub fn calculate_yan(&self, input: &YanInput) -> CalcResult<YanResult> {
        if !(input.existing_yan >= 0.0 && input.existing_yan.is_finite()) {
            return Err(CalcError::invalid_input(
                "existing_yan",
                input.existing_yan.to_string(),
                "Existing YAN must be a non-negative number",
            ));
        }

        let result = nutrients::calculate_yan_with(input, &self.config.nutrients);
        tracing::info!(
            yeast = result.yeast_class_label.as_str(),
            required_yan = result.required_yan,
            "calculated YAN requirement"
        );
        Ok(result)
    }

    /// Build a staggered nutrient schedule.
    ///
    /// Rejects a non-positive batch size and a request with every additive
    /// switched off. Warns when a staggered step ends up with no additive or
    /// when a total goes past a product's commercial dose ceiling.
    pub fn generate_sna_schedule(&self, request: &SnaRequest) -> CalcResult<SnaSchedule> {
        if !(request.batch_size_gallons > 0.0) {
            return Err(CalcError::invalid_input(
                "batch_size_gallons",
                request.batch_size_gallons.to_string(),
                "Batch size must be greater than 0",
            ));
        }
        if !request.any_additive() {
            return Err(CalcError::invalid_input(
                "additives",
                "none",
                "Select at least one nutrient additive",
            ));
        }

        let schedule = nutrients::generate_sna_schedule_with(request, &self.config.nutrients);

        for step in schedule.empty_steps() {
            tracing::warn!(
                sequence = step.sequence_number,
                yan_ppm = step.total_yan_ppm,
                "staggered step has no usable additive; its YAN is scheduled but not delivered"
            );
        }

        let batch = Gallons(request.batch_size_gallons).to_liters(self.config.nutrients.liters_per_gallon);
        for over in self.additives.limit_exceedances(&schedule.total_additives_by_type, batch) {
            tracing::warn!(
                additive = %over.nutrient_type,
                grams_per_liter = over.grams_per_liter,
                limit = over.limit_grams_per_liter,
                "dose exceeds commercial limit"
            );
        }

        tracing::info!(
            batch_gallons = request.batch_size_gallons,
            additions = schedule.additions.len(),
            total_yan = schedule.total_yan,
            "generated nutrient schedule"
        );
        Ok(schedule)
    }

    /// The nutrient additive catalog.
    pub fn available_additives(&self) -> &[NutrientAdditive] {
        self.additives.all()
    }

    pub fn additive_catalog(&self) -> &AdditiveCatalog {
        &self.additives
    }

    // ------------------------------------------------------------------------
    // Catalog queries
    // ------------------------------------------------------------------------

    pub fn all_ingredients(&self) -> &[Ingredient] {
        self.ingredients.all()
    }

    /// Ingredient by id, or `IngredientNotFound`.
    pub fn ingredient(&self, id: u32) -> CalcResult<&Ingredient> {
        self.ingredients
            .by_id(id)
            .ok_or_else(|| CalcError::ingredient_not_found(id))
    }

    pub fn ingredients_by_type(&self, ingredient_type: IngredientType) -> Vec<&Ingredient> {
        self.ingredients.by_type(ingredient_type)
    }
}

fn validate_line(index: usize, line: &IngredientQuantity) -> CalcResult<()> {
    if !(line.amount.is_finite() && line.amount >= 0.0) {
        return Err(CalcError::invalid_input(
            format!("ingredients[{}].amount", index),
            line.amount.to_string(),
            "Amount must be a non-negative number",
        ));
    }
    if !(0.0..=100.0).contains(&line.sugar_content_percentage) {
        return Err(CalcError::invalid_input(
            format!("ingredients[{}].sugar_content_percentage", index),
            line.sugar_content_percentage.to_string(),
            "Sugar content must be between 0 and 100%",
        ));
    }
    Ok(())
}
