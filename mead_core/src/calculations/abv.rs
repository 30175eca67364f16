//! # ABV and Gravity Estimate
//!
//! Turns a list of ingredient quantities into total fermentable sugar, total
//! must volume, estimated ABV and original/final gravity, plus a mode-specific
//! "solve for X" output.
//!
//! ## Assumptions
//!
//! - Honey and whole fruit are weighed in grams; juice and water are measured in ml
//! - Honey adds sugar but no volume term; the volume comes from liquids and fruit
//! - Whole fruit displaces about 0.5 ml per gram
//! - Yeast and nutrient entries carry no sugar and no volume
//! - A fixed fermentation efficiency (0.51) and ethanol yield (0.511 g/g)
//! - Gravity is a linear approximation, not a Plato/Brix table
//!
//! The engine does no validation. Negative amounts flow through the
//! arithmetic; empty volumes give ABV 0 and gravity 1.0.
//!
//! ## Example
//!
//! ```rust
//! use mead_core::calculations::abv::{calculate, CalculationInput, CalculationMode, IngredientQuantity};
//!
//! let input = CalculationInput {
//!     ingredients: vec![
//!         IngredientQuantity::honey("Clover Honey", 1500.0, 80.0),
//!         IngredientQuantity::water(3500.0),
//!     ],
//!     mode: CalculationMode::HoneyWeight,
//!     target_value: None,
//! };
//!
//! let result = calculate(&input);
//! assert_eq!(result.total_fermentable_sugars_grams, 1200.0);
//! assert_eq!(result.estimated_abv, 11.32);
//! assert_eq!(result.estimated_original_gravity, 1.0137);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::FermentationConstants;
use crate::errors::{CalcError, CalcResult};
use crate::units::{percent_to_fraction, round_to, share_percent, Liters, Milliliters};

/// Kind of ingredient, which decides how its amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientType {
    /// Honey, weighed in grams
    Honey,
    /// Whole fruit, weighed in grams
    Fruit,
    /// Fruit juice, measured in ml
    FruitJuice,
    /// Water, measured in ml
    Water,
    /// Yeast (no sugar, no volume)
    Yeast,
    /// Yeast nutrient (no sugar, no volume)
    Nutrient,
}

impl IngredientType {
    /// All ingredient types in catalog order
    pub const ALL: [IngredientType; 6] = [
        IngredientType::Honey,
        IngredientType::Fruit,
        IngredientType::FruitJuice,
        IngredientType::Water,
        IngredientType::Yeast,
        IngredientType::Nutrient,
    ];

    /// Unit label the amount is expressed in
    pub fn unit(&self) -> &'static str {
        match self {
            IngredientType::FruitJuice | IngredientType::Water => "ml",
            IngredientType::Honey
            | IngredientType::Fruit
            | IngredientType::Yeast
            | IngredientType::Nutrient => "g",
        }
    }

    /// Parse from common string representations (case and separators ignored)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "honey" => Ok(IngredientType::Honey),
            "fruit" => Ok(IngredientType::Fruit),
            "fruitjuice" | "juice" => Ok(IngredientType::FruitJuice),
            "water" => Ok(IngredientType::Water),
            "yeast" => Ok(IngredientType::Yeast),
            "nutrient" => Ok(IngredientType::Nutrient),
            _ => Err(CalcError::unknown_variant("ingredient type", s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            IngredientType::Honey => "Honey",
            IngredientType::Fruit => "Fruit",
            IngredientType::FruitJuice => "Fruit Juice",
            IngredientType::Water => "Water",
            IngredientType::Yeast => "Yeast",
            IngredientType::Nutrient => "Nutrient",
        }
    }
}

impl std::fmt::Display for IngredientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One ingredient line of a calculation request.
///
/// ## JSON Example
///
/// ```json
/// { "type": "Honey", "amount": 1500.0, "sugar_content_percentage": 80.0, "unit": "g", "name": "Clover Honey" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientQuantity {
    /// Ingredient kind
    #[serde(rename = "type")]
    pub ingredient_type: IngredientType,

    /// Amount in grams or ml depending on the type
    pub amount: f64,

    /// Sugar content, percent (0-100)
    pub sugar_content_percentage: f64,

    /// Unit label, echoed into the breakdown
    #[serde(default)]
    pub unit: String,

    /// Display name, echoed into the breakdown
    #[serde(default)]
    pub name: String,
}

impl IngredientQuantity {
    /// Create a quantity with the unit label implied by its type
    pub fn new(
        ingredient_type: IngredientType,
        name: impl Into<String>,
        amount: f64,
        sugar_content_percentage: f64,
    ) -> Self {
        IngredientQuantity {
            ingredient_type,
            amount,
            sugar_content_percentage,
            unit: ingredient_type.unit().to_string(),
            name: name.into(),
        }
    }

    /// Honey by weight (g)
    pub fn honey(name: impl Into<String>, grams: f64, sugar_pct: f64) -> Self {
        Self::new(IngredientType::Honey, name, grams, sugar_pct)
    }

    /// Whole fruit by weight (g)
    pub fn fruit(name: impl Into<String>, grams: f64, sugar_pct: f64) -> Self {
        Self::new(IngredientType::Fruit, name, grams, sugar_pct)
    }

    /// Fruit juice by volume (ml)
    pub fn juice(name: impl Into<String>, ml: f64, sugar_pct: f64) -> Self {
        Self::new(IngredientType::FruitJuice, name, ml, sugar_pct)
    }

    /// Plain water by volume (ml)
    pub fn water(ml: f64) -> Self {
        Self::new(IngredientType::Water, "Water", ml, 0.0)
    }

    /// Sugar grams and volume ml this line contributes to the must
    fn contribution(&self, constants: &FermentationConstants) -> (f64, f64) {
        let sugar = self.amount * percent_to_fraction(self.sugar_content_percentage);
        match self.ingredient_type {
            IngredientType::Honey => (sugar, 0.0),
            IngredientType::Fruit => (sugar, self.amount * constants.fruit_volume_ml_per_gram),
            IngredientType::FruitJuice => (sugar, self.amount),
            IngredientType::Water => (0.0, self.amount),
            IngredientType::Yeast | IngredientType::Nutrient => (0.0, 0.0),
        }
    }
}

/// What the calculation should solve for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalculationMode {
    /// Honey needed to reach a target ABV (%)
    #[serde(rename = "TargetABV", alias = "TargetAbv")]
    TargetAbv,
    /// Batch volume target (ml); echoed back, ingredients are not rescaled
    TargetVolume,
    /// ABV from the honey already listed
    #[default]
    HoneyWeight,
}

impl CalculationMode {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "targetabv" | "abv" => Ok(CalculationMode::TargetAbv),
            "targetvolume" | "volume" => Ok(CalculationMode::TargetVolume),
            "honeyweight" | "honey" => Ok(CalculationMode::HoneyWeight),
            _ => Err(CalcError::unknown_variant("calculation mode", s)),
        }
    }
}

/// A calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Ingredient lines (the caller rejects empty lists)
    pub ingredients: Vec<IngredientQuantity>,

    /// Solve mode
    #[serde(default)]
    pub mode: CalculationMode,

    /// Target ABV (%) or target volume (ml) depending on mode
    #[serde(default)]
    pub target_value: Option<f64>,
}

/// Per-ingredient sugar contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientBreakdown {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// Sugar contributed (g)
    pub sugar_grams: f64,
    /// Share of the total sugar, percent
    pub sugar_percentage_of_total: f64,
}

/// Results of an ABV/gravity calculation.
///
/// The `calculated_*` fields depend on the mode and are omitted from JSON
/// when they do not apply.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_volume_ml": 3500.0,
///   "total_fermentable_sugars_grams": 1200.0,
///   "estimated_abv": 11.32,
///   "estimated_original_gravity": 1.0137,
///   "estimated_final_gravity": 0.9996,
///   "ingredients": [ ... ],
///   "calculated_abv": 11.32
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_volume_ml: f64,
    pub total_fermentable_sugars_grams: f64,
    /// Estimated ABV (%), 2 decimals
    pub estimated_abv: f64,
    /// Estimated OG, 4 decimals
    pub estimated_original_gravity: f64,
    /// Estimated FG, 4 decimals, never below the configured floor
    pub estimated_final_gravity: f64,
    pub ingredients: Vec<IngredientBreakdown>,

    /// Additional honey (g) needed for the target ABV
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_honey_weight_grams: Option<f64>,
    /// Target volume (ml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_volume_ml: Option<f64>,
    /// Target or estimated ABV (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_abv: Option<f64>,
}

/// Estimate ABV and gravity with the reference constants.
pub fn calculate(input: &CalculationInput) -> CalculationResult {
    calculate_with(input, &FermentationConstants::default())
}

/// Estimate ABV and gravity with tuned constants.
pub fn calculate_with(input: &CalculationInput, constants: &FermentationConstants) -> CalculationResult {
    let mut total_sugar_grams = 0.0;
    let mut total_volume_ml = 0.0;
    let mut breakdowns = Vec::with_capacity(input.ingredients.len());

    for ingredient in &input.ingredients {
        let (sugar_grams, volume_ml) = ingredient.contribution(constants);
        total_sugar_grams += sugar_grams;
        total_volume_ml += volume_ml;

        breakdowns.push(IngredientBreakdown {
            name: ingredient.name.clone(),
            amount: ingredient.amount,
            unit: ingredient.unit.clone(),
            sugar_grams,
            sugar_percentage_of_total: 0.0,
        });
    }

    // Shares need the final total
    for breakdown in &mut breakdowns {
        breakdown.sugar_percentage_of_total = share_percent(breakdown.sugar_grams, total_sugar_grams);
    }

    let estimated_abv = calculate_abv_with(total_sugar_grams, total_volume_ml, constants);
    let estimated_original_gravity = calculate_gravity_with(total_sugar_grams, total_volume_ml, constants);
    let estimated_final_gravity = final_gravity(estimated_original_gravity, estimated_abv, constants);

    let mut result = CalculationResult {
        total_volume_ml,
        total_fermentable_sugars_grams: total_sugar_grams,
        estimated_abv,
        estimated_original_gravity,
        estimated_final_gravity,
        ingredients: breakdowns,
        calculated_honey_weight_grams: None,
        calculated_volume_ml: None,
        calculated_abv: None,
    };

    match input.mode {
        CalculationMode::TargetAbv => {
            let target_abv = input.target_value.unwrap_or(constants.default_target_abv);
            if total_volume_ml != 0.0 {
                let honey = honey_for_target_abv(target_abv, total_volume_ml, total_sugar_grams, constants);
                result.calculated_honey_weight_grams = Some(honey);
                result.calculated_abv = Some(target_abv);
            }
        }
        CalculationMode::TargetVolume => {
            let target_volume_ml = input.target_value.unwrap_or(constants.default_target_volume_ml);
            if total_volume_ml > 0.0 {
                result.calculated_volume_ml = Some(target_volume_ml);
            }
        }
        CalculationMode::HoneyWeight => {
            result.calculated_abv = Some(estimated_abv);
        }
    }

    tracing::debug!(
        mode = ?input.mode,
        ingredients = input.ingredients.len(),
        total_sugar_grams,
        total_volume_ml,
        estimated_abv,
        "fermentation estimate calculated"
    );

    result
}

/// ABV (%) from fermentable sugar (g) in a volume (ml), reference constants.
///
/// Returns 0 for an empty volume.
///
/// ```rust
/// use mead_core::calculations::abv::calculate_abv;
///
/// assert_eq!(calculate_abv(1200.0, 3500.0), 11.32);
/// assert_eq!(calculate_abv(1200.0, 0.0), 0.0);
/// ```
pub fn calculate_abv(sugar_grams: f64, volume_ml: f64) -> f64 {
    calculate_abv_with(sugar_grams, volume_ml, &FermentationConstants::default())
}

/// ABV (%) with tuned constants, rounded to 2 decimals.
///
/// `ABV = (sugar * efficiency * yield / volume) / ethanol_sg * 100`
pub fn calculate_abv_with(sugar_grams: f64, volume_ml: f64, constants: &FermentationConstants) -> f64 {
    if volume_ml == 0.0 {
        return 0.0;
    }

    let fermented_sugar = sugar_grams * constants.efficiency;
    let ethanol_grams = fermented_sugar * constants.ethanol_yield;
    let abv = (ethanol_grams / volume_ml) / constants.ethanol_specific_gravity * 100.0;

    round_to(abv, 2)
}

/// Original gravity from sugar (g) in a volume (ml), reference constants.
///
/// Returns 1.0 for an empty volume.
pub fn calculate_gravity(sugar_grams: f64, volume_ml: f64) -> f64 {
    calculate_gravity_with(sugar_grams, volume_ml, &FermentationConstants::default())
}

/// Original gravity with tuned constants, rounded to 4 decimals.
///
/// `OG = 1 + (sugar g/L / 1000) * gravity_factor`
pub fn calculate_gravity_with(sugar_grams: f64, volume_ml: f64, constants: &FermentationConstants) -> f64 {
    if volume_ml == 0.0 {
        return 1.0;
    }

    let liters: Liters = Milliliters(volume_ml).into();
    let grams_per_liter = sugar_grams / liters.0;
    let og = 1.0 + (grams_per_liter / 1000.0) * constants.gravity_factor;

    round_to(og, 4)
}

/// FG = OG - ABV * drop, floored at the minimum final gravity
fn final_gravity(original_gravity: f64, abv: f64, constants: &FermentationConstants) -> f64 {
    let fg = original_gravity - abv * constants.fg_drop_per_abv;
    round_to(fg.max(constants.min_final_gravity), 4)
}

/// Honey (g) to add so the must reaches `target_abv`, never negative
fn honey_for_target_abv(
    target_abv: f64,
    volume_ml: f64,
    current_sugar_grams: f64,
    constants: &FermentationConstants,
) -> f64 {
    let required_ethanol = target_abv * volume_ml * constants.ethanol_specific_gravity / 100.0;
    let required_sugar = required_ethanol / (constants.ethanol_yield * constants.efficiency);
    let shortfall = required_sugar - current_sugar_grams;
    let honey = shortfall / constants.honey_sugar_fraction;

    round_to(honey.max(0.0), 2)
}
