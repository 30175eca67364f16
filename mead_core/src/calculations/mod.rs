//! # Fermentation Calculations
//!
//! The two calculation families. Each follows the pattern:
//!
//! - `*Input` / `*Request` - Input parameters (JSON-serializable)
//! - `*Result` / `*Schedule` - Results (JSON-serializable)
//! - `calculate*(input)` - Pure function using the reference constants
//! - `calculate*_with(input, &constants)` - Same, with tuned constants
//!
//! The functions never fail: degenerate inputs (zero volume, zero sugar)
//! have defined results. Input validation lives in [`crate::service`].
//!
//! ## Available Calculations
//!
//! - [`abv`] - ABV, original and final gravity, honey for a target ABV
//! - [`nutrients`] - YAN requirement and staggered nutrient schedule

pub mod abv;
pub mod nutrients;

// Re-export commonly used types
pub use abv::{
    CalculationInput, CalculationMode, CalculationResult, IngredientBreakdown, IngredientQuantity,
    IngredientType,
};
pub use nutrients::{
    AdditionItem, AdditiveTotals, NutrientType, SnaAddition, SnaRequest, SnaSchedule, YanInput,
    YanResult, YeastNitrogenClass,
};
