//! # mead_core - Mead Fermentation Calculation Engine
//!
//! `mead_core` estimates the chemistry of a mead (honey wine) batch: alcohol
//! by volume and gravity from an ingredient list, and the yeast nitrogen a
//! must needs along with a staggered nutrient addition (SNA) schedule to
//! deliver it. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Tunable**: Every formula constant lives in [`config::EngineConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use mead_core::calculations::abv::{calculate, CalculationInput, CalculationMode, IngredientQuantity};
//!
//! let result = calculate(&CalculationInput {
//!     ingredients: vec![
//!         IngredientQuantity::honey("Clover Honey", 1500.0, 80.0),
//!         IngredientQuantity::water(3500.0),
//!     ],
//!     mode: CalculationMode::HoneyWeight,
//!     target_value: None,
//! });
//!
//! assert_eq!(result.estimated_abv, 11.32);
//! assert_eq!(result.estimated_original_gravity, 1.0137);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - ABV/gravity engine and YAN/SNA scheduler
//! - [`catalog`] - Ingredient and nutrient additive reference data
//! - [`service`] - Validating facade used by front ends
//! - [`recipe`] - Saved recipe documents
//! - [`config`] - Tunable engine constants
//! - [`units`] - Type-safe unit wrappers and rounding
//! - [`errors`] - Structured error types
//! - [`file_io`] - Recipe files with atomic saves

pub mod calculations;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod recipe;
pub mod service;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::EngineConfig;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_recipe, save_recipe};
pub use recipe::{Recipe, RecipeIngredient, RecipeMeta};
pub use service::MeadService;
