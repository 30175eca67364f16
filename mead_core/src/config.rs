//! # Engine Configuration
//!
//! Every domain constant used by the calculators lives here as a named,
//! tunable value. Defaults reproduce the documented constants exactly, so
//! `EngineConfig::default()` gives the reference behavior.
//!
//! Configuration files are TOML. Every field is optional; missing fields
//! keep their defaults.
//!
//! ```toml
//! [fermentation]
//! efficiency = 0.55
//!
//! [nutrients]
//! organic_fraction = 0.6
//!
//! [nutrients.yeast_multipliers]
//! high = 1.5
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mead_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("[fermentation]\nefficiency = 0.55\n").unwrap();
//! assert_eq!(config.fermentation.efficiency, 0.55);
//! assert_eq!(config.fermentation.ethanol_yield, 0.511);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::LITERS_PER_GALLON;

/// Constants for the ABV/gravity engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FermentationConstants {
    /// Fraction of available sugar the yeast ferments
    pub efficiency: f64,
    /// Grams of ethanol produced per gram of fermented sugar
    pub ethanol_yield: f64,
    /// Specific gravity of ethanol relative to water
    pub ethanol_specific_gravity: f64,
    /// Fermentable sugar fraction of honey by weight (TargetABV solve)
    pub honey_sugar_fraction: f64,
    /// Displaced volume per gram of whole fruit (ml/g)
    pub fruit_volume_ml_per_gram: f64,
    /// Gravity points added per g/L of dissolved sugar, scaled by 1/1000
    pub gravity_factor: f64,
    /// Gravity drop per percent ABV when estimating FG
    pub fg_drop_per_abv: f64,
    /// Lowest final gravity the estimate may report
    pub min_final_gravity: f64,
    /// Target ABV (%) when TargetABV mode gets no target
    pub default_target_abv: f64,
    /// Target volume (ml) when TargetVolume mode gets no target
    pub default_target_volume_ml: f64,
}

impl Default for FermentationConstants {
    fn default() -> Self {
        FermentationConstants {
            efficiency: 0.51,
            ethanol_yield: 0.511,
            ethanol_specific_gravity: 0.789,
            honey_sugar_fraction: 0.80,
            fruit_volume_ml_per_gram: 0.5,
            gravity_factor: 0.04,
            fg_drop_per_abv: 0.00125,
            min_final_gravity: 0.990,
            default_target_abv: 12.0,
            default_target_volume_ml: 10_000.0,
        }
    }
}

/// YAN multipliers per yeast nitrogen demand class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YeastMultipliers {
    pub extra_low: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for YeastMultipliers {
    fn default() -> Self {
        YeastMultipliers {
            extra_low: 0.5,
            low: 0.75,
            medium: 0.90,
            high: 1.25,
        }
    }
}

/// Constants for the YAN calculation and SNA scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientConstants {
    /// Share of required YAN delivered as organic nitrogen (rest is inorganic)
    pub organic_fraction: f64,
    /// Go Ferm PE rehydration dose (g/L)
    pub go_ferm_grams_per_liter: f64,
    /// YAN (PPM) credited per gram of the Go Ferm rehydration dose
    pub go_ferm_yan_factor: f64,
    /// Fermaid O yield (PPM per g/L)
    pub fermaid_o_ppm_per_gram: f64,
    /// Fermaid K yield (PPM per g/L)
    pub fermaid_k_ppm_per_gram: f64,
    /// DAP yield (PPM per g/L)
    pub dap_ppm_per_gram: f64,
    /// Liters per US gallon for batch conversion
    pub liters_per_gallon: f64,
    /// Floor on the number of staggered inorganic steps
    pub min_staggered_steps: u32,
    /// Step slots reserved for the rehydration and organic additions
    pub reserved_steps: u32,
    /// Day after pitch of the first staggered addition
    pub first_staggered_day: u32,
    /// Multiplier table by yeast class
    pub yeast_multipliers: YeastMultipliers,
}

impl Default for NutrientConstants {
    fn default() -> Self {
        NutrientConstants {
            organic_fraction: 0.70,
            go_ferm_grams_per_liter: 2.64,
            go_ferm_yan_factor: 0.30,
            fermaid_o_ppm_per_gram: 40.0,
            fermaid_k_ppm_per_gram: 100.0,
            dap_ppm_per_gram: 210.0,
            liters_per_gallon: LITERS_PER_GALLON,
            min_staggered_steps: 2,
            reserved_steps: 2,
            first_staggered_day: 2,
            yeast_multipliers: YeastMultipliers::default(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fermentation: FermentationConstants,
    pub nutrients: NutrientConstants,
}

impl EngineConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(contents: &str) -> CalcResult<Self> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| CalcError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("read config", path.display().to_string(), e.to_string())
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    /// Render as TOML (used by `mead config` to print the effective values).
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))
    }

    /// Reject values that would make the formulas divide by zero or flip sign.
    pub fn validate(&self) -> CalcResult<()> {
        let f = &self.fermentation;
        let n = &self.nutrients;

        let positive = [
            ("fermentation.efficiency", f.efficiency),
            ("fermentation.ethanol_yield", f.ethanol_yield),
            ("fermentation.ethanol_specific_gravity", f.ethanol_specific_gravity),
            ("fermentation.honey_sugar_fraction", f.honey_sugar_fraction),
            ("nutrients.fermaid_o_ppm_per_gram", n.fermaid_o_ppm_per_gram),
            ("nutrients.fermaid_k_ppm_per_gram", n.fermaid_k_ppm_per_gram),
            ("nutrients.dap_ppm_per_gram", n.dap_ppm_per_gram),
            ("nutrients.liters_per_gallon", n.liters_per_gallon),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be greater than 0"));
            }
        }

        let fractions = [
            ("fermentation.efficiency", f.efficiency),
            ("fermentation.honey_sugar_fraction", f.honey_sugar_fraction),
            ("nutrients.organic_fraction", n.organic_fraction),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be between 0 and 1"));
            }
        }

        if n.min_staggered_steps == 0 {
            return Err(CalcError::invalid_input(
                "nutrients.min_staggered_steps",
                "0",
                "At least one staggered step is required",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.fermentation.efficiency, 0.51);
        assert_eq!(config.fermentation.honey_sugar_fraction, 0.80);
        assert_eq!(config.nutrients.organic_fraction, 0.70);
        assert_eq!(config.nutrients.go_ferm_grams_per_liter, 2.64);
        assert_eq!(config.nutrients.dap_ppm_per_gram, 210.0);
        assert_eq!(config.nutrients.yeast_multipliers.high, 1.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [nutrients]
            organic_fraction = 0.6

            [nutrients.yeast_multipliers]
            high = 1.5
        "#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.nutrients.organic_fraction, 0.6);
        assert_eq!(config.nutrients.yeast_multipliers.high, 1.5);
        assert_eq!(config.nutrients.yeast_multipliers.low, 0.75);
        assert_eq!(config.fermentation, FermentationConstants::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("[fermentation]\nethanol_specific_gravity = 0.0\n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = EngineConfig::from_toml_str("[nutrients]\norganic_fraction = 1.5\n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = EngineConfig::from_toml_str("[nutrients]\nmin_staggered_steps = 0\n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("[fermentation\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
