//! # Units and Rounding
//!
//! Lightweight newtype wrappers for the quantities the calculator moves
//! around, plus the rounding and percentage helpers shared by the ABV
//! engine and the nutrient scheduler.
//!
//! Wrappers serialize as bare numbers (`#[serde(transparent)]`), so JSON
//! stays clean while the Rust API keeps grams and milliliters apart.
//!
//! ## Conventions
//!
//! - Sugar and additive masses: grams (g)
//! - Must volumes: milliliters (ml) in the ABV engine, liters (L) in the
//!   nutrient scheduler, US gallons for batch sizes
//! - Nitrogen: parts per million (PPM, equivalent to mg/L)
//! - Rounding: half away from zero ([`round_to`])
//!
//! ## Example
//!
//! ```rust
//! use mead_core::units::{Gallons, Liters, Milliliters, round_to};
//!
//! let liters = Gallons(5.0).to_liters(3.785);
//! assert!((liters.0 - 18.925).abs() < 1e-9);
//!
//! let l: Liters = Milliliters(3500.0).into();
//! assert_eq!(l.0, 3.5);
//!
//! assert_eq!(round_to(11.3247, 2), 11.32);
//! ```

use serde::{Deserialize, Serialize};

/// Liters per US gallon as used throughout the nutrient calculations
pub const LITERS_PER_GALLON: f64 = 3.785;

/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;

// ============================================================================
// Mass
// ============================================================================

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

// ============================================================================
// Volume
// ============================================================================

/// Volume in milliliters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliliters(pub f64);

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

/// Volume in US gallons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gallons(pub f64);

impl From<Milliliters> for Liters {
    fn from(ml: Milliliters) -> Self {
        Liters(ml.0 / ML_PER_LITER)
    }
}

impl Gallons {
    /// Convert with an explicit liters-per-gallon factor (configurable in the scheduler)
    pub fn to_liters(self, liters_per_gallon: f64) -> Liters {
        Liters(self.0 * liters_per_gallon)
    }
}

// ============================================================================
// Concentration
// ============================================================================

/// Mass concentration in grams per liter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GramsPerLiter(pub f64);

impl GramsPerLiter {
    /// Concentration of `mass` dissolved in `volume`; zero for an empty volume
    pub fn of(mass: Grams, volume: Liters) -> Self {
        if volume.0 == 0.0 {
            GramsPerLiter(0.0)
        } else {
            GramsPerLiter(mass.0 / volume.0)
        }
    }
}

// ============================================================================
// Rounding and percentages
// ============================================================================

/// Round to `decimals` places, half away from zero.
///
/// ```rust
/// use mead_core::units::round_to;
///
/// assert_eq!(round_to(1.01374, 4), 1.0137);
/// assert_eq!(round_to(-2.5, 0), -3.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Convert a percentage (0-100) to a fraction (0-1)
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Convert a fraction (0-1) to a percentage (0-100)
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// `part` as a percentage of `whole`, or 0 when `whole` is not positive
pub fn share_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        fraction_to_percent(part / whole)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallons_to_liters() {
        let l = Gallons(1.0).to_liters(LITERS_PER_GALLON);
        assert_eq!(l.0, 3.785);
    }

    #[test]
    fn test_milliliters_to_liters() {
        let l: Liters = Milliliters(750.0).into();
        assert_eq!(l.0, 0.75);
    }

    #[test]
    fn test_custom_gallon_factor() {
        let l = Gallons(2.0).to_liters(4.0);
        assert_eq!(l.0, 8.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert_eq!(round_to(1.00004, 4), 1.0);
        assert_eq!(round_to(206.01, 1), 206.0);
    }

    #[test]
    fn test_percentages() {
        assert_eq!(percent_to_fraction(80.0), 0.8);
        assert_eq!(fraction_to_percent(0.7), 70.0);
        assert_eq!(share_percent(25.0, 100.0), 25.0);
        assert_eq!(share_percent(25.0, 0.0), 0.0);
    }

    #[test]
    fn test_concentration_empty_volume() {
        assert_eq!(GramsPerLiter::of(Grams(10.0), Liters(0.0)).0, 0.0);
        assert_eq!(GramsPerLiter::of(Grams(10.0), Liters(4.0)).0, 2.5);
    }

    #[test]
    fn test_serialization() {
        let gpl = GramsPerLiter(0.25);
        let json = serde_json::to_string(&gpl).unwrap();
        assert_eq!(json, "0.25");

        let parsed: GramsPerLiter = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, gpl);
    }
}
