//! # Nutrient Additive Catalog
//!
//! The four commercial nutrient products the scheduler doses, with their
//! nitrogen content and recommended dose ceilings.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::calculations::nutrients::{AdditiveTotals, NutrientType};
use crate::units::{GramsPerLiter, Liters};

/// Marker for "no commercial dose limit"
pub const UNLIMITED: f64 = -1.0;

/// Reference data for one nutrient product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientAdditive {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub nutrient_type: NutrientType,
    /// Nitrogen content, percent by weight
    pub nitrogen_content_percent: f64,
    /// YAN added by 1 g/L (PPM), nitrogen percent x 10
    pub ppm_per_gram: f64,
    pub description: String,
    pub is_organic: bool,
    pub is_inorganic: bool,
    /// Manufacturer dose ceiling (g/L), [`UNLIMITED`] when there is none
    pub max_commercial_limit_grams_per_liter: f64,
}

impl NutrientAdditive {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: u32,
        name: &str,
        nutrient_type: NutrientType,
        nitrogen_content_percent: f64,
        description: &str,
        is_organic: bool,
        is_inorganic: bool,
        max_commercial_limit_grams_per_liter: f64,
    ) -> Self {
        NutrientAdditive {
            id,
            name: name.to_string(),
            nutrient_type,
            nitrogen_content_percent,
            ppm_per_gram: nitrogen_content_percent * 10.0,
            description: description.to_string(),
            is_organic,
            is_inorganic,
            max_commercial_limit_grams_per_liter,
        }
    }

    /// Dose ceiling, if the product has one
    pub fn commercial_limit(&self) -> Option<GramsPerLiter> {
        if self.max_commercial_limit_grams_per_liter < 0.0 {
            None
        } else {
            Some(GramsPerLiter(self.max_commercial_limit_grams_per_liter))
        }
    }
}

/// A scheduled total that goes past a product's dose ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitExceedance {
    pub nutrient_type: NutrientType,
    pub grams_per_liter: f64,
    pub limit_grams_per_liter: f64,
}

/// Read-only additive catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveCatalog {
    additives: Vec<NutrientAdditive>,
}

static BUILTIN: Lazy<AdditiveCatalog> = Lazy::new(|| AdditiveCatalog {
    additives: vec![
        NutrientAdditive::new(
            1,
            "Go Ferm PE",
            NutrientType::GoFermPe,
            3.0,
            "Micronutrients and organic nitrogen for yeast rehydration",
            true,
            false,
            UNLIMITED,
        ),
        NutrientAdditive::new(
            2,
            "Fermaid O",
            NutrientType::FermaidO,
            4.0,
            "Organic blend of micronutrients and nitrogen (OMRI certified)",
            true,
            false,
            UNLIMITED,
        ),
        NutrientAdditive::new(
            3,
            "Fermaid K",
            NutrientType::FermaidK,
            10.0,
            "Blend of micronutrients with organic and inorganic nitrogen",
            true,
            true,
            0.5,
        ),
        NutrientAdditive::new(
            4,
            "DAP (Diammonium Phosphate)",
            NutrientType::Dap,
            21.0,
            "Concentrated inorganic nitrogen only",
            false,
            true,
            UNLIMITED,
        ),
    ],
});

impl AdditiveCatalog {
    pub fn new(additives: Vec<NutrientAdditive>) -> Self {
        AdditiveCatalog { additives }
    }

    /// The built-in product table
    pub fn builtin() -> &'static AdditiveCatalog {
        &BUILTIN
    }

    pub fn all(&self) -> &[NutrientAdditive] {
        &self.additives
    }

    pub fn by_type(&self, nutrient_type: NutrientType) -> Option<&NutrientAdditive> {
        self.additives.iter().find(|a| a.nutrient_type == nutrient_type)
    }

    pub fn by_id(&self, id: u32) -> Option<&NutrientAdditive> {
        self.additives.iter().find(|a| a.id == id)
    }

    /// Scheduled totals whose concentration in `batch` exceeds the product ceiling.
    pub fn limit_exceedances(&self, totals: &AdditiveTotals, batch: Liters) -> Vec<LimitExceedance> {
        totals
            .iter()
            .filter_map(|total| {
                let limit = self.by_type(total.nutrient_type)?.commercial_limit()?;
                let dose = totals.grams_per_liter(total.nutrient_type, batch)?;
                (dose.0 > limit.0).then_some(LimitExceedance {
                    nutrient_type: total.nutrient_type,
                    grams_per_liter: dose.0,
                    limit_grams_per_liter: limit.0,
                })
            })
            .collect()
    }
}
