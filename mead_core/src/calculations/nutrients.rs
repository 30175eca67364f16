//! # YAN Requirement and Staggered Nutrient Additions
//!
//! Estimates the yeast assimilable nitrogen (YAN) a must needs and spreads
//! it over a timed sequence of nutrient additions (SNA).
//!
//! ## Schedule shape
//!
//! 1. **Rehydration** (Go Ferm PE): a fixed 2.64 g/L dose layered on top of
//!    the computed requirement.
//! 2. **Post-lag organic** (Fermaid O): the whole organic share (70%).
//! 3. **Staggered inorganic steps**: the inorganic share (30%) split evenly
//!    over `max(2, number_of_steps - 2)` daily steps. DAP on every step but
//!    the last, Fermaid K on the last (or on all of them without DAP).
//!
//! A staggered step with no usable additive keeps its PPM share in the
//! schedule totals but carries no items. [`SnaSchedule::delivered_yan`]
//! reports what the items actually deliver.
//!
//! ## Example
//!
//! ```rust
//! use mead_core::calculations::nutrients::{calculate_yan, YanInput, YeastNitrogenClass};
//!
//! let result = calculate_yan(&YanInput {
//!     specific_gravity: 1.090,
//!     brix: 21.0,
//!     yeast_class: YeastNitrogenClass::Medium,
//!     existing_yan: 0.0,
//! });
//!
//! assert!((result.total_sugar_per_liter - 228.9).abs() < 1e-9);
//! assert!((result.required_yan - 206.01).abs() < 1e-9);
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::NutrientConstants;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Gallons, GramsPerLiter, Grams, Liters};

/// Yeast nitrogen demand class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YeastNitrogenClass {
    ExtraLow,
    #[default]
    Low,
    Medium,
    High,
}

impl YeastNitrogenClass {
    pub const ALL: [YeastNitrogenClass; 4] = [
        YeastNitrogenClass::ExtraLow,
        YeastNitrogenClass::Low,
        YeastNitrogenClass::Medium,
        YeastNitrogenClass::High,
    ];

    /// YAN multiplier for this class
    pub fn multiplier(&self, constants: &NutrientConstants) -> f64 {
        let table = &constants.yeast_multipliers;
        match self {
            YeastNitrogenClass::ExtraLow => table.extra_low,
            YeastNitrogenClass::Low => table.low,
            YeastNitrogenClass::Medium => table.medium,
            YeastNitrogenClass::High => table.high,
        }
    }

    /// Short label as reported in results ("ExtraLow", "Medium", ...)
    pub fn label(&self) -> &'static str {
        match self {
            YeastNitrogenClass::ExtraLow => "ExtraLow",
            YeastNitrogenClass::Low => "Low",
            YeastNitrogenClass::Medium => "Medium",
            YeastNitrogenClass::High => "High",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "extralow" | "xl" | "verylow" => Ok(YeastNitrogenClass::ExtraLow),
            "low" => Ok(YeastNitrogenClass::Low),
            "medium" | "med" | "moderate" => Ok(YeastNitrogenClass::Medium),
            "high" => Ok(YeastNitrogenClass::High),
            _ => Err(CalcError::unknown_variant("yeast nitrogen class", s)),
        }
    }
}

impl std::fmt::Display for YeastNitrogenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Nutrient additive products the scheduler doses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutrientType {
    #[serde(rename = "GoFermPE")]
    GoFermPe,
    FermaidK,
    FermaidO,
    #[serde(rename = "DAP")]
    Dap,
}

impl NutrientType {
    pub const ALL: [NutrientType; 4] = [
        NutrientType::GoFermPe,
        NutrientType::FermaidK,
        NutrientType::FermaidO,
        NutrientType::Dap,
    ];

    /// Name used on schedule items
    pub fn display_name(&self) -> &'static str {
        match self {
            NutrientType::GoFermPe => "Go Ferm PE",
            NutrientType::FermaidK => "Fermaid K",
            NutrientType::FermaidO => "Fermaid O",
            NutrientType::Dap => "DAP",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "gofermpe" | "goferm" => Ok(NutrientType::GoFermPe),
            "fermaidk" | "k" => Ok(NutrientType::FermaidK),
            "fermaido" | "o" => Ok(NutrientType::FermaidO),
            "dap" | "diammoniumphosphate" => Ok(NutrientType::Dap),
            _ => Err(CalcError::unknown_variant("nutrient type", s)),
        }
    }
}

impl std::fmt::Display for NutrientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// YAN requirement
// ============================================================================

/// Must chemistry for a YAN estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YanInput {
    pub specific_gravity: f64,
    pub brix: f64,
    pub yeast_class: YeastNitrogenClass,
    /// Nitrogen already present in the must (PPM)
    #[serde(default)]
    pub existing_yan: f64,
}

/// YAN requirement for a must.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YanResult {
    /// Approximate dissolved sugar (g/L) = Brix * SG * 10
    pub total_sugar_per_liter: f64,
    /// Nitrogen still needed after existing YAN (PPM), never negative
    pub required_yan: f64,
    pub yeast_multiplier: f64,
    pub yeast_class_label: String,
}

/// Required YAN with the reference constants.
pub fn calculate_yan(input: &YanInput) -> YanResult {
    calculate_yan_with(input, &NutrientConstants::default())
}

/// Required YAN with tuned constants.
pub fn calculate_yan_with(input: &YanInput, constants: &NutrientConstants) -> YanResult {
    let total_sugar_per_liter = input.brix * input.specific_gravity * 10.0;
    let yeast_multiplier = input.yeast_class.multiplier(constants);
    let required_yan = (total_sugar_per_liter * yeast_multiplier - input.existing_yan).max(0.0);

    YanResult {
        total_sugar_per_liter,
        required_yan,
        yeast_multiplier,
        yeast_class_label: input.yeast_class.label().to_string(),
    }
}

// ============================================================================
// SNA schedule
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_steps() -> u32 {
    3
}

/// Request for a staggered nutrient schedule.
///
/// ## JSON Example
///
/// ```json
/// {
///   "specific_gravity": 1.090,
///   "brix": 21.0,
///   "yeast_class": "Medium",
///   "batch_size_gallons": 5.0,
///   "use_dap": false,
///   "number_of_steps": 4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnaRequest {
    pub specific_gravity: f64,
    pub brix: f64,
    pub yeast_class: YeastNitrogenClass,
    /// Batch size in US gallons (the caller rejects values <= 0)
    pub batch_size_gallons: f64,
    #[serde(default = "default_true")]
    pub use_go_ferm: bool,
    #[serde(default = "default_true")]
    pub use_fermaid_o: bool,
    #[serde(default = "default_true")]
    pub use_fermaid_k: bool,
    #[serde(default = "default_true")]
    pub use_dap: bool,
    /// Planned number of additions, 2-4 typical
    #[serde(default = "default_steps")]
    pub number_of_steps: u32,
}

impl SnaRequest {
    /// Request with every additive enabled and three steps
    pub fn new(specific_gravity: f64, brix: f64, yeast_class: YeastNitrogenClass, batch_size_gallons: f64) -> Self {
        SnaRequest {
            specific_gravity,
            brix,
            yeast_class,
            batch_size_gallons,
            use_go_ferm: true,
            use_fermaid_o: true,
            use_fermaid_k: true,
            use_dap: true,
            number_of_steps: default_steps(),
        }
    }

    /// True when at least one additive is selected
    pub fn any_additive(&self) -> bool {
        self.use_go_ferm || self.use_fermaid_o || self.use_fermaid_k || self.use_dap
    }
}

/// One additive dose inside an addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionItem {
    pub nutrient_type: NutrientType,
    pub name: String,
    /// Dose for the whole batch (g)
    pub grams: f64,
    /// Nitrogen this dose adds (PPM)
    pub yan_contribution_ppm: f64,
}

/// One timed nutrient addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnaAddition {
    pub sequence_number: u32,
    pub label: String,
    pub timing_description: String,
    pub detail_text: String,
    pub items: Vec<AdditionItem>,
    pub total_yan_ppm: f64,
    pub notes: String,
}

/// Grams of one additive across a whole schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdditiveTotal {
    pub nutrient_type: NutrientType,
    pub grams: f64,
}

/// Per-additive gram totals, kept in order of first contribution.
///
/// Serializes as a JSON object (`{"DAP": 2.78, "FermaidK": 5.85}`) whose
/// key order is the insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdditiveTotals {
    entries: Vec<AdditiveTotal>,
}

impl AdditiveTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate grams for an additive
    pub fn add(&mut self, nutrient_type: NutrientType, grams: f64) {
        match self.entries.iter_mut().find(|e| e.nutrient_type == nutrient_type) {
            Some(entry) => entry.grams += grams,
            None => self.entries.push(AdditiveTotal { nutrient_type, grams }),
        }
    }

    /// Total grams for an additive, if it appears in the schedule
    pub fn get(&self, nutrient_type: NutrientType) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.nutrient_type == nutrient_type)
            .map(|e| e.grams)
    }

    /// Dose concentration for an additive over a batch volume
    pub fn grams_per_liter(&self, nutrient_type: NutrientType, batch: Liters) -> Option<GramsPerLiter> {
        self.get(nutrient_type)
            .map(|grams| GramsPerLiter::of(Grams(grams), batch))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdditiveTotal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AdditiveTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.nutrient_type, &entry.grams)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AdditiveTotals {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TotalsVisitor;

        impl<'de> Visitor<'de> for TotalsVisitor {
            type Value = AdditiveTotals;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of nutrient type to grams")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut totals = AdditiveTotals::new();
                while let Some((nutrient_type, grams)) = access.next_entry::<NutrientType, f64>()? {
                    totals.add(nutrient_type, grams);
                }
                Ok(totals)
            }
        }

        deserializer.deserialize_map(TotalsVisitor)
    }
}

/// A complete staggered nutrient schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnaSchedule {
    pub batch_size_gallons: f64,
    pub yan_calculation: YanResult,
    /// Additions in the order they are applied
    pub additions: Vec<SnaAddition>,
    pub total_additives_by_type: AdditiveTotals,
    /// Sum of every addition's YAN share (PPM)
    pub total_yan: f64,
}

impl SnaSchedule {
    /// YAN carried by actual additive items (PPM)
    ///
    /// Lower than `total_yan` when a staggered step found no usable additive.
    pub fn delivered_yan(&self) -> f64 {
        self.additions
            .iter()
            .flat_map(|a| a.items.iter())
            .map(|item| item.yan_contribution_ppm)
            .sum()
    }

    /// Additions that carry no additive items
    pub fn empty_steps(&self) -> Vec<&SnaAddition> {
        self.additions.iter().filter(|a| a.items.is_empty()).collect()
    }
}

/// Build a schedule with the reference constants.
pub fn generate_sna_schedule(request: &SnaRequest) -> SnaSchedule {
    generate_sna_schedule_with(request, &NutrientConstants::default())
}

/// Build a schedule with tuned constants.
pub fn generate_sna_schedule_with(request: &SnaRequest, constants: &NutrientConstants) -> SnaSchedule {
    let yan_calculation = calculate_yan_with(
        &YanInput {
            specific_gravity: request.specific_gravity,
            brix: request.brix,
            yeast_class: request.yeast_class,
            existing_yan: 0.0,
        },
        constants,
    );
    let batch_liters = Gallons(request.batch_size_gallons).to_liters(constants.liters_per_gallon).0;

    let required = yan_calculation.required_yan;
    let organic_yan = required * constants.organic_fraction;
    let inorganic_yan = required * (1.0 - constants.organic_fraction);

    let mut additions = Vec::new();
    let mut totals = AdditiveTotals::new();
    let mut total_yan = 0.0;

    // Rehydration dose sits on top of the computed requirement
    if request.use_go_ferm {
        let grams = constants.go_ferm_grams_per_liter * batch_liters;
        let yan = grams * constants.go_ferm_yan_factor;

        additions.push(SnaAddition {
            sequence_number: 1,
            label: "Rehydration".to_string(),
            timing_description: "At Rehydration".to_string(),
            detail_text: "Rehydrate dry yeast in water with Go Ferm PE just before pitching (1.25 g Go Ferm per 1 g yeast)".to_string(),
            items: vec![item(NutrientType::GoFermPe, grams, yan)],
            total_yan_ppm: yan,
            notes: "A typical pitch is 2 g yeast per gallon, about 10 g Go Ferm PE per gallon.".to_string(),
        });
        totals.add(NutrientType::GoFermPe, grams);
        total_yan += yan;
    }

    if request.use_fermaid_o {
        let grams = organic_yan / constants.fermaid_o_ppm_per_gram * batch_liters;

        additions.push(SnaAddition {
            sequence_number: 2,
            label: "Post-Lag Organic Nitrogen".to_string(),
            timing_description: "24 hours after pitch".to_string(),
            detail_text: "Add Fermaid O once fermentation shows the first signs of activity".to_string(),
            items: vec![item(NutrientType::FermaidO, grams, organic_yan)],
            total_yan_ppm: organic_yan,
            notes: "Yeast assimilate organic nitrogen best. May be split into two additions 24 hours apart.".to_string(),
        });
        totals.add(NutrientType::FermaidO, grams);
        total_yan += organic_yan;
    }

    let steps = request
        .number_of_steps
        .saturating_sub(constants.reserved_steps)
        .max(constants.min_staggered_steps);
    let per_step = inorganic_yan / steps as f64;

    for i in 0..steps {
        let is_last = i + 1 == steps;
        let day = constants.first_staggered_day + i;

        let mut items = Vec::new();
        if request.use_dap && !is_last {
            let grams = per_step / constants.dap_ppm_per_gram * batch_liters;
            items.push(item(NutrientType::Dap, grams, per_step));
            totals.add(NutrientType::Dap, grams);
        } else if request.use_fermaid_k {
            let grams = per_step / constants.fermaid_k_ppm_per_gram * batch_liters;
            items.push(item(NutrientType::FermaidK, grams, per_step));
            totals.add(NutrientType::FermaidK, grams);
        } else {
            tracing::debug!(step = i + 1, "no inorganic additive selected for staggered step");
        }

        let notes = if is_last {
            "Final inorganic addition - make it before the must reaches 9% ABV"
        } else {
            "Inorganic nitrogen must be added before the yeast reach 9% ABV"
        };

        additions.push(SnaAddition {
            sequence_number: 3 + i,
            label: format!("Inorganic Nitrogen Step {}", i + 1),
            timing_description: format!("{} days after pitch", day),
            detail_text: "Add at 24 hour intervals, before 9% ABV".to_string(),
            items,
            total_yan_ppm: per_step,
            notes: notes.to_string(),
        });
        total_yan += per_step;
    }

    tracing::debug!(
        batch_liters,
        required_yan = required,
        additions = additions.len(),
        total_yan,
        "nutrient schedule generated"
    );

    SnaSchedule {
        batch_size_gallons: request.batch_size_gallons,
        yan_calculation,
        additions,
        total_additives_by_type: totals,
        total_yan,
    }
}

fn item(nutrient_type: NutrientType, grams: f64, yan_contribution_ppm: f64) -> AdditionItem {
    AdditionItem {
        nutrient_type,
        name: nutrient_type.display_name().to_string(),
        grams,
        yan_contribution_ppm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::round_to;

    const TOL: f64 = 1e-9;

    fn medium_must() -> YanInput {
        YanInput {
            specific_gravity: 1.090,
            brix: 21.0,
            yeast_class: YeastNitrogenClass::Medium,
            existing_yan: 0.0,
        }
    }

    #[test]
    fn test_yan_medium_yeast() {
        let result = calculate_yan(&medium_must());
        assert!((result.total_sugar_per_liter - 228.9).abs() < TOL);
        assert!((result.required_yan - 206.01).abs() < TOL);
        assert_eq!(round_to(result.required_yan, 1), 206.0);
        assert_eq!(result.yeast_multiplier, 0.90);
        assert_eq!(result.yeast_class_label, "Medium");
    }

    #[test]
    fn test_yan_multipliers() {
        let constants = NutrientConstants::default();
        assert_eq!(YeastNitrogenClass::ExtraLow.multiplier(&constants), 0.5);
        assert_eq!(YeastNitrogenClass::Low.multiplier(&constants), 0.75);
        assert_eq!(YeastNitrogenClass::Medium.multiplier(&constants), 0.90);
        assert_eq!(YeastNitrogenClass::High.multiplier(&constants), 1.25);
    }

    #[test]
    fn test_existing_yan_subtracted() {
        let mut input = medium_must();
        input.existing_yan = 50.0;
        let result = calculate_yan(&input);
        assert!((result.required_yan - 156.01).abs() < TOL);
    }

    #[test]
    fn test_existing_yan_clamps_at_zero() {
        let mut input = medium_must();
        input.existing_yan = 500.0;
        let result = calculate_yan(&input);
        assert_eq!(result.required_yan, 0.0);
    }

    #[test]
    fn test_full_schedule() {
        let schedule = generate_sna_schedule(&SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0));
        let batch_liters = 5.0 * 3.785;

        // GoFerm + FermaidO + 2 staggered steps (max(2, 3 - 2))
        assert_eq!(schedule.additions.len(), 4);
        let sequence: Vec<u32> = schedule.additions.iter().map(|a| a.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);

        let go_ferm = &schedule.additions[0];
        assert_eq!(go_ferm.label, "Rehydration");
        assert!((go_ferm.items[0].grams - 2.64 * batch_liters).abs() < TOL);
        assert!((go_ferm.total_yan_ppm - 2.64 * batch_liters * 0.30).abs() < TOL);

        let fermaid_o = &schedule.additions[1];
        let organic = 206.01 * 0.7;
        assert!((fermaid_o.total_yan_ppm - organic).abs() < 1e-6);
        assert!((fermaid_o.items[0].grams - organic / 40.0 * batch_liters).abs() < 1e-6);

        let per_step = 206.01 * 0.3 / 2.0;
        let step1 = &schedule.additions[2];
        assert_eq!(step1.items[0].nutrient_type, NutrientType::Dap);
        assert_eq!(step1.timing_description, "2 days after pitch");
        assert!((step1.items[0].grams - per_step / 210.0 * batch_liters).abs() < 1e-6);

        let step2 = &schedule.additions[3];
        assert_eq!(step2.items[0].nutrient_type, NutrientType::FermaidK);
        assert_eq!(step2.timing_description, "3 days after pitch");
        assert!(step2.notes.starts_with("Final inorganic addition"));
        assert!((step2.items[0].grams - per_step / 100.0 * batch_liters).abs() < 1e-6);
    }

    #[test]
    fn test_total_yan_matches_items_when_every_step_is_dosed() {
        let schedule = generate_sna_schedule(&SnaRequest::new(1.100, 24.0, YeastNitrogenClass::High, 3.0));
        assert!((schedule.total_yan - schedule.delivered_yan()).abs() < 1e-9);
        assert!(schedule.empty_steps().is_empty());
    }

    #[test]
    fn test_total_yan_includes_go_ferm_on_top() {
        let schedule = generate_sna_schedule(&SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0));
        let go_ferm_yan = 2.64 * 5.0 * 3.785 * 0.30;
        let expected = schedule.yan_calculation.required_yan + go_ferm_yan;
        assert!((schedule.total_yan - expected).abs() < 1e-6);
    }

    #[test]
    fn test_dap_only_three_steps_leaves_last_step_empty() {
        let request = SnaRequest {
            use_go_ferm: false,
            use_fermaid_o: false,
            use_fermaid_k: false,
            use_dap: true,
            number_of_steps: 3,
            ..SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0)
        };
        let schedule = generate_sna_schedule(&request);

        // max(2, 3 - 2) = 2 staggered steps
        assert_eq!(schedule.additions.len(), 2);
        assert_eq!(schedule.additions[0].items.len(), 1);
        assert_eq!(schedule.additions[0].items[0].nutrient_type, NutrientType::Dap);
        assert!(schedule.additions[1].items.is_empty());

        let per_step = schedule.yan_calculation.required_yan * 0.3 / 2.0;
        assert!((schedule.additions[1].total_yan_ppm - per_step).abs() < TOL);
        assert!((schedule.total_yan - 2.0 * per_step).abs() < TOL);
        assert!((schedule.delivered_yan() - per_step).abs() < TOL);
        assert_eq!(schedule.empty_steps().len(), 1);
        assert_eq!(schedule.total_additives_by_type.len(), 1);
    }

    #[test]
    fn test_fermaid_k_only_doses_every_step() {
        let request = SnaRequest {
            use_dap: false,
            number_of_steps: 5,
            ..SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0)
        };
        let schedule = generate_sna_schedule(&request);
        let staggered: Vec<&SnaAddition> = schedule.additions.iter().filter(|a| a.sequence_number >= 3).collect();
        assert_eq!(staggered.len(), 3);
        assert!(staggered.iter().all(|a| a.items[0].nutrient_type == NutrientType::FermaidK));
        assert_eq!(staggered[2].timing_description, "4 days after pitch");
    }

    #[test]
    fn test_steps_below_two_are_clamped() {
        let mut request = SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 1.0);
        request.number_of_steps = 0;
        let schedule = generate_sna_schedule(&request);
        assert_eq!(schedule.additions.len(), 4);
    }

    #[test]
    fn test_skipped_organic_keeps_sequence_numbers() {
        let request = SnaRequest {
            use_fermaid_o: false,
            ..SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0)
        };
        let schedule = generate_sna_schedule(&request);
        let sequence: Vec<u32> = schedule.additions.iter().map(|a| a.sequence_number).collect();
        assert_eq!(sequence, vec![1, 3, 4]);
    }

    #[test]
    fn test_totals_in_first_contribution_order() {
        let schedule = generate_sna_schedule(&SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0));
        let order: Vec<NutrientType> = schedule.total_additives_by_type.iter().map(|t| t.nutrient_type).collect();
        assert_eq!(
            order,
            vec![NutrientType::GoFermPe, NutrientType::FermaidO, NutrientType::Dap, NutrientType::FermaidK]
        );
    }

    #[test]
    fn test_totals_accumulate_across_steps() {
        let request = SnaRequest {
            use_dap: false,
            number_of_steps: 6,
            ..SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, 5.0)
        };
        let schedule = generate_sna_schedule(&request);
        let step_grams: f64 = schedule
            .additions
            .iter()
            .flat_map(|a| a.items.iter())
            .filter(|i| i.nutrient_type == NutrientType::FermaidK)
            .map(|i| i.grams)
            .sum();
        let total = schedule.total_additives_by_type.get(NutrientType::FermaidK).unwrap();
        assert!((total - step_grams).abs() < TOL);
    }

    #[test]
    fn test_totals_json_keeps_order() {
        let mut totals = AdditiveTotals::new();
        totals.add(NutrientType::Dap, 2.0);
        totals.add(NutrientType::FermaidK, 1.0);
        totals.add(NutrientType::Dap, 0.5);

        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(json, r#"{"DAP":2.5,"FermaidK":1.0}"#);

        let parsed: AdditiveTotals = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, totals);
    }

    #[test]
    fn test_grams_per_liter() {
        let mut totals = AdditiveTotals::new();
        totals.add(NutrientType::FermaidK, 10.0);
        let gpl = totals.grams_per_liter(NutrientType::FermaidK, Liters(20.0)).unwrap();
        assert_eq!(gpl.0, 0.5);
        assert!(totals.grams_per_liter(NutrientType::Dap, Liters(20.0)).is_none());
    }

    #[test]
    fn test_request_json_defaults() {
        let json = r#"{ "specific_gravity": 1.1, "brix": 24.0, "yeast_class": "High", "batch_size_gallons": 1.0 }"#;
        let request: SnaRequest = serde_json::from_str(json).unwrap();
        assert!(request.use_go_ferm && request.use_fermaid_o && request.use_fermaid_k && request.use_dap);
        assert_eq!(request.number_of_steps, 3);
    }

    #[test]
    fn test_nutrient_type_names() {
        assert_eq!(serde_json::to_string(&NutrientType::GoFermPe).unwrap(), "\"GoFermPE\"");
        assert_eq!(serde_json::to_string(&NutrientType::Dap).unwrap(), "\"DAP\"");
        assert_eq!(NutrientType::from_str_flexible("go-ferm").unwrap(), NutrientType::GoFermPe);
        assert_eq!(YeastNitrogenClass::from_str_flexible("extra_low").unwrap(), YeastNitrogenClass::ExtraLow);
        assert!(YeastNitrogenClass::from_str_flexible("turbo").is_err());
    }
}
