//! Property tests for the ABV engine and nutrient scheduler.

use mead_core::calculations::abv::{
    calculate, calculate_abv, calculate_gravity, CalculationInput, CalculationMode, IngredientQuantity,
    IngredientType,
};
use mead_core::calculations::nutrients::{
    calculate_yan, generate_sna_schedule, SnaRequest, YanInput, YeastNitrogenClass,
};
use proptest::prelude::*;

fn ingredient() -> impl Strategy<Value = IngredientQuantity> {
    (
        prop::sample::select(IngredientType::ALL.to_vec()),
        0.0_f64..5000.0,
        0.0_f64..100.0,
    )
        .prop_map(|(ingredient_type, amount, pct)| {
            IngredientQuantity::new(ingredient_type, ingredient_type.display_name(), amount, pct)
        })
}

fn yeast_class() -> impl Strategy<Value = YeastNitrogenClass> {
    prop::sample::select(YeastNitrogenClass::ALL.to_vec())
}

proptest! {
    #[test]
    fn abv_is_non_negative_and_monotonic_in_sugar(
        sugar in 0.0_f64..5000.0,
        extra in 0.0_f64..1000.0,
        volume in 1.0_f64..40000.0,
    ) {
        let base = calculate_abv(sugar, volume);
        prop_assert!(base >= 0.0);
        prop_assert!(calculate_abv(sugar + extra, volume) >= base);
    }

    #[test]
    fn empty_volume_identities(sugar in 0.0_f64..5000.0) {
        prop_assert_eq!(calculate_abv(sugar, 0.0), 0.0);
        prop_assert_eq!(calculate_gravity(sugar, 0.0), 1.0);
    }

    #[test]
    fn zero_sugar_gives_zero_abv(volume in 1.0_f64..40000.0) {
        prop_assert_eq!(calculate_abv(0.0, volume), 0.0);
    }

    #[test]
    fn target_abv_round_trip(target in 1.0_f64..20.0, water in 1000.0_f64..40000.0) {
        let solve = calculate(&CalculationInput {
            ingredients: vec![IngredientQuantity::water(water)],
            mode: CalculationMode::TargetAbv,
            target_value: Some(target),
        });
        let honey = solve.calculated_honey_weight_grams.unwrap();

        let check = calculate(&CalculationInput {
            ingredients: vec![
                IngredientQuantity::water(water),
                IngredientQuantity::honey("Honey", honey, 80.0),
            ],
            mode: CalculationMode::HoneyWeight,
            target_value: None,
        });
        prop_assert!((check.estimated_abv - target).abs() <= 0.011);
    }

    #[test]
    fn breakdown_percentages_sum_to_hundred_or_zero(
        ingredients in prop::collection::vec(ingredient(), 1..8),
    ) {
        let result = calculate(&CalculationInput {
            ingredients,
            mode: CalculationMode::HoneyWeight,
            target_value: None,
        });
        let sum: f64 = result.ingredients.iter().map(|b| b.sugar_percentage_of_total).sum();

        if result.total_fermentable_sugars_grams > 0.0 {
            prop_assert!((sum - 100.0).abs() < 1e-6);
        } else {
            prop_assert!(result.ingredients.iter().all(|b| b.sugar_percentage_of_total == 0.0));
        }
    }

    #[test]
    fn calculate_is_idempotent(ingredients in prop::collection::vec(ingredient(), 1..6)) {
        let input = CalculationInput {
            ingredients,
            mode: CalculationMode::TargetAbv,
            target_value: Some(14.0),
        };
        prop_assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn final_gravity_never_below_floor(ingredients in prop::collection::vec(ingredient(), 1..6)) {
        let result = calculate(&CalculationInput {
            ingredients,
            mode: CalculationMode::HoneyWeight,
            target_value: None,
        });
        prop_assert!(result.estimated_final_gravity >= 0.990);
    }

    #[test]
    fn required_yan_is_never_negative(
        sg in 0.990_f64..1.200,
        brix in 0.0_f64..40.0,
        existing in 0.0_f64..1000.0,
        yeast in yeast_class(),
    ) {
        let result = calculate_yan(&YanInput {
            specific_gravity: sg,
            brix,
            yeast_class: yeast,
            existing_yan: existing,
        });
        prop_assert!(result.required_yan >= 0.0);
    }

    #[test]
    fn full_schedule_delivers_what_it_schedules(
        sg in 1.000_f64..1.150,
        brix in 5.0_f64..35.0,
        gallons in 0.25_f64..60.0,
        steps in 0_u32..8,
        yeast in yeast_class(),
    ) {
        let mut request = SnaRequest::new(sg, brix, yeast, gallons);
        request.number_of_steps = steps;
        let schedule = generate_sna_schedule(&request);

        prop_assert!(schedule.empty_steps().is_empty());
        prop_assert!((schedule.total_yan - schedule.delivered_yan()).abs() < 1e-6);
    }

    #[test]
    fn staggered_step_count(steps in 0_u32..12, gallons in 0.25_f64..60.0) {
        let request = SnaRequest {
            use_go_ferm: false,
            use_fermaid_o: false,
            number_of_steps: steps,
            ..SnaRequest::new(1.090, 21.0, YeastNitrogenClass::Medium, gallons)
        };
        let schedule = generate_sna_schedule(&request);
        let expected = steps.saturating_sub(2).max(2) as usize;
        prop_assert_eq!(schedule.additions.len(), expected);

        let sequence: Vec<u32> = schedule.additions.iter().map(|a| a.sequence_number).collect();
        let in_order: Vec<u32> = (3..3 + expected as u32).collect();
        prop_assert_eq!(sequence, in_order);
    }
}
