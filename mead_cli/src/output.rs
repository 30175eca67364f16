//! Human-readable reports for each command.

use mead_core::calculations::abv::{CalculationMode, CalculationResult};
use mead_core::calculations::nutrients::{SnaSchedule, YanResult};
use mead_core::catalog::{AdditiveCatalog, Ingredient, NutrientAdditive};
use mead_core::units::{round_to, Gallons};
use mead_core::{EngineConfig, MeadService, Recipe};

const RULE: &str = "═══════════════════════════════════════";
const WARN: &str = "[WARN]";

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
    println!();
}

pub fn print_calculation(result: &CalculationResult, mode: CalculationMode) {
    banner("FERMENTATION ESTIMATE");

    println!("Ingredients:");
    for line in &result.ingredients {
        println!(
            "  {:<28} {:>9.1} {:<2}  sugar {:>8.1} g ({:>5.1}%)",
            line.name, line.amount, line.unit, line.sugar_grams, line.sugar_percentage_of_total
        );
    }
    println!();
    println!("Must:");
    println!("  Volume:     {:.0} ml", result.total_volume_ml);
    println!("  Sugar:      {:.1} g", result.total_fermentable_sugars_grams);
    println!();
    println!("Estimates:");
    println!("  ABV:        {:.2}%", result.estimated_abv);
    println!("  OG:         {:.4}", result.estimated_original_gravity);
    println!("  FG:         {:.4}", result.estimated_final_gravity);

    match mode {
        CalculationMode::TargetAbv => match (result.calculated_honey_weight_grams, result.calculated_abv) {
            (Some(honey), Some(target)) => {
                println!();
                println!("  Honey to add for {:.1}% ABV: {:.2} g", target, honey);
            }
            _ => println!("\n  Target ABV needs a non-zero must volume"),
        },
        CalculationMode::TargetVolume => match result.calculated_volume_ml {
            Some(volume) => println!("\n  Target volume: {:.0} ml", volume),
            None => println!("\n  Target volume needs a non-zero must volume"),
        },
        CalculationMode::HoneyWeight => {}
    }
    println!();
}

pub fn print_yan(result: &YanResult) {
    banner("YAN REQUIREMENT");
    println!("  Sugar:       {:.1} g/L", result.total_sugar_per_liter);
    println!("  Yeast:       {} (x{:.2})", result.yeast_class_label, result.yeast_multiplier);
    println!("  Required:    {:.1} PPM", round_to(result.required_yan, 1));
    println!();
}

pub fn print_schedule(schedule: &SnaSchedule, additives: &AdditiveCatalog, config: &EngineConfig) {
    banner("STAGGERED NUTRIENT SCHEDULE");

    let yan = &schedule.yan_calculation;
    println!(
        "  Batch: {:.2} gal   Yeast: {}   Required YAN: {:.1} PPM",
        schedule.batch_size_gallons,
        yan.yeast_class_label,
        round_to(yan.required_yan, 1)
    );
    println!();

    for addition in &schedule.additions {
        println!("[{}] {} - {}", addition.sequence_number, addition.label, addition.timing_description);
        println!("    {}", addition.detail_text);
        if addition.items.is_empty() {
            println!("    (no additive selected for this step)");
        }
        for item in &addition.items {
            println!(
                "    {:<12} {:>8.2} g   {:>6.1} PPM",
                item.name,
                round_to(item.grams, 2),
                round_to(item.yan_contribution_ppm, 1)
            );
        }
        println!("    Note: {}", addition.notes);
        println!();
    }

    println!("Totals:");
    for total in schedule.total_additives_by_type.iter() {
        println!("  {:<12} {:>8.2} g", total.nutrient_type.display_name(), round_to(total.grams, 2));
    }
    println!("  Scheduled YAN: {:.1} PPM", round_to(schedule.total_yan, 1));

    let delivered = schedule.delivered_yan();
    if (delivered - schedule.total_yan).abs() > 1e-9 {
        println!("  Delivered YAN: {:.1} PPM {}", round_to(delivered, 1), WARN);
    }

    let batch = Gallons(schedule.batch_size_gallons).to_liters(config.nutrients.liters_per_gallon);
    for over in additives.limit_exceedances(&schedule.total_additives_by_type, batch) {
        println!(
            "  {} {}: {:.2} g/L exceeds the {:.2} g/L commercial limit",
            WARN,
            over.nutrient_type,
            over.grams_per_liter,
            over.limit_grams_per_liter
        );
    }
    println!();
}

pub fn print_additives(additives: &[NutrientAdditive]) {
    banner("NUTRIENT ADDITIVES");
    for additive in additives {
        let limit = match additive.commercial_limit() {
            Some(limit) => format!("max {:.2} g/L", limit.0),
            None => "no limit".to_string(),
        };
        println!(
            "  {:>2}  {:<28} {:>5.1}% N  {:>5.0} PPM per g/L  {}",
            additive.id, additive.name, additive.nitrogen_content_percent, additive.ppm_per_gram, limit
        );
        println!("      {}", additive.description);
    }
    println!();
}

pub fn print_ingredients(ingredients: &[&Ingredient]) {
    println!("  {:>3}  {:<28} {:<12} {:>7}", "ID", "Name", "Type", "Sugar");
    for ingredient in ingredients {
        println!(
            "  {:>3}  {:<28} {:<12} {:>6.1}%",
            ingredient.id,
            ingredient.name,
            ingredient.ingredient_type.display_name(),
            ingredient.sugar_content_percentage
        );
    }
}

pub fn print_ingredient(ingredient: &Ingredient) {
    println!("{} (#{})", ingredient.name, ingredient.id);
    println!("  Type:   {}", ingredient.ingredient_type);
    println!("  Sugar:  {:.1}%", ingredient.sugar_content_percentage);
    println!("  Unit:   {}", ingredient.unit);
    if !ingredient.description.is_empty() {
        println!("  {}", ingredient.description);
    }
}

pub fn print_recipe(recipe: &Recipe, service: &MeadService) {
    banner(&format!("RECIPE: {}", recipe.name));
    if !recipe.description.is_empty() {
        println!("  {}", recipe.description);
        println!();
    }
    println!("  Id:       {}", recipe.id);
    println!("  Modified: {}", recipe.meta.modified.format("%Y-%m-%d %H:%M UTC"));
    println!("  Mode:     {:?}", recipe.mode);
    if let Some(target) = recipe.target_value {
        println!("  Target:   {}", target);
    }
    println!();

    println!("Ingredients:");
    for line in &recipe.ingredients {
        match service.ingredient(line.ingredient_id) {
            Ok(ingredient) => println!("  {:<28} {:>9.1} {}", ingredient.name, line.amount, ingredient.unit),
            Err(_) => println!("  #{:<27} {:>9.1}   {}", line.ingredient_id, line.amount, WARN),
        }
    }
    println!();

    match &recipe.estimates {
        Some(estimates) => println!(
            "Last estimate: {:.2}% ABV, OG {:.4}, FG {:.4}",
            estimates.estimated_abv, estimates.estimated_original_gravity, estimates.estimated_final_gravity
        ),
        None => println!("Not calculated yet (run `mead recipe calc`)"),
    }
}
