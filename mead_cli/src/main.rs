//! # mead CLI
//!
//! Command-line front end for the mead calculator: ABV and gravity
//! estimates, YAN requirements, staggered nutrient schedules, catalog
//! browsing, and recipe files.
//!
//! Every command prints a human-readable report, or pretty JSON with
//! `--json`. Set `RUST_LOG=debug` for engine traces on stderr.

mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mead_core::calculations::abv::{CalculationInput, CalculationMode, IngredientType};
use mead_core::calculations::nutrients::{SnaRequest, YanInput, YeastNitrogenClass};
use mead_core::catalog::{Ingredient, IngredientCatalog, IngredientRepository};
use mead_core::{load_recipe, save_recipe, CalcError, EngineConfig, MeadService, Recipe, RecipeIngredient};

#[derive(Parser)]
#[command(name = "mead")]
#[command(about = "Mead calculator - ABV, gravity and nutrient schedules", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML) overriding the reference constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ingredient catalog file (TOML) replacing the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate ABV and gravity for a list of ingredients
    Calculate {
        /// Calculation request as a JSON file (overrides --add/--mode/--target)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        lines: LineArgs,
    },
    /// Required yeast assimilable nitrogen for a must
    Yan {
        #[command(flatten)]
        must: MustArgs,

        /// Nitrogen already present (PPM)
        #[arg(long, default_value = "0")]
        existing: f64,
    },
    /// Staggered nutrient addition schedule
    Sna {
        #[command(flatten)]
        must: MustArgs,

        /// Batch size in US gallons
        #[arg(short, long)]
        gallons: f64,

        /// Planned number of additions
        #[arg(long, default_value = "3")]
        steps: u32,

        /// Skip the Go Ferm PE rehydration
        #[arg(long)]
        no_go_ferm: bool,

        /// Skip the Fermaid O organic addition
        #[arg(long)]
        no_fermaid_o: bool,

        /// Do not use Fermaid K
        #[arg(long)]
        no_fermaid_k: bool,

        /// Do not use DAP
        #[arg(long)]
        no_dap: bool,
    },
    /// List nutrient additives
    Additives,
    /// List catalog ingredients
    Ingredients {
        /// Only this type (honey, fruit, juice, water)
        #[arg(short = 't', long = "type", value_parser = parse_ingredient_type)]
        ingredient_type: Option<IngredientType>,
    },
    /// Show one catalog ingredient
    Ingredient {
        /// Catalog id or ingredient name
        key: String,
    },
    /// Create, inspect and calculate recipe files
    #[command(subcommand)]
    Recipe(RecipeCommands),
    /// Print the effective engine configuration as TOML
    Config,
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Create a new recipe file
    New {
        /// Path of the .mead file to write
        path: PathBuf,

        /// Recipe name
        #[arg(short, long)]
        name: String,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        #[command(flatten)]
        lines: LineArgs,
    },
    /// Show a recipe file
    Show {
        path: PathBuf,
    },
    /// Calculate a recipe and save the estimates into it
    Calc {
        path: PathBuf,
    },
}

/// Catalog ingredient lines plus solve mode
#[derive(Args)]
struct LineArgs {
    /// Catalog ingredient as ID:AMOUNT (grams or ml), repeatable
    #[arg(short, long = "add", value_parser = parse_line)]
    add: Vec<RecipeIngredient>,

    /// honey-weight, target-abv or target-volume
    #[arg(short, long, default_value = "honey-weight", value_parser = parse_mode)]
    mode: CalculationMode,

    /// Target ABV (%) or target volume (ml)
    #[arg(short, long)]
    target: Option<f64>,
}

/// Must chemistry shared by the nutrient commands
#[derive(Args)]
struct MustArgs {
    /// Specific gravity of the must
    #[arg(long)]
    sg: f64,

    /// Brix reading
    #[arg(long)]
    brix: f64,

    /// Yeast nitrogen demand: extra-low, low, medium, high
    #[arg(short, long, value_parser = parse_yeast)]
    yeast: YeastNitrogenClass,
}

fn parse_line(s: &str) -> std::result::Result<RecipeIngredient, String> {
    let (id, amount) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:AMOUNT, got '{}'", s))?;
    Ok(RecipeIngredient {
        ingredient_id: id.trim().parse().map_err(|_| format!("invalid ingredient id '{}'", id))?,
        amount: amount.trim().parse().map_err(|_| format!("invalid amount '{}'", amount))?,
    })
}

fn parse_mode(s: &str) -> std::result::Result<CalculationMode, String> {
    CalculationMode::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_yeast(s: &str) -> std::result::Result<YeastNitrogenClass, String> {
    YeastNitrogenClass::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_ingredient_type(s: &str) -> std::result::Result<IngredientType, String> {
    IngredientType::from_str_flexible(s).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{}", render_error(&err, cli.json));
        std::process::exit(exit_code(&err));
    }
}

/// One error report for stderr: the `CalcError` JSON under `--json`, text otherwise
fn render_error(err: &anyhow::Error, json: bool) -> String {
    match err.downcast_ref::<CalcError>() {
        Some(calc) if json => {
            serde_json::to_string_pretty(calc).unwrap_or_else(|_| format!("Error [{}]: {}", calc.error_code(), calc))
        }
        Some(calc) => format!("Error [{}]: {}", calc.error_code(), calc),
        None => format!("Error: {:#}", err),
    }
}

/// 2 for requests the caller can fix, 1 for everything else
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CalcError>() {
        Some(calc) if calc.is_caller_error() => 2,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let service = build_service(cli)?;

    match &cli.command {
        Commands::Calculate { input, lines } => cmd_calculate(&service, input.as_deref(), lines, cli.json),
        Commands::Yan { must, existing } => {
            let result = service.calculate_yan(&YanInput {
                specific_gravity: must.sg,
                brix: must.brix,
                yeast_class: must.yeast,
                existing_yan: *existing,
            })?;
            emit(cli.json, &result, output::print_yan)
        }
        Commands::Sna {
            must,
            gallons,
            steps,
            no_go_ferm,
            no_fermaid_o,
            no_fermaid_k,
            no_dap,
        } => {
            let request = SnaRequest {
                use_go_ferm: !no_go_ferm,
                use_fermaid_o: !no_fermaid_o,
                use_fermaid_k: !no_fermaid_k,
                use_dap: !no_dap,
                number_of_steps: *steps,
                ..SnaRequest::new(must.sg, must.brix, must.yeast, *gallons)
            };
            let schedule = service.generate_sna_schedule(&request)?;
            emit(cli.json, &schedule, |s| output::print_schedule(s, service.additive_catalog(), service.config()))
        }
        Commands::Additives => emit(cli.json, service.available_additives(), output::print_additives),
        Commands::Ingredients { ingredient_type } => {
            let list = match ingredient_type {
                Some(t) => service.ingredients_by_type(*t),
                None => service.all_ingredients().iter().collect(),
            };
            emit(cli.json, &list, |l| output::print_ingredients(l))
        }
        Commands::Ingredient { key } => emit(cli.json, find_ingredient(&service, key)?, output::print_ingredient),
        Commands::Recipe(cmd) => cmd_recipe(&service, cmd, cli.json),
        Commands::Config => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(service.config())?);
            } else {
                print!("{}", service.config().to_toml_string()?);
            }
            Ok(())
        }
    }
}

fn build_service(cli: &Cli) -> Result<MeadService> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => IngredientCatalog::load(path)?,
        None => IngredientCatalog::builtin()?,
    };
    tracing::debug!(ingredients = catalog.all().len(), "catalog ready");
    Ok(MeadService::new(catalog, config))
}

/// Catalog entry by numeric id, falling back to a case-insensitive name match
fn find_ingredient<'a>(service: &'a MeadService, key: &str) -> Result<&'a Ingredient> {
    match key.trim().parse::<u32>() {
        Ok(id) => Ok(service.ingredient(id)?),
        Err(_) => service
            .ingredients()
            .by_name(key)
            .ok_or_else(|| anyhow!("No catalog ingredient named '{}'", key.trim())),
    }
}

fn cmd_calculate(service: &MeadService, input: Option<&Path>, lines: &LineArgs, json: bool) -> Result<()> {
    let request = match input {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<CalculationInput>(&text)
                .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?
        }
        None => CalculationInput {
            ingredients: service.resolve(&lines.add)?,
            mode: lines.mode,
            target_value: lines.target,
        },
    };

    let result = service.calculate(&request)?;
    emit(json, &result, |r| output::print_calculation(r, request.mode))
}

fn cmd_recipe(service: &MeadService, cmd: &RecipeCommands, json: bool) -> Result<()> {
    match cmd {
        RecipeCommands::New {
            path,
            name,
            description,
            lines,
        } => {
            let mut recipe = Recipe::new(name.as_str());
            recipe.description = description.clone();
            for line in &lines.add {
                // Validate ids up front so the file never references unknown ingredients
                service.ingredient(line.ingredient_id)?;
                recipe.add_ingredient(line.ingredient_id, line.amount);
            }
            recipe.set_mode(lines.mode, lines.target);
            save_recipe(&recipe, path)?;
            emit(json, &recipe, |r| {
                println!("Created recipe '{}' ({}) at {}", r.name, r.id, path.display());
            })
        }
        RecipeCommands::Show { path } => {
            let recipe = load_recipe(path)?;
            emit(json, &recipe, |r| output::print_recipe(r, service))
        }
        RecipeCommands::Calc { path } => {
            let mut recipe = load_recipe(path)?;
            let result = service.calculate_recipe(&mut recipe)?;
            save_recipe(&recipe, path)?;
            emit(json, &result, |r| output::print_calculation(r, recipe.mode))
        }
    }
}

/// Print `value` as JSON or through the report printer
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, report: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        report(value);
    }
    Ok(())
}
