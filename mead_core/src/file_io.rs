//! # File I/O Module
//!
//! Recipe file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## File Format
//!
//! Recipes are saved as `.mead` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mead_core::file_io::{save_recipe, load_recipe};
//! use mead_core::recipe::Recipe;
//! use std::path::Path;
//!
//! let recipe = Recipe::new("Traditional");
//! let path = Path::new("traditional.mead");
//!
//! save_recipe(&recipe, path).unwrap();
//! let loaded = load_recipe(path).unwrap();
//! assert_eq!(loaded.id, recipe.id);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{CalcError, CalcResult};
use crate::recipe::{Recipe, SCHEMA_VERSION};

/// File extension for recipe documents
pub const RECIPE_EXTENSION: &str = "mead";

/// Save a recipe to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize recipe to JSON
/// 2. Write to a temporary file (.mead.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename the temporary file over the target
///
/// An interrupted save leaves the previous file intact.
pub fn save_recipe(recipe: &Recipe, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(recipe).map_err(|e| CalcError::serialization(e.to_string()))?;

    let tmp_path = path.with_extension(format!("{}.tmp", RECIPE_EXTENSION));

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), recipe = %recipe.id, "saved recipe");
    Ok(())
}

/// Load a recipe from a file.
///
/// # Returns
///
/// * `Ok(Recipe)` - Successfully loaded recipe
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_recipe(path: &Path) -> CalcResult<Recipe> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let recipe: Recipe = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&recipe.meta.version)?;

    tracing::debug!(path = %path.display(), recipe = %recipe.id, "loaded recipe");
    Ok(recipe)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
