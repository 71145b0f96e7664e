// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::Result;

/// Load a plan file from a given path and return the raw `RawPlanFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for a
/// runnable plan.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlanFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let plan: RawPlanFile = toml::from_str(&contents)?;

    Ok(plan)
}

/// Load a plan file and validate it.
///
/// Checks for:
/// - at least one `[[command]]`,
/// - non-empty `program`,
/// - positive numeric `progress`,
/// - unique command names.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw = load_from_path(&path)?;
    let plan = PlanFile::try_from(raw)?;
    Ok(plan)
}

/// `Simplecmd.toml` in the current working directory.
pub fn default_plan_path() -> PathBuf {
    PathBuf::from("Simplecmd.toml")
}
