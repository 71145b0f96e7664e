// src/config/mod.rs

//! Plan files: a list of commands to run one after another.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate it into a runnable [`PlanFile`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_plan_path, load_and_validate, load_from_path};
pub use model::{
    CommandEntry, DefaultsSection, PlanCommand, PlanFile, ProgressSetting, RawPlanFile,
};
