// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! The run path itself never returns errors (failures surface through the
//! exit code and sink output); these types cover plan loading and the CLI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimplecmdError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimplecmdError>;
