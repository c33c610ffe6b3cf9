// src/config/io.rs
//! Reading and writing `socindex.toml`.

use std::fs;
use std::path::Path;

use super::Parameters;
use crate::error::{Result, SocIndexError};

/// Parses and validates parameters from TOML text. Missing keys take defaults.
///
/// # Errors
/// Returns a config error on malformed TOML and a validation error on
/// out-of-range values.
pub fn parse_toml(content: &str) -> Result<Parameters> {
    let params: Parameters = toml::from_str(content)?;
    params.validate()?;
    Ok(params)
}

/// Loads parameters from `path`.
///
/// # Errors
/// Returns an I/O error if the file cannot be read, otherwise as [`parse_toml`].
pub fn load(path: &Path) -> Result<Parameters> {
    let content = fs::read_to_string(path).map_err(|e| SocIndexError::io(e, path))?;
    parse_toml(&content)
}

/// Loads `path` when it exists, defaults otherwise.
///
/// # Errors
/// As [`load`], for an existing file.
pub fn load_or_default(path: &Path) -> Result<Parameters> {
    if path.exists() {
        load(path)
    } else {
        Ok(Parameters::default())
    }
}

/// Renders parameters as TOML.
///
/// # Errors
/// Returns a validation error if serialization fails.
pub fn to_toml(params: &Parameters) -> Result<String> {
    toml::to_string_pretty(params)
        .map_err(|e| SocIndexError::validation(format!("cannot serialize parameters: {e}")))
}
