//! Field input document: typed PVT tables and equilibrium regions
//!
//! The document is what a deck reader hands over and what a deck writer
//! receives back after correction. TOML is the default format; files ending
//! in `.json` are read and written as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::error::EquilError;
use crate::types::{EquilibriumRegion, PvtTableSet};

/// All tables and regions of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInput {
    /// One table set per PVT region
    #[serde(default)]
    pub pvt: Vec<PvtTableSet>,
    /// One entry per equilibrium region, in deck order
    #[serde(default)]
    pub equil: Vec<EquilibriumRegion>,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Input parse error ({}): {1}", .0.display())]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("Input parse error ({}): {1}", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Input serialization error: {0}")]
    Serialize(String),
}

impl From<InputError> for EquilError {
    fn from(e: InputError) -> Self {
        EquilError::Configuration(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

impl FieldInput {
    /// Read a field document, choosing the format by file extension.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| InputError::Io(path.to_path_buf(), e))?;
        let input: Self = match Format::of(path) {
            Format::Json => serde_json::from_str(&contents)
                .map_err(|e| InputError::Json(path.to_path_buf(), e))?,
            Format::Toml => {
                toml::from_str(&contents).map_err(|e| InputError::Toml(path.to_path_buf(), e))?
            }
        };
        info!(
            path = %path.display(),
            pvt_regions = input.pvt.len(),
            equil_regions = input.equil.len(),
            "Loaded field input"
        );
        Ok(input)
    }

    pub fn to_toml(&self) -> Result<String, InputError> {
        toml::to_string(self).map_err(|e| InputError::Serialize(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        serde_json::to_string_pretty(self).map_err(|e| InputError::Serialize(e.to_string()))
    }

    /// Write the document, choosing the format by file extension.
    pub fn save(&self, path: &Path) -> Result<(), InputError> {
        let contents = match Format::of(path) {
            Format::Json => self.to_json()?,
            Format::Toml => self.to_toml()?,
        };
        std::fs::write(path, contents).map_err(|e| InputError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Field input saved");
        Ok(())
    }
}
