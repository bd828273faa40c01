//! Run settings - integration, interpolation and checker tolerances as TOML
//!
//! Each struct implements `Default` with the built-in constants from
//! [`defaults`](super::defaults), so a missing file or section changes nothing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::pvt::ExtrapolationPolicy;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root settings of an equilibration run.
///
/// Load with `EquilConfig::load()` which searches:
/// 1. `$PVT_EQUIL_CONFIG` env var
/// 2. `./pvt_equil.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquilConfig {
    /// Depth march resolution
    #[serde(default)]
    pub integration: IntegrationConfig,

    /// PVT table domain handling
    #[serde(default)]
    pub interpolation: InterpolationConfig,

    /// Consistency checker tolerances
    #[serde(default)]
    pub consistency: ConsistencyConfig,

    /// Table corrector behaviour
    #[serde(default)]
    pub correction: CorrectionConfig,
}

impl EquilConfig {
    /// Load settings using the standard search order:
    /// 1. `$PVT_EQUIL_CONFIG` environment variable
    /// 2. `./pvt_equil.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded settings from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load settings from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded settings from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::CONFIG_FILE_NAME);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse settings from TOML text: unknown keys are logged, then the
    /// parsed values are range-checked.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the current settings to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Reject values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = super::validation::validate_ranges(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

/// Depth march resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Depth intervals between structural top and bottom
    #[serde(default = "default_node_count")]
    pub node_count: usize,
}

fn default_node_count() -> usize {
    defaults::NODE_COUNT
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
        }
    }
}

/// PVT table domain handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// "reject" fails out-of-range lookups, "clamp" holds the table end value
    #[serde(default)]
    pub extrapolation: ExtrapolationPolicy,
}

/// Consistency checker tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    /// Allowed excess of saturation pressure over local pressure (bar)
    #[serde(default = "default_saturation_tolerance")]
    pub saturation_tolerance_bar: f64,

    /// Undersaturation at the GOC beyond which a warning is raised (bar)
    #[serde(default = "default_goc_undersaturation")]
    pub goc_undersaturation_bar: f64,

    /// Largest plausible saturation-pressure gradient (bar/m)
    #[serde(default = "default_max_gradient")]
    pub max_saturation_gradient_bar_per_m: f64,
}

fn default_saturation_tolerance() -> f64 {
    defaults::SATURATION_TOLERANCE_BAR
}

fn default_goc_undersaturation() -> f64 {
    defaults::GOC_UNDERSATURATION_BAR
}

fn default_max_gradient() -> f64 {
    defaults::MAX_SATURATION_GRADIENT_BAR_PER_M
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            saturation_tolerance_bar: default_saturation_tolerance(),
            goc_undersaturation_bar: default_goc_undersaturation(),
            max_saturation_gradient_bar_per_m: default_max_gradient(),
        }
    }
}

/// Table corrector behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Also force saturation at the GOC when the fluid there is undersaturated
    #[serde(default)]
    pub saturate_goc: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EquilConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.integration.node_count, 20);
        assert_eq!(config.interpolation.extrapolation, ExtrapolationPolicy::Reject);
        assert!(!config.correction.saturate_goc);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EquilConfig::from_toml_str("").unwrap();
        assert_eq!(config, EquilConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = EquilConfig::from_toml_str(
            r#"
[interpolation]
extrapolation = "clamp"

[consistency]
saturation_tolerance_bar = 0.5
"#,
        )
        .unwrap();
        assert_eq!(config.interpolation.extrapolation, ExtrapolationPolicy::Clamp);
        assert_eq!(config.consistency.saturation_tolerance_bar, 0.5);
        assert_eq!(config.consistency.goc_undersaturation_bar, 0.1);
        assert_eq!(config.integration.node_count, 20);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = EquilConfig::default();
        config.integration.node_count = 50;
        config.correction.saturate_goc = true;
        let text = config.to_toml().unwrap();
        let parsed = EquilConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_zero_nodes_rejected() {
        let err = EquilConfig::from_toml_str("[integration]\nnode_count = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("node_count"));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = EquilConfig::from_toml_str("[interpolation]\nextrapolation = \"linear\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }
}
