//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery. Values that operators may tune
//! are also exposed through [`EquilConfig`](super::EquilConfig).

// ============================================================================
// Physics
// ============================================================================

/// Gravity term of the hydrostatic step (bar·m³/kg per m).
///
/// `ΔP [bar] = GRAVITY × ρ [kg/m³] × Δz [m]`
pub const GRAVITY: f64 = 0.0981 / 1000.0;

// ============================================================================
// Depth Integration
// ============================================================================

/// Depth intervals between structural top and bottom.
pub const NODE_COUNT: usize = 20;

// ============================================================================
// Consistency Checks
// ============================================================================

/// Allowed excess of saturation pressure over local pressure (bar).
pub const SATURATION_TOLERANCE_BAR: f64 = 0.1;

/// Undersaturation at the GOC beyond which a warning is raised (bar).
pub const GOC_UNDERSATURATION_BAR: f64 = 0.1;

/// Largest plausible saturation-pressure gradient (bar/m).
pub const MAX_SATURATION_GRADIENT_BAR_PER_M: f64 = 1.0;

// ============================================================================
// Config Search
// ============================================================================

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "PVT_EQUIL_CONFIG";

/// Settings file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pvt_equil.toml";
