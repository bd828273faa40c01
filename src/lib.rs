//! pvt-equil: Black-Oil PVT Equilibration
//!
//! Initial fluid state versus depth for reservoir simulation decks.
//!
//! ## Architecture
//!
//! - **PVT Engine**: Two-stage interpolation of PVTO / PVTG, analytic PVTW
//! - **Depth Integration**: Hydrostatic march from the datum to top and bottom
//! - **Consistency**: Checks of computed profiles and correction of depth trends
//! - **Field**: Parallel per-region runs merged into one report

pub mod config;
pub mod consistency;
pub mod equilibrium;
pub mod error;
pub mod field;
pub mod input;
pub mod pvt;
pub mod types;

// Re-export run settings
pub use config::{ConfigError, EquilConfig};

// Re-export errors
pub use error::{EquilError, Result};

// Re-export commonly used types
pub use types::{
    DepthNode, DepthProfile, DepthTrend, Diagnostic, EquilibriumRegion, FieldReport, Phase,
    PvtTableSet, RegionReport, RegionStatus, SaturationTrend, Severity, SeverityCounts,
};

// Re-export engines and entry points
pub use consistency::{check_profile, correct_trends};
pub use equilibrium::compute_profile;
pub use field::{Adjustment, Field};
pub use input::{FieldInput, InputError};
pub use pvt::{ExtrapolationPolicy, PvtEngine};
