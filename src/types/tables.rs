//! PVT table types: PVTO, PVTG, PVTW and DENSITY rows for one PVT region
//!
//! Rows are kept exactly as delivered by the deck reader. Indexing into
//! per-key sub-tables happens once, when a [`PvtEngine`](crate::pvt::PvtEngine)
//! is built.

use serde::{Deserialize, Serialize};

// ============================================================================
// Oil (PVTO)
// ============================================================================

/// One PVTO row.
///
/// Serialized as `[rs, pressure, bo, viso]` so tables stay compact in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct OilRow {
    /// Solution gas-oil ratio (Sm3/Sm3)
    pub rs: f64,
    /// Pressure (bar). The first row of each Rs is the bubble point.
    pub pressure: f64,
    /// Oil formation volume factor (rm3/Sm3)
    pub bo: f64,
    /// Oil viscosity (cP)
    pub viso: f64,
}

impl From<[f64; 4]> for OilRow {
    fn from(v: [f64; 4]) -> Self {
        Self {
            rs: v[0],
            pressure: v[1],
            bo: v[2],
            viso: v[3],
        }
    }
}

impl From<OilRow> for [f64; 4] {
    fn from(r: OilRow) -> Self {
        [r.rs, r.pressure, r.bo, r.viso]
    }
}

// ============================================================================
// Gas (PVTG)
// ============================================================================

/// One PVTG row.
///
/// Serialized as `[pressure, rv, bg, visg]`. The first row of each pressure is
/// the saturated (dew point) Rv; following rows carry decreasing Rv.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct GasRow {
    /// Pressure (bar)
    pub pressure: f64,
    /// Vaporized oil-gas ratio (Sm3/Sm3)
    pub rv: f64,
    /// Gas formation volume factor (rm3/Sm3)
    pub bg: f64,
    /// Gas viscosity (cP)
    pub visg: f64,
}

impl From<[f64; 4]> for GasRow {
    fn from(v: [f64; 4]) -> Self {
        Self {
            pressure: v[0],
            rv: v[1],
            bg: v[2],
            visg: v[3],
        }
    }
}

impl From<GasRow> for [f64; 4] {
    fn from(r: GasRow) -> Self {
        [r.pressure, r.rv, r.bg, r.visg]
    }
}

// ============================================================================
// Water (PVTW) and surface densities
// ============================================================================

/// PVTW correlation row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterTrend {
    /// Reference pressure (bar)
    pub p_ref: f64,
    /// Water formation volume factor at reference pressure (rm3/Sm3)
    pub bw_ref: f64,
    /// Water compressibility (1/bar)
    pub compressibility: f64,
    /// Water viscosity at reference pressure (cP)
    pub visw_ref: f64,
    /// Water viscosibility (1/bar)
    #[serde(default)]
    pub viscosibility: f64,
}

/// Fluid densities at standard conditions (kg/m3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDensities {
    pub oil: f64,
    pub gas: f64,
    pub water: f64,
}

// ============================================================================
// Table set
// ============================================================================

/// All measured tables of one PVT region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvtTableSet {
    /// PVT region number (PVTNUM)
    pub pvtnum: u32,
    pub densities: SurfaceDensities,
    pub water: WaterTrend,
    /// PVTO rows in deck order
    pub oil: Vec<OilRow>,
    /// PVTG rows in deck order
    pub gas: Vec<GasRow>,
}
