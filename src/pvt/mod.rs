//! PVT Interpolation Engine
//!
//! Black-oil fluid properties for one PVT region, evaluated from the measured
//! PVTO / PVTG tables and the PVTW correlation.
//!
//! ## Oil (PVTO)
//! - `rs_from_pbub()` / `pbub_from_rs()` - saturation curve
//! - `bo()` / `viso()` / `deno()` - saturated, or undersaturated at a given Rs / Pbub
//!
//! ## Gas (PVTG)
//! - `rv_from_pdew()` / `pdew_from_rv()` - saturation curve
//! - `bg()` / `visg()` / `deng()` - interpolated as 1/Bg and 1/(Bg·Visg)
//!
//! ## Water (PVTW)
//! - `bw()` / `visw()` / `denw()` - analytic, defined at any pressure
//!
//! Undersaturated values use two-stage interpolation: across each bracketing
//! key's branch first (pressure for oil, Rv for gas), then across the keys.
//!
//! Table lookups outside the measured range follow the engine's
//! [`ExtrapolationPolicy`]. The first violation is logged once per engine.

mod index;
mod interp;
pub mod water;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EquilError, Result};
use crate::types::{PvtTableSet, SurfaceDensities, WaterTrend};
use index::{GasIndex, OilIndex};
use interp::{lerp, locate, Located, Span};

// ============================================================================
// Arguments and results
// ============================================================================

/// Behaviour of table lookups outside the measured range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Fail with `OutOfRange`
    #[default]
    Reject,
    /// Hold the end value of the table (constant extrapolation)
    Clamp,
}

/// Optional oil ratio argument: solution GOR or bubble point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OilRatio {
    Rs(f64),
    Pbub(f64),
}

impl OilRatio {
    /// Combine the two optional call arguments. Supplying both is an error.
    pub fn from_args(rs: Option<f64>, pbub: Option<f64>) -> Result<Option<Self>> {
        match (rs, pbub) {
            (Some(_), Some(_)) => Err(EquilError::InvalidArgument(
                "rs and pbub are mutually exclusive".to_string(),
            )),
            (Some(rs), None) => Ok(Some(Self::Rs(finite("Rs", rs)?))),
            (None, Some(pbub)) => Ok(Some(Self::Pbub(finite("Pbub", pbub)?))),
            (None, None) => Ok(None),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Rs(_) => "Rs",
            Self::Pbub(_) => "Pbub",
        }
    }
}

/// Optional gas ratio argument: vaporized OGR or dew point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GasRatio {
    Rv(f64),
    Pdew(f64),
}

impl GasRatio {
    /// Combine the two optional call arguments. Supplying both is an error.
    pub fn from_args(rv: Option<f64>, pdew: Option<f64>) -> Result<Option<Self>> {
        match (rv, pdew) {
            (Some(_), Some(_)) => Err(EquilError::InvalidArgument(
                "rv and pdew are mutually exclusive".to_string(),
            )),
            (Some(rv), None) => Ok(Some(Self::Rv(finite("Rv", rv)?))),
            (None, Some(pdew)) => Ok(Some(Self::Pdew(finite("Pdew", pdew)?))),
            (None, None) => Ok(None),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Rv(_) => "Rv",
            Self::Pdew(_) => "Pdew",
        }
    }
}

/// Oil properties at one pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OilState {
    /// Effective solution GOR (Sm3/Sm3)
    pub rs: f64,
    /// Bubble point (bar)
    pub pbub: f64,
    pub bo: f64,
    pub viso: f64,
    /// Reservoir oil density (kg/m3)
    pub density: f64,
}

/// Gas properties at one pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasState {
    /// Effective vaporized OGR (Sm3/Sm3)
    pub rv: f64,
    /// Dew point (bar)
    pub pdew: f64,
    pub bg: f64,
    pub visg: f64,
    /// Reservoir gas density (kg/m3)
    pub density: f64,
}

/// Which end of a branch is the saturated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaturatedEnd {
    Low,
    High,
}

fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EquilError::InvalidArgument(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Evaluate the bracketing key rows and blend them.
fn two_stage<F>(key: Span, row: F) -> Result<[f64; 2]>
where
    F: Fn(usize) -> Result<[f64; 2]>,
{
    match key {
        Span::Node(i) => row(i),
        Span::Between(i, t) => {
            let lo = row(i)?;
            let hi = row(i + 1)?;
            Ok([lerp(lo[0], hi[0], t), lerp(lo[1], hi[1], t)])
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Interpolation engine pinned to the tables of one PVT region.
///
/// Read-only after construction and safe to share between threads; only the
/// out-of-range notice flag is mutated.
#[derive(Debug)]
pub struct PvtEngine {
    pvtnum: u32,
    densities: SurfaceDensities,
    water: WaterTrend,
    oil: OilIndex,
    gas: GasIndex,
    policy: ExtrapolationPolicy,
    out_of_range_reported: AtomicBool,
}

impl PvtEngine {
    /// Index the tables of one PVT region.
    pub fn new(tables: &PvtTableSet, policy: ExtrapolationPolicy) -> Result<Self> {
        let pvtnum = tables.pvtnum;
        let d = tables.densities;
        if ![d.oil, d.gas, d.water].iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(EquilError::config(format!(
                "PVTNUM {pvtnum}: surface densities must be positive"
            )));
        }
        water::validate(pvtnum, &tables.water)?;

        Ok(Self {
            pvtnum,
            densities: d,
            water: tables.water,
            oil: OilIndex::build(pvtnum, &tables.oil)?,
            gas: GasIndex::build(pvtnum, &tables.gas)?,
            policy,
            out_of_range_reported: AtomicBool::new(false),
        })
    }

    pub fn pvtnum(&self) -> u32 {
        self.pvtnum
    }

    pub fn policy(&self) -> ExtrapolationPolicy {
        self.policy
    }

    pub fn densities(&self) -> SurfaceDensities {
        self.densities
    }

    pub fn water(&self) -> &WaterTrend {
        &self.water
    }

    /// Whether this engine has already logged a table domain violation.
    pub fn has_reported_out_of_range(&self) -> bool {
        self.out_of_range_reported.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------------
    // Saturation curves
    // ------------------------------------------------------------------------

    /// Solution GOR of oil with the given bubble point.
    pub fn rs_from_pbub(&self, pbub: f64) -> Result<f64> {
        let span = self.resolve("Pbub", &self.oil.pbub, finite("Pbub", pbub)?)?;
        Ok(span.apply(&self.oil.rs))
    }

    /// Bubble point of oil with the given solution GOR.
    pub fn pbub_from_rs(&self, rs: f64) -> Result<f64> {
        let span = self.resolve("Rs", &self.oil.rs, finite("Rs", rs)?)?;
        Ok(span.apply(&self.oil.pbub))
    }

    /// Vaporized OGR of gas with the given dew point.
    pub fn rv_from_pdew(&self, pdew: f64) -> Result<f64> {
        let span = self.resolve("Pdew", &self.gas.pressure, finite("Pdew", pdew)?)?;
        Ok(span.apply(&self.gas.rv_sat))
    }

    /// Dew point of gas with the given vaporized OGR.
    pub fn pdew_from_rv(&self, rv: f64) -> Result<f64> {
        let span = self.resolve("Rv", &self.gas.rv_sat, finite("Rv", rv)?)?;
        Ok(span.apply(&self.gas.pressure))
    }

    // ------------------------------------------------------------------------
    // Oil
    // ------------------------------------------------------------------------

    /// Oil properties at `pressure`.
    ///
    /// With neither `rs` nor `pbub`, the oil is saturated at `pressure`.
    /// Otherwise the ratio's bubble point must not exceed `pressure`.
    pub fn oil_state(&self, pressure: f64, rs: Option<f64>, pbub: Option<f64>) -> Result<OilState> {
        let pressure = finite("Pressure", pressure)?;
        let Some(ratio) = OilRatio::from_args(rs, pbub)? else {
            return self.saturated_oil(pressure);
        };

        let (rs, pbub) = match ratio {
            OilRatio::Rs(rs) => (rs, self.pbub_from_rs(rs)?),
            OilRatio::Pbub(pbub) => (self.rs_from_pbub(pbub)?, pbub),
        };
        if pbub > pressure {
            return Err(EquilError::InconsistentInput {
                ratio: ratio.name(),
                saturation_pressure: pbub,
                pressure,
            });
        }

        let key = self.resolve("Rs", &self.oil.rs, rs)?;
        let [bo, viso] = two_stage(key, |i| {
            let branch = &self.oil.branches[i];
            let span = self.branch_span("Pressure", &branch.pressure, pressure, SaturatedEnd::Low)?;
            Ok([span.apply(&branch.bo), span.apply(&branch.viso)])
        })?;

        Ok(OilState {
            rs,
            pbub,
            bo,
            viso,
            density: self.oil_density(rs, bo),
        })
    }

    fn saturated_oil(&self, pressure: f64) -> Result<OilState> {
        let (span, pbub) = self.resolve_saturation("Pressure", &self.oil.pbub, pressure)?;
        let rs = span.apply(&self.oil.rs);
        let bo = span.apply(&self.oil.bo_sat);
        Ok(OilState {
            rs,
            pbub,
            bo,
            viso: span.apply(&self.oil.viso_sat),
            density: self.oil_density(rs, bo),
        })
    }

    fn oil_density(&self, rs: f64, bo: f64) -> f64 {
        (self.densities.oil + rs * self.densities.gas) / bo
    }

    /// Oil formation volume factor.
    pub fn bo(&self, pressure: f64, rs: Option<f64>, pbub: Option<f64>) -> Result<f64> {
        Ok(self.oil_state(pressure, rs, pbub)?.bo)
    }

    /// Oil viscosity.
    pub fn viso(&self, pressure: f64, rs: Option<f64>, pbub: Option<f64>) -> Result<f64> {
        Ok(self.oil_state(pressure, rs, pbub)?.viso)
    }

    /// Reservoir oil density: (ρo,sc + Rs·ρg,sc) / Bo
    pub fn deno(&self, pressure: f64, rs: Option<f64>, pbub: Option<f64>) -> Result<f64> {
        Ok(self.oil_state(pressure, rs, pbub)?.density)
    }

    // ------------------------------------------------------------------------
    // Gas
    // ------------------------------------------------------------------------

    /// Gas properties at `pressure`.
    ///
    /// With neither `rv` nor `pdew`, the gas is saturated at `pressure`.
    /// Otherwise the ratio's dew point must not exceed `pressure`.
    pub fn gas_state(&self, pressure: f64, rv: Option<f64>, pdew: Option<f64>) -> Result<GasState> {
        let pressure = finite("Pressure", pressure)?;
        let Some(ratio) = GasRatio::from_args(rv, pdew)? else {
            return self.saturated_gas(pressure);
        };

        let (rv, pdew) = match ratio {
            GasRatio::Rv(rv) => (rv, self.pdew_from_rv(rv)?),
            GasRatio::Pdew(pdew) => (self.rv_from_pdew(pdew)?, pdew),
        };
        if pdew > pressure {
            return Err(EquilError::InconsistentInput {
                ratio: ratio.name(),
                saturation_pressure: pdew,
                pressure,
            });
        }

        let key = self.resolve("Pressure", &self.gas.pressure, pressure)?;
        let [inv_bg, inv_bgvisg] = two_stage(key, |i| {
            let branch = &self.gas.branches[i];
            let span = self.branch_span("Rv", &branch.rv, rv, SaturatedEnd::High)?;
            Ok([span.apply(&branch.inv_bg), span.apply(&branch.inv_bgvisg)])
        })?;

        let bg = 1.0 / inv_bg;
        Ok(GasState {
            rv,
            pdew,
            bg,
            visg: 1.0 / (inv_bgvisg * bg),
            density: self.gas_density(rv, bg),
        })
    }

    fn saturated_gas(&self, pressure: f64) -> Result<GasState> {
        let (span, pdew) = self.resolve_saturation("Pressure", &self.gas.pressure, pressure)?;
        let rv = span.apply(&self.gas.rv_sat);
        let bg = 1.0 / span.apply(&self.gas.inv_bg_sat);
        Ok(GasState {
            rv,
            pdew,
            bg,
            visg: 1.0 / (span.apply(&self.gas.inv_bgvisg_sat) * bg),
            density: self.gas_density(rv, bg),
        })
    }

    fn gas_density(&self, rv: f64, bg: f64) -> f64 {
        (self.densities.gas + rv * self.densities.oil) / bg
    }

    /// Gas formation volume factor.
    pub fn bg(&self, pressure: f64, rv: Option<f64>, pdew: Option<f64>) -> Result<f64> {
        Ok(self.gas_state(pressure, rv, pdew)?.bg)
    }

    /// Gas viscosity.
    pub fn visg(&self, pressure: f64, rv: Option<f64>, pdew: Option<f64>) -> Result<f64> {
        Ok(self.gas_state(pressure, rv, pdew)?.visg)
    }

    /// Reservoir gas density: (ρg,sc + Rv·ρo,sc) / Bg
    pub fn deng(&self, pressure: f64, rv: Option<f64>, pdew: Option<f64>) -> Result<f64> {
        Ok(self.gas_state(pressure, rv, pdew)?.density)
    }

    // ------------------------------------------------------------------------
    // Water
    // ------------------------------------------------------------------------

    pub fn bw(&self, pressure: f64) -> f64 {
        water::bw(&self.water, pressure)
    }

    pub fn visw(&self, pressure: f64) -> f64 {
        water::visw(&self.water, pressure)
    }

    pub fn denw(&self, pressure: f64) -> f64 {
        water::denw(&self.water, self.densities.water, pressure)
    }

    // ------------------------------------------------------------------------
    // Lookup plumbing
    // ------------------------------------------------------------------------

    /// Locate `x` on a key column, applying the extrapolation policy.
    fn resolve(&self, quantity: &'static str, xs: &[f64], x: f64) -> Result<Span> {
        match locate(xs, x) {
            Located::Inside(span) => Ok(span),
            Located::Below => self.out_of_range(quantity, xs, x, 0),
            Located::Above => self.out_of_range(quantity, xs, x, xs.len() - 1),
        }
    }

    /// Like `resolve` on a saturation-pressure column, also returning the
    /// saturation pressure actually used.
    fn resolve_saturation(&self, quantity: &'static str, xs: &[f64], x: f64) -> Result<(Span, f64)> {
        match self.resolve(quantity, xs, x)? {
            Span::Node(i) => Ok((Span::Node(i), xs[i])),
            span @ Span::Between(..) => Ok((span, x)),
        }
    }

    /// Locate `x` on one branch. Past the saturated end the branch holds its
    /// saturated value; past the other end the policy applies.
    fn branch_span(&self, quantity: &'static str, xs: &[f64], x: f64, saturated: SaturatedEnd) -> Result<Span> {
        let last = xs.len() - 1;
        match (locate(xs, x), saturated) {
            (Located::Inside(span), _) => Ok(span),
            (Located::Below, SaturatedEnd::Low) => Ok(Span::Node(0)),
            (Located::Above, SaturatedEnd::High) => Ok(Span::Node(last)),
            (Located::Below, SaturatedEnd::High) => self.out_of_range(quantity, xs, x, 0),
            (Located::Above, SaturatedEnd::Low) => self.out_of_range(quantity, xs, x, last),
        }
    }

    fn out_of_range(&self, quantity: &'static str, xs: &[f64], x: f64, nearest: usize) -> Result<Span> {
        let (min, max) = (xs[0], xs[xs.len() - 1]);
        if !self.out_of_range_reported.swap(true, Ordering::Relaxed) {
            warn!(
                pvtnum = self.pvtnum,
                quantity,
                value = x,
                min,
                max,
                policy = ?self.policy,
                "PVT lookup outside table interval"
            );
        }
        match self.policy {
            ExtrapolationPolicy::Reject => Err(EquilError::OutOfRange {
                quantity,
                value: x,
                min,
                max,
            }),
            ExtrapolationPolicy::Clamp => Ok(Span::Node(nearest)),
        }
    }
}
