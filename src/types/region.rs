//! Equilibrium region descriptors and depth trend tables (RSVD/RVVD, PBVD/PDVD)

use serde::{Deserialize, Serialize};

use crate::error::{EquilError, Result};

// ============================================================================
// Depth trends
// ============================================================================

/// One (depth, value) row of a depth trend table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct TrendPoint {
    /// Depth (m)
    pub depth: f64,
    pub value: f64,
}

impl From<[f64; 2]> for TrendPoint {
    fn from(v: [f64; 2]) -> Self {
        Self {
            depth: v[0],
            value: v[1],
        }
    }
}

impl From<TrendPoint> for [f64; 2] {
    fn from(p: TrendPoint) -> Self {
        [p.depth, p.value]
    }
}

/// Value-versus-depth table with constant extrapolation outside its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthTrend {
    pub points: Vec<TrendPoint>,
}

impl DepthTrend {
    /// Build a trend from `(depth, value)` pairs. Call [`validate`](Self::validate)
    /// before interpolating.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            points: points
                .into_iter()
                .map(|(depth, value)| TrendPoint { depth, value })
                .collect(),
        }
    }

    /// Build a trend from separate depth and value columns.
    pub fn from_columns(depths: &[f64], values: &[f64]) -> Result<Self> {
        if depths.len() != values.len() {
            return Err(EquilError::config(format!(
                "depth trend has {} depths but {} values",
                depths.len(),
                values.len()
            )));
        }
        Ok(Self::new(depths.iter().copied().zip(values.iter().copied())))
    }

    /// At least two points, finite values, strictly increasing depth.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.points.len() < 2 {
            return Err(EquilError::config(format!(
                "{name} needs at least 2 rows, has {}",
                self.points.len()
            )));
        }
        if let Some(p) = self
            .points
            .iter()
            .find(|p| !p.depth.is_finite() || !p.value.is_finite())
        {
            return Err(EquilError::config(format!(
                "{name} has non-finite row ({}, {})",
                p.depth, p.value
            )));
        }
        for w in self.points.windows(2) {
            if w[1].depth <= w[0].depth {
                return Err(EquilError::config(format!(
                    "{name} depths must be strictly increasing ({} followed by {})",
                    w[0].depth, w[1].depth
                )));
            }
        }
        Ok(())
    }

    /// Linear interpolation in depth, constant outside the table range.
    pub fn value_at(&self, depth: f64) -> f64 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return f64::NAN;
        };
        if depth <= first.depth {
            return first.value;
        }
        if depth >= last.depth {
            return last.value;
        }
        let i = self.points.partition_point(|p| p.depth < depth);
        let hi = self.points[i];
        if hi.depth == depth {
            return hi.value;
        }
        let lo = self.points[i - 1];
        let t = (depth - lo.depth) / (hi.depth - lo.depth);
        lo.value + t * (hi.value - lo.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The active depth trend pair of a region. Exactly one representation is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaturationTrend {
    /// RSVD + RVVD: solution ratios versus depth
    Ratio { rsvd: DepthTrend, rvvd: DepthTrend },
    /// PBVD + PDVD: saturation pressures versus depth
    SaturationPressure { pbvd: DepthTrend, pdvd: DepthTrend },
}

impl SaturationTrend {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Ratio { rsvd, rvvd } => {
                rsvd.validate("RSVD")?;
                rvvd.validate("RVVD")
            }
            Self::SaturationPressure { pbvd, pdvd } => {
                pbvd.validate("PBVD")?;
                pdvd.validate("PDVD")
            }
        }
    }

    /// Deck keywords of the pair, oil first.
    pub fn keywords(&self) -> [&'static str; 2] {
        match self {
            Self::Ratio { .. } => ["RSVD", "RVVD"],
            Self::SaturationPressure { .. } => ["PBVD", "PDVD"],
        }
    }
}

// ============================================================================
// Equilibrium region
// ============================================================================

/// Contact and structure depths of a region (m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contacts {
    pub goc: f64,
    pub owc: f64,
    pub top: f64,
    pub bottom: f64,
}

fn default_active() -> bool {
    true
}

/// One EQUIL region with its depth trends.
///
/// Loaded once and never modified; the `with_*` methods build new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumRegion {
    /// Equilibration region number (EQLNUM)
    pub eqlnum: u32,
    /// PVT region whose tables govern this region
    pub pvtnum: u32,
    /// Datum depth (m)
    pub ref_depth: f64,
    /// Pressure at datum depth (bar)
    pub ref_pressure: f64,
    /// Oil-water contact depth (m)
    pub owc: f64,
    /// Gas-oil contact depth (m)
    pub goc: f64,
    /// Structural top (m)
    pub top: f64,
    /// Structural bottom (m)
    pub bottom: f64,
    /// Capillary pressure at OWC (bar), carried for round-tripping
    #[serde(default)]
    pub pcowc: f64,
    /// Capillary pressure at GOC (bar), carried for round-tripping
    #[serde(default)]
    pub pcgoc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initrs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initrv: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<i64>,
    /// Inactive regions are carried through but never computed
    #[serde(default = "default_active")]
    pub active: bool,
    pub trends: SaturationTrend,
}

impl EquilibriumRegion {
    /// Check the minimum requirements of a fluid description.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("ref_depth", self.ref_depth),
            ("ref_pressure", self.ref_pressure),
            ("owc", self.owc),
            ("goc", self.goc),
            ("top", self.top),
            ("bottom", self.bottom),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(EquilError::config(format!(
                    "EQLNUM {}: {name} not defined (got {value})",
                    self.eqlnum
                )));
            }
        }
        if self.eqlnum == 0 {
            return Err(EquilError::config("EQLNUM not defined"));
        }
        if self.pvtnum == 0 {
            return Err(EquilError::config(format!(
                "EQLNUM {}: PVTNUM not defined",
                self.eqlnum
            )));
        }
        if self.ref_pressure <= 0.0 {
            return Err(EquilError::config(format!(
                "EQLNUM {}: reference pressure must be positive, got {}",
                self.eqlnum, self.ref_pressure
            )));
        }
        if self.top >= self.bottom {
            return Err(EquilError::config(format!(
                "EQLNUM {}: structural top {} must lie above bottom {}",
                self.eqlnum, self.top, self.bottom
            )));
        }
        if self.goc > self.owc {
            return Err(EquilError::config(format!(
                "EQLNUM {}: GOC {} lies below OWC {}",
                self.eqlnum, self.goc, self.owc
            )));
        }
        self.trends
            .validate()
            .map_err(|e| EquilError::config(format!("EQLNUM {}: {e}", self.eqlnum)))
    }

    pub fn contacts(&self) -> Contacts {
        Contacts {
            goc: self.goc,
            owc: self.owc,
            top: self.top,
            bottom: self.bottom,
        }
    }

    pub fn with_owc(&self, owc: f64) -> Self {
        Self { owc, ..self.clone() }
    }

    pub fn with_goc(&self, goc: f64) -> Self {
        Self { goc, ..self.clone() }
    }

    pub fn with_trends(&self, trends: SaturationTrend) -> Self {
        Self {
            trends,
            ..self.clone()
        }
    }
}
