//! Depth profile types: one computed node per depth, ordered top to bottom

use serde::{Deserialize, Serialize};

/// Mobile phase assigned to a depth node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "gas")]
    Gas,
    #[serde(rename = "oil")]
    Oil,
    #[serde(rename = "wat")]
    Water,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Gas => "gas",
            Phase::Oil => "oil",
            Phase::Water => "wat",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fluid state at one depth.
///
/// `rs`/`rv` and `pbub`/`pdew` are the trend targets at this depth. Oil and gas
/// properties are undersaturated at those targets when the saturation point
/// lies below `pressure`, otherwise saturated at `pressure`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthNode {
    /// Depth (m)
    pub depth: f64,
    pub phase: Phase,
    /// Pressure (bar)
    pub pressure: f64,
    /// Solution gas-oil ratio target (Sm3/Sm3)
    pub rs: f64,
    /// Vaporized oil-gas ratio target (Sm3/Sm3)
    pub rv: f64,
    /// Bubble point pressure (bar)
    pub pbub: f64,
    /// Dew point pressure (bar)
    pub pdew: f64,
    pub bo: f64,
    /// Oil viscosity (cP)
    pub viso: f64,
    /// Oil density (kg/m3)
    pub deno: f64,
    pub bg: f64,
    /// Gas viscosity (cP)
    pub visg: f64,
    /// Gas density (kg/m3)
    pub deng: f64,
    pub bw: f64,
    /// Water viscosity (cP)
    pub visw: f64,
    /// Water density (kg/m3)
    pub denw: f64,
}

impl DepthNode {
    /// Density of the node's own phase, the hydrostatic driver.
    pub fn density(&self) -> f64 {
        match self.phase {
            Phase::Gas => self.deng,
            Phase::Oil => self.deno,
            Phase::Water => self.denw,
        }
    }

    /// Bubble point in oil, dew point in gas, none in water.
    pub fn saturation_pressure(&self) -> Option<f64> {
        match self.phase {
            Phase::Gas => Some(self.pdew),
            Phase::Oil => Some(self.pbub),
            Phase::Water => None,
        }
    }
}

/// Computed profile of one equilibrium region, strictly increasing in depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthProfile {
    pub eqlnum: u32,
    pub pvtnum: u32,
    pub nodes: Vec<DepthNode>,
}

impl DepthProfile {
    pub fn nodes(&self) -> &[DepthNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node closest to `depth`; the shallower node wins a tie.
    pub fn nearest_node(&self, depth: f64) -> Option<(usize, &DepthNode)> {
        self.nodes.iter().enumerate().fold(None, |best, (i, node)| {
            let dist = (node.depth - depth).abs();
            match best {
                Some((_, b)) if (b.depth - depth).abs() <= dist => best,
                _ => Some((i, node)),
            }
        })
    }

    /// Shallowest and deepest node depth.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        Some((self.nodes.first()?.depth, self.nodes.last()?.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(depth: f64, phase: Phase) -> DepthNode {
        DepthNode {
            depth,
            phase,
            pressure: 400.0,
            rs: 200.0,
            rv: 0.001,
            pbub: 390.0,
            pdew: 380.0,
            bo: 1.5,
            viso: 0.4,
            deno: 700.0,
            bg: 0.004,
            visg: 0.03,
            deng: 250.0,
            bw: 1.01,
            visw: 0.3,
            denw: 1000.0,
        }
    }

    #[test]
    fn test_density_follows_phase() {
        assert_eq!(node(1.0, Phase::Gas).density(), 250.0);
        assert_eq!(node(1.0, Phase::Oil).density(), 700.0);
        assert_eq!(node(1.0, Phase::Water).density(), 1000.0);
    }

    #[test]
    fn test_saturation_pressure_by_phase() {
        assert_eq!(node(1.0, Phase::Gas).saturation_pressure(), Some(380.0));
        assert_eq!(node(1.0, Phase::Oil).saturation_pressure(), Some(390.0));
        assert_eq!(node(1.0, Phase::Water).saturation_pressure(), None);
    }

    #[test]
    fn test_nearest_node() {
        let profile = DepthProfile {
            eqlnum: 1,
            pvtnum: 1,
            nodes: vec![
                node(100.0, Phase::Gas),
                node(110.0, Phase::Oil),
                node(120.0, Phase::Oil),
            ],
        };
        assert_eq!(profile.nearest_node(108.0).map(|(i, _)| i), Some(1));
        assert_eq!(profile.nearest_node(105.0).map(|(i, _)| i), Some(0));
        assert_eq!(profile.nearest_node(500.0).map(|(i, _)| i), Some(2));
        assert_eq!(profile.depth_range(), Some((100.0, 120.0)));
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::Water.to_string(), "wat");
        assert_eq!(serde_json::to_string(&Phase::Gas).unwrap(), "\"gas\"");
    }
}
