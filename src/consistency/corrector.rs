//! Depth trend correction
//!
//! Rebuilds the trend pair of a region so that the fluid is never
//! oversaturated and the ratios fall away monotonically from the GOC: Rv
//! toward the top, Rs toward the bottom.

use tracing::info;

use crate::error::{EquilError, Result};
use crate::pvt::PvtEngine;
use crate::types::{DepthProfile, DepthTrend, EquilibriumRegion, SaturationTrend};

/// Corrected trend pair of `region`, one point per profile node.
///
/// At the GOC node each ratio is reset to its saturated value at local
/// pressure when oversaturated, or always when `saturate_goc` is set. Walking
/// up, Rv is bounded by the previous corrected value and by saturation at
/// local pressure; Rs is held at its GOC value. Walking down, Rs follows the
/// same rule and Rv is held. The result uses the region's own representation
/// and leaves `profile` untouched.
pub fn correct_trends(
    profile: &DepthProfile,
    region: &EquilibriumRegion,
    engine: &PvtEngine,
    saturate_goc: bool,
) -> Result<SaturationTrend> {
    let nodes = profile.nodes();
    let Some((goc_index, goc)) = profile.nearest_node(region.goc) else {
        return Err(EquilError::InvalidArgument(format!(
            "EQLNUM {}: cannot correct trends of an empty profile",
            region.eqlnum
        )));
    };

    let rs_goc = if saturate_goc || goc.pbub > goc.pressure {
        engine.rs_from_pbub(goc.pressure)?
    } else {
        goc.rs
    };
    let rv_goc = if saturate_goc || goc.pdew > goc.pressure {
        engine.rv_from_pdew(goc.pressure)?
    } else {
        goc.rv
    };

    let mut rs = vec![rs_goc; nodes.len()];
    let mut rv = vec![rv_goc; nodes.len()];

    let mut bound = rv_goc;
    for (i, node) in nodes.iter().enumerate().take(goc_index).rev() {
        let mut value = node.rv.min(bound);
        if engine.pdew_from_rv(value)? > node.pressure {
            value = engine.rv_from_pdew(node.pressure)?;
        }
        rv[i] = value;
        bound = value;
    }

    let mut bound = rs_goc;
    for (i, node) in nodes.iter().enumerate().skip(goc_index + 1) {
        let mut value = node.rs.min(bound);
        if engine.pbub_from_rs(value)? > node.pressure {
            value = engine.rs_from_pbub(node.pressure)?;
        }
        rs[i] = value;
        bound = value;
    }

    let changed = nodes
        .iter()
        .zip(rs.iter().zip(&rv))
        .filter(|(n, (&s, &v))| n.rs != s || n.rv != v)
        .count();
    info!(
        eqlnum = region.eqlnum,
        goc_depth = goc.depth,
        changed,
        nodes = nodes.len(),
        "Depth trends corrected"
    );

    let depths: Vec<f64> = nodes.iter().map(|n| n.depth).collect();
    match region.trends {
        SaturationTrend::Ratio { .. } => Ok(SaturationTrend::Ratio {
            rsvd: DepthTrend::from_columns(&depths, &rs)?,
            rvvd: DepthTrend::from_columns(&depths, &rv)?,
        }),
        SaturationTrend::SaturationPressure { .. } => {
            let pbub = rs
                .iter()
                .map(|&r| engine.pbub_from_rs(r))
                .collect::<Result<Vec<_>>>()?;
            let pdew = rv
                .iter()
                .map(|&r| engine.pdew_from_rv(r))
                .collect::<Result<Vec<_>>>()?;
            Ok(SaturationTrend::SaturationPressure {
                pbvd: DepthTrend::from_columns(&depths, &pbub)?,
                pdvd: DepthTrend::from_columns(&depths, &pdew)?,
            })
        }
    }
}
