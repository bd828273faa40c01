//! Depth Integration Engine
//!
//! Builds the fluid state versus depth of one equilibrium region by marching
//! hydrostatically from the reference depth.
//!
//! - `compute_profile()` - two passes from the datum (up to the top, down to
//!   the bottom), merged into one profile ordered by increasing depth
//!
//! Each step is explicit first order in the current node's density:
//! `P(z + Δz) = P(z) + g · ρ(z) · Δz`. Steps snap exactly onto the GOC and OWC.

mod march;

use tracing::debug;

use crate::config::defaults::GRAVITY;
use crate::error::{EquilError, Result};
use crate::pvt::PvtEngine;
use crate::types::{
    Contacts, DepthNode, DepthProfile, EquilibriumRegion, Phase, SaturationTrend,
};
use march::Direction;

/// Compute the depth profile of `region` with `node_count` depth intervals
/// between structural top and bottom.
///
/// Deterministic: identical inputs give bit-identical nodes. Any PVT lookup
/// failure aborts the whole profile.
pub fn compute_profile(
    region: &EquilibriumRegion,
    engine: &PvtEngine,
    node_count: usize,
) -> Result<DepthProfile> {
    region.validate()?;
    if node_count == 0 {
        return Err(EquilError::InvalidArgument(
            "node count must be positive".to_string(),
        ));
    }
    if engine.pvtnum() != region.pvtnum {
        return Err(EquilError::config(format!(
            "EQLNUM {}: expects PVTNUM {}, engine holds PVTNUM {}",
            region.eqlnum,
            region.pvtnum,
            engine.pvtnum()
        )));
    }

    let contacts = region.contacts();
    #[allow(clippy::cast_precision_loss)]
    let delta = (contacts.bottom - contacts.top) / node_count as f64;
    let marcher = Marcher {
        region,
        engine,
        contacts,
        delta,
    };

    let datum = marcher.node(
        region.ref_depth,
        region.ref_pressure,
        Direction::Up.phase(region.ref_depth, &contacts),
    )?;
    let upward = marcher.pass(datum, Direction::Up)?;
    let downward = marcher.pass(datum, Direction::Down)?;

    let nodes: Vec<DepthNode> = upward
        .into_iter()
        .rev()
        .chain(downward.into_iter().skip(1))
        .collect();

    debug!(
        eqlnum = region.eqlnum,
        pvtnum = region.pvtnum,
        nodes = nodes.len(),
        delta,
        "Depth profile computed"
    );

    Ok(DepthProfile {
        eqlnum: region.eqlnum,
        pvtnum: region.pvtnum,
        nodes,
    })
}

struct Marcher<'a> {
    region: &'a EquilibriumRegion,
    engine: &'a PvtEngine,
    contacts: Contacts,
    delta: f64,
}

impl Marcher<'_> {
    /// Nodes from `start` (included) until the structural limit is reached.
    ///
    /// Fails when a step no longer moves the depth, or when the pass needs more
    /// steps than its distance over `delta` plus one snap per contact and the
    /// overshoot node.
    fn pass(&self, start: DepthNode, direction: Direction) -> Result<Vec<DepthNode>> {
        let distance = match direction {
            Direction::Up => start.depth - self.contacts.top,
            Direction::Down => self.contacts.bottom - start.depth,
        };
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let max_steps = (distance.max(0.0) / self.delta).ceil().min(usize::MAX as f64) as usize;
        let max_steps = max_steps.saturating_add(3);

        let mut nodes = vec![start];
        let mut current = start;
        while !direction.finished(current.depth, &self.contacts) {
            if nodes.len() > max_steps {
                return Err(EquilError::InvalidArgument(format!(
                    "EQLNUM {}: {direction:?} pass exceeded {max_steps} steps",
                    self.region.eqlnum
                )));
            }
            let depth = direction.next_depth(current.depth, self.delta, &self.contacts);
            if !direction.advances(current.depth, depth) {
                return Err(EquilError::InvalidArgument(format!(
                    "EQLNUM {}: depth step {:e} m does not move the march from {} m",
                    self.region.eqlnum, self.delta, current.depth
                )));
            }
            let pressure = current.pressure + GRAVITY * current.density() * (depth - current.depth);
            current = self.node(depth, pressure, direction.phase(depth, &self.contacts))?;
            nodes.push(current);
        }
        Ok(nodes)
    }

    /// Fluid state at one depth and pressure.
    fn node(&self, depth: f64, pressure: f64, phase: Phase) -> Result<DepthNode> {
        let engine = self.engine;

        // Trend targets, with the counterpart quantity derived from the tables.
        let (rs, rv, pbub, pdew, by_ratio) = match &self.region.trends {
            SaturationTrend::Ratio { rsvd, rvvd } => {
                let rs = rsvd.value_at(depth);
                let rv = rvvd.value_at(depth);
                (rs, rv, engine.pbub_from_rs(rs)?, engine.pdew_from_rv(rv)?, true)
            }
            SaturationTrend::SaturationPressure { pbvd, pdvd } => {
                let pbub = pbvd.value_at(depth);
                let pdew = pdvd.value_at(depth);
                (engine.rs_from_pbub(pbub)?, engine.rv_from_pdew(pdew)?, pbub, pdew, false)
            }
        };

        let oil = match (pbub < pressure, by_ratio) {
            (true, true) => engine.oil_state(pressure, Some(rs), None)?,
            (true, false) => engine.oil_state(pressure, None, Some(pbub))?,
            (false, _) => engine.oil_state(pressure, None, None)?,
        };
        let gas = match (pdew < pressure, by_ratio) {
            (true, true) => engine.gas_state(pressure, Some(rv), None)?,
            (true, false) => engine.gas_state(pressure, None, Some(pdew))?,
            (false, _) => engine.gas_state(pressure, None, None)?,
        };

        Ok(DepthNode {
            depth,
            phase,
            pressure,
            rs,
            rv,
            pbub,
            pdew,
            bo: oil.bo,
            viso: oil.viso,
            deno: oil.density,
            bg: gas.bg,
            visg: gas.visg,
            deng: gas.density,
            bw: engine.bw(pressure),
            visw: engine.visw(pressure),
            denw: engine.denw(pressure),
        })
    }
}
