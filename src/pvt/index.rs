//! Pre-indexed PVTO / PVTG tables
//!
//! Deck rows are grouped once per table key (Rs for oil, pressure for gas)
//! into sorted column arrays. Rows within a key keep their deck order.

use super::interp::strictly_increasing;
use crate::error::{EquilError, Result};
use crate::types::{GasRow, OilRow};

// ============================================================================
// Oil
// ============================================================================

/// Undersaturated branch of one Rs: ascending pressure, first entry saturated.
#[derive(Debug, Clone)]
pub(crate) struct OilBranch {
    pub pressure: Vec<f64>,
    pub bo: Vec<f64>,
    pub viso: Vec<f64>,
}

/// PVTO indexed by Rs.
#[derive(Debug, Clone)]
pub(crate) struct OilIndex {
    /// Distinct Rs, strictly increasing
    pub rs: Vec<f64>,
    /// Bubble point of each Rs, strictly increasing
    pub pbub: Vec<f64>,
    pub bo_sat: Vec<f64>,
    pub viso_sat: Vec<f64>,
    pub branches: Vec<OilBranch>,
}

impl OilIndex {
    pub fn build(pvtnum: u32, rows: &[OilRow]) -> Result<Self> {
        if rows.is_empty() {
            return Err(EquilError::config(format!("PVTNUM {pvtnum}: PVTO table is empty")));
        }

        let mut rs: Vec<f64> = Vec::new();
        let mut branches: Vec<OilBranch> = Vec::new();

        for row in rows {
            if ![row.rs, row.pressure, row.bo, row.viso].iter().all(|v| v.is_finite()) {
                return Err(EquilError::config(format!(
                    "PVTNUM {pvtnum}: PVTO row {:?} has non-finite values",
                    row
                )));
            }
            if row.bo <= 0.0 || row.viso <= 0.0 || row.pressure <= 0.0 {
                return Err(EquilError::config(format!(
                    "PVTNUM {pvtnum}: PVTO row at Rs {} has non-positive pressure, Bo or viscosity",
                    row.rs
                )));
            }
            match rs.last() {
                Some(&last) if row.rs == last => {
                    if let Some(branch) = branches.last_mut() {
                        branch.pressure.push(row.pressure);
                        branch.bo.push(row.bo);
                        branch.viso.push(row.viso);
                    }
                }
                Some(&last) if row.rs < last => {
                    return Err(EquilError::config(format!(
                        "PVTNUM {pvtnum}: PVTO Rs must be strictly increasing between records ({} after {})",
                        row.rs, last
                    )));
                }
                _ => {
                    rs.push(row.rs);
                    branches.push(OilBranch {
                        pressure: vec![row.pressure],
                        bo: vec![row.bo],
                        viso: vec![row.viso],
                    });
                }
            }
        }

        for (key, branch) in rs.iter().zip(&branches) {
            if !strictly_increasing(&branch.pressure) {
                return Err(EquilError::config(format!(
                    "PVTNUM {pvtnum}: PVTO pressures for Rs {key} must be strictly increasing"
                )));
            }
        }

        let pbub: Vec<f64> = branches.iter().map(|b| b.pressure[0]).collect();
        if !strictly_increasing(&pbub) {
            return Err(EquilError::config(format!(
                "PVTNUM {pvtnum}: PVTO bubble points must increase with Rs"
            )));
        }

        Ok(Self {
            bo_sat: branches.iter().map(|b| b.bo[0]).collect(),
            viso_sat: branches.iter().map(|b| b.viso[0]).collect(),
            rs,
            pbub,
            branches,
        })
    }
}

// ============================================================================
// Gas
// ============================================================================

/// Rv branch of one pressure, stored with ascending Rv. The last entry is the
/// saturated (dew point) Rv. Gas quantities are kept inverted, as they vary
/// closer to linearly that way.
#[derive(Debug, Clone)]
pub(crate) struct GasBranch {
    pub rv: Vec<f64>,
    /// 1 / Bg
    pub inv_bg: Vec<f64>,
    /// 1 / (Bg * Visg)
    pub inv_bgvisg: Vec<f64>,
}

/// PVTG indexed by pressure.
#[derive(Debug, Clone)]
pub(crate) struct GasIndex {
    /// Distinct pressures, strictly increasing
    pub pressure: Vec<f64>,
    /// Saturated Rv of each pressure, strictly increasing
    pub rv_sat: Vec<f64>,
    pub inv_bg_sat: Vec<f64>,
    pub inv_bgvisg_sat: Vec<f64>,
    pub branches: Vec<GasBranch>,
}

impl GasIndex {
    pub fn build(pvtnum: u32, rows: &[GasRow]) -> Result<Self> {
        if rows.is_empty() {
            return Err(EquilError::config(format!("PVTNUM {pvtnum}: PVTG table is empty")));
        }

        let mut pressure: Vec<f64> = Vec::new();
        // Deck order: saturated Rv first, then decreasing.
        let mut groups: Vec<Vec<GasRow>> = Vec::new();

        for row in rows {
            if ![row.pressure, row.rv, row.bg, row.visg].iter().all(|v| v.is_finite()) {
                return Err(EquilError::config(format!(
                    "PVTNUM {pvtnum}: PVTG row {:?} has non-finite values",
                    row
                )));
            }
            if row.bg <= 0.0 || row.visg <= 0.0 || row.rv < 0.0 {
                return Err(EquilError::config(format!(
                    "PVTNUM {pvtnum}: PVTG row at pressure {} has non-positive Bg/viscosity or negative Rv",
                    row.pressure
                )));
            }
            match pressure.last() {
                Some(&last) if row.pressure == last => {
                    if let Some(group) = groups.last_mut() {
                        group.push(*row);
                    }
                }
                Some(&last) if row.pressure < last => {
                    return Err(EquilError::config(format!(
                        "PVTNUM {pvtnum}: PVTG pressures must be strictly increasing between records ({} after {})",
                        row.pressure, last
                    )));
                }
                _ => {
                    pressure.push(row.pressure);
                    groups.push(vec![*row]);
                }
            }
        }

        let mut branches = Vec::with_capacity(groups.len());
        for (p, group) in pressure.iter().zip(&groups) {
            let rv: Vec<f64> = group.iter().rev().map(|r| r.rv).collect();
            if !strictly_increasing(&rv) {
                return Err(EquilError::config(format!(
                    "PVTNUM {pvtnum}: PVTG Rv at pressure {p} must decrease from the saturated value"
                )));
            }
            branches.push(GasBranch {
                rv,
                inv_bg: group.iter().rev().map(|r| 1.0 / r.bg).collect(),
                inv_bgvisg: group.iter().rev().map(|r| 1.0 / (r.bg * r.visg)).collect(),
            });
        }

        let rv_sat: Vec<f64> = groups.iter().map(|g| g[0].rv).collect();
        if !strictly_increasing(&rv_sat) {
            return Err(EquilError::config(format!(
                "PVTNUM {pvtnum}: PVTG saturated Rv must increase with pressure"
            )));
        }

        Ok(Self {
            inv_bg_sat: groups.iter().map(|g| 1.0 / g[0].bg).collect(),
            inv_bgvisg_sat: groups.iter().map(|g| 1.0 / (g[0].bg * g[0].visg)).collect(),
            pressure,
            rv_sat,
            branches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oil(rs: f64, p: f64, bo: f64, viso: f64) -> OilRow {
        OilRow { rs, pressure: p, bo, viso }
    }

    fn gas(p: f64, rv: f64, bg: f64, visg: f64) -> GasRow {
        GasRow { pressure: p, rv, bg, visg }
    }

    #[test]
    fn test_oil_grouping_keeps_deck_order() {
        let rows = [
            oil(50.0, 100.0, 1.2, 1.0),
            oil(50.0, 200.0, 1.18, 1.1),
            oil(100.0, 180.0, 1.3, 0.8),
            oil(100.0, 300.0, 1.27, 0.9),
        ];
        let index = OilIndex::build(1, &rows).unwrap();
        assert_eq!(index.rs, vec![50.0, 100.0]);
        assert_eq!(index.pbub, vec![100.0, 180.0]);
        assert_eq!(index.bo_sat, vec![1.2, 1.3]);
        assert_eq!(index.branches[1].pressure, vec![180.0, 300.0]);
    }

    #[test]
    fn test_oil_rejects_unsorted_rs() {
        let rows = [oil(100.0, 180.0, 1.3, 0.8), oil(50.0, 100.0, 1.2, 1.0)];
        assert!(matches!(
            OilIndex::build(1, &rows),
            Err(EquilError::Configuration(_))
        ));
    }

    #[test]
    fn test_oil_rejects_decreasing_branch_pressure() {
        let rows = [oil(50.0, 200.0, 1.2, 1.0), oil(50.0, 150.0, 1.21, 1.0)];
        assert!(OilIndex::build(1, &rows).is_err());
    }

    #[test]
    fn test_empty_tables_rejected() {
        assert!(OilIndex::build(3, &[]).is_err());
        assert!(GasIndex::build(3, &[]).is_err());
    }

    #[test]
    fn test_gas_branch_is_stored_ascending() {
        let rows = [
            gas(100.0, 0.0002, 0.010, 0.015),
            gas(100.0, 0.0, 0.0102, 0.014),
            gas(200.0, 0.0005, 0.005, 0.020),
            gas(200.0, 0.0001, 0.0051, 0.019),
        ];
        let index = GasIndex::build(1, &rows).unwrap();
        assert_eq!(index.pressure, vec![100.0, 200.0]);
        assert_eq!(index.rv_sat, vec![0.0002, 0.0005]);
        assert_eq!(index.branches[0].rv, vec![0.0, 0.0002]);
        assert_eq!(index.branches[0].inv_bg[1], 1.0 / 0.010);
        assert_eq!(index.inv_bg_sat[1], 1.0 / 0.005);
    }

    #[test]
    fn test_gas_rejects_increasing_branch_rv() {
        let rows = [gas(100.0, 0.0001, 0.010, 0.015), gas(100.0, 0.0002, 0.010, 0.015)];
        assert!(GasIndex::build(1, &rows).is_err());
    }
}
