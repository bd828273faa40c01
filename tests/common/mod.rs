//! Shared field fixture: one PVT region whose tables reach 650 bar, and the
//! 3600-4500 m equilibrium region used across the integration tests.

#![allow(dead_code)]

use pvt_equil::types::{GasRow, OilRow, SurfaceDensities, WaterTrend};
use pvt_equil::{DepthTrend, EquilibriumRegion, FieldInput, PvtTableSet, SaturationTrend};

/// PVTO records: Rs, then (pressure, Bo, viscosity) with the bubble point first.
pub const PVTO: &[(f64, &[(f64, f64, f64)])] = &[
    (100.0, &[(200.0, 1.30, 0.90), (400.0, 1.28, 1.00), (650.0, 1.26, 1.10)]),
    (200.0, &[(300.0, 1.55, 0.60), (450.0, 1.53, 0.66), (650.0, 1.51, 0.72)]),
    (300.0, &[(420.0, 1.80, 0.40), (550.0, 1.78, 0.44), (650.0, 1.77, 0.47)]),
    (400.0, &[(560.0, 2.10, 0.30), (650.0, 2.09, 0.32)]),
];

/// PVTG records: pressure, then (Rv, Bg, viscosity) with the dew point Rv first.
pub const PVTG: &[(f64, &[(f64, f64, f64)])] = &[
    (200.0, &[(0.000050, 0.0060, 0.020), (0.0, 0.0061, 0.019)]),
    (300.0, &[(0.000100, 0.0042, 0.025), (0.0, 0.0043, 0.024)]),
    (400.0, &[(0.000150, 0.0034, 0.029), (0.000050, 0.00342, 0.0285), (0.0, 0.00345, 0.028)]),
    (500.0, &[(0.000200, 0.0029, 0.033), (0.0, 0.00295, 0.032)]),
    (650.0, &[(0.000250, 0.0025, 0.038), (0.0, 0.00255, 0.036)]),
];

pub fn pvt_tables(pvtnum: u32) -> PvtTableSet {
    PvtTableSet {
        pvtnum,
        densities: SurfaceDensities {
            oil: 850.0,
            gas: 0.9,
            water: 1030.0,
        },
        water: WaterTrend {
            p_ref: 400.0,
            bw_ref: 1.02,
            compressibility: 4.5e-5,
            visw_ref: 0.35,
            viscosibility: 0.0,
        },
        oil: PVTO
            .iter()
            .flat_map(|&(rs, rows)| {
                rows.iter().map(move |&(pressure, bo, viso)| OilRow {
                    rs,
                    pressure,
                    bo,
                    viso,
                })
            })
            .collect(),
        gas: PVTG
            .iter()
            .flat_map(|&(pressure, rows)| {
                rows.iter().map(move |&(rv, bg, visg)| GasRow {
                    pressure,
                    rv,
                    bg,
                    visg,
                })
            })
            .collect(),
    }
}

/// RSVD falling 300 -> 200 over [3675, 4500] m, RVVD rising with depth.
pub fn ratio_trends() -> SaturationTrend {
    SaturationTrend::Ratio {
        rsvd: DepthTrend::new([(3675.0, 300.0), (4500.0, 200.0)]),
        rvvd: DepthTrend::new([(3600.0, 0.00010), (4500.0, 0.00014)]),
    }
}

/// Top 3600, bottom 4500, GOC 4000, OWC 4400, datum 3950 m at 466 bar.
pub fn scenario_region(eqlnum: u32) -> EquilibriumRegion {
    EquilibriumRegion {
        eqlnum,
        pvtnum: 1,
        ref_depth: 3950.0,
        ref_pressure: 466.0,
        owc: 4400.0,
        goc: 4000.0,
        top: 3600.0,
        bottom: 4500.0,
        pcowc: 0.0,
        pcgoc: 0.0,
        initrs: None,
        initrv: None,
        accuracy: None,
        active: true,
        trends: ratio_trends(),
    }
}

/// Scenario region whose solution GOR is far above saturation at the GOC.
pub fn oversaturated_region(eqlnum: u32) -> EquilibriumRegion {
    scenario_region(eqlnum).with_trends(SaturationTrend::Ratio {
        rsvd: DepthTrend::new([(3600.0, 380.0), (4500.0, 380.0)]),
        rvvd: DepthTrend::new([(3600.0, 0.00010), (4500.0, 0.00014)]),
    })
}

pub fn field_input() -> FieldInput {
    FieldInput {
        pvt: vec![pvt_tables(1)],
        equil: vec![scenario_region(1)],
    }
}
