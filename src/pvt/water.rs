//! Analytic water correlation (PVTW)
//!
//! Second-order expansion of exponential compressibility around the
//! reference pressure. Valid at any pressure; there is no table domain.

use crate::error::{EquilError, Result};
use crate::types::WaterTrend;

/// Water formation volume factor.
///
/// Formula: Bw = Bw_ref / (1 + x + x²/2), x = Cw × (P − P_ref)
pub fn bw(water: &WaterTrend, pressure: f64) -> f64 {
    let x = water.compressibility * (pressure - water.p_ref);
    water.bw_ref / (1.0 + x + x * x / 2.0)
}

/// Water viscosity.
///
/// Formula: Bw·μw = Bw_ref·μw_ref / (1 + y + y²/2), y = (Cw − Cv) × (P − P_ref),
/// then μw = (Bw·μw) / Bw(P).
pub fn visw(water: &WaterTrend, pressure: f64) -> f64 {
    let y = (water.compressibility - water.viscosibility) * (pressure - water.p_ref);
    let bw_visw = water.bw_ref * water.visw_ref / (1.0 + y + y * y / 2.0);
    bw_visw / bw(water, pressure)
}

/// Reservoir water density from surface density (kg/m3).
pub fn denw(water: &WaterTrend, surface_density: f64, pressure: f64) -> f64 {
    surface_density / bw(water, pressure)
}

/// Reject correlation rows that cannot produce physical values.
pub(crate) fn validate(pvtnum: u32, water: &WaterTrend) -> Result<()> {
    let values = [
        water.p_ref,
        water.bw_ref,
        water.compressibility,
        water.visw_ref,
        water.viscosibility,
    ];
    if !values.iter().all(|v| v.is_finite()) {
        return Err(EquilError::config(format!(
            "PVTNUM {pvtnum}: PVTW has non-finite values"
        )));
    }
    if water.bw_ref <= 0.0 || water.visw_ref <= 0.0 {
        return Err(EquilError::config(format!(
            "PVTNUM {pvtnum}: PVTW reference Bw and viscosity must be positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pvtw() -> WaterTrend {
        WaterTrend {
            p_ref: 392.5,
            bw_ref: 1.01712,
            compressibility: 0.42190e-4,
            visw_ref: 0.31,
            viscosibility: 0.0,
        }
    }

    #[test]
    fn test_bw_at_reference_pressure_is_exact() {
        assert_eq!(bw(&pvtw(), 392.5), 1.01712);
    }

    #[test]
    fn test_bw_expansion() {
        let w = pvtw();
        let x = w.compressibility * (400.0 - w.p_ref);
        let expected = w.bw_ref / (1.0 + x + 0.5 * x * x);
        assert!((bw(&w, 400.0) - expected).abs() < 1e-14);
        assert!(bw(&w, 400.0) < w.bw_ref);
    }

    #[test]
    fn test_visw_reference_and_zero_viscosibility() {
        let w = pvtw();
        assert!((visw(&w, w.p_ref) - w.visw_ref).abs() < 1e-14);
        // Cv = 0: Bw·μw shrinks exactly like Bw, so μw stays at reference.
        assert!((visw(&w, 500.0) - w.visw_ref).abs() < 1e-12);
    }

    #[test]
    fn test_denw() {
        let w = pvtw();
        assert!((denw(&w, 999.1, 400.0) - 999.1 / bw(&w, 400.0)).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_zero_bw() {
        let mut w = pvtw();
        w.bw_ref = 0.0;
        assert!(validate(1, &w).is_err());
        assert!(validate(1, &pvtw()).is_ok());
    }
}
