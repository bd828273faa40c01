//! Region/Field Aggregator
//!
//! Ties PVT regions to equilibrium regions and runs them as one field:
//!
//! - `Field::new()` - index every PVT region once and validate the regions
//! - `Field::check()` - profile and check each active region in parallel
//! - `Field::adjust()` - correct trends, recompute and recheck
//! - `Field::with_owc()` / `with_goc()` - contact what-ifs as new fields
//!
//! Regions are independent; each one produces its own report and a failure
//! in one never hides the others. Reports keep input order.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::config::EquilConfig;
use crate::consistency::{check_profile, correct_trends};
use crate::equilibrium::compute_profile;
use crate::error::{EquilError, Result};
use crate::input::FieldInput;
use crate::pvt::{ExtrapolationPolicy, PvtEngine};
use crate::types::{DepthProfile, EquilibriumRegion, FieldReport, PvtTableSet, RegionReport};

/// Tables and equilibrium regions of a field, ready to compute.
#[derive(Debug, Clone)]
pub struct Field {
    tables: Vec<PvtTableSet>,
    engines: BTreeMap<u32, Arc<PvtEngine>>,
    regions: Vec<EquilibriumRegion>,
}

/// Result of [`Field::adjust`].
#[derive(Debug, Clone)]
pub struct Adjustment {
    /// Field with corrected trends in every region that could be corrected
    pub field: Field,
    /// Report of the field as loaded
    pub before: FieldReport,
    /// Report of the corrected field
    pub after: FieldReport,
}

impl Field {
    /// Build engines for every PVT region and validate the active regions.
    pub fn new(input: FieldInput, policy: ExtrapolationPolicy) -> Result<Self> {
        let mut engines = BTreeMap::new();
        for tables in &input.pvt {
            let engine = PvtEngine::new(tables, policy)?;
            if engines.insert(tables.pvtnum, Arc::new(engine)).is_some() {
                return Err(EquilError::config(format!(
                    "PVTNUM {} defined more than once",
                    tables.pvtnum
                )));
            }
        }
        Self::assemble(input.pvt, engines, input.equil)
    }

    fn assemble(
        tables: Vec<PvtTableSet>,
        engines: BTreeMap<u32, Arc<PvtEngine>>,
        regions: Vec<EquilibriumRegion>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for region in &regions {
            if !seen.insert(region.eqlnum) {
                return Err(EquilError::config(format!(
                    "EQLNUM {} defined more than once",
                    region.eqlnum
                )));
            }
            if !region.active {
                continue;
            }
            region.validate()?;
            if !engines.contains_key(&region.pvtnum) {
                return Err(EquilError::config(format!(
                    "EQLNUM {}: no PVT tables for PVTNUM {}",
                    region.eqlnum, region.pvtnum
                )));
            }
        }
        Ok(Self {
            tables,
            engines,
            regions,
        })
    }

    /// Load from a field document using the configured extrapolation policy.
    pub fn from_input(input: FieldInput, config: &EquilConfig) -> Result<Self> {
        let field = Self::new(input, config.interpolation.extrapolation)?;
        info!(
            pvt_regions = field.engines.len(),
            active = field.active_regions().count(),
            inactive = field.inactive_regions().count(),
            "Field assembled"
        );
        Ok(field)
    }

    /// All equilibrium regions in input order.
    pub fn regions(&self) -> &[EquilibriumRegion] {
        &self.regions
    }

    pub fn region(&self, eqlnum: u32) -> Option<&EquilibriumRegion> {
        self.regions.iter().find(|r| r.eqlnum == eqlnum)
    }

    pub fn active_regions(&self) -> impl Iterator<Item = &EquilibriumRegion> {
        self.regions.iter().filter(|r| r.active)
    }

    pub fn inactive_regions(&self) -> impl Iterator<Item = &EquilibriumRegion> {
        self.regions.iter().filter(|r| !r.active)
    }

    pub fn engine(&self, pvtnum: u32) -> Option<&PvtEngine> {
        self.engines.get(&pvtnum).map(Arc::as_ref)
    }

    fn engine_for(&self, region: &EquilibriumRegion) -> Result<&PvtEngine> {
        self.engine(region.pvtnum).ok_or_else(|| {
            EquilError::config(format!(
                "EQLNUM {}: no PVT tables for PVTNUM {}",
                region.eqlnum, region.pvtnum
            ))
        })
    }

    /// Depth profile of one region.
    pub fn profile(&self, eqlnum: u32, node_count: usize) -> Result<DepthProfile> {
        let region = self
            .region(eqlnum)
            .ok_or_else(|| EquilError::config(format!("EQLNUM {eqlnum} not defined")))?;
        compute_profile(region, self.engine_for(region)?, node_count)
    }

    /// Depth profiles of all active regions, in input order.
    pub fn profiles(&self, node_count: usize) -> Vec<(u32, Result<DepthProfile>)> {
        self.active()
            .par_iter()
            .map(|region| {
                let profile = self
                    .engine_for(region)
                    .and_then(|engine| compute_profile(region, engine, node_count));
                (region.eqlnum, profile)
            })
            .collect()
    }

    /// Profile and check every active region.
    pub fn check(&self, config: &EquilConfig) -> FieldReport {
        let reports: Vec<RegionReport> = self
            .active()
            .par_iter()
            .map(|region| self.check_region(region, config))
            .collect();
        let report = FieldReport::new(reports, self.inactive_eqlnums());
        let totals = report.totals();
        info!(
            regions = report.regions.len(),
            failed = report.failed_regions().count(),
            fatals = totals.fatals,
            errors = totals.errors,
            warnings = totals.warnings,
            "Field check complete"
        );
        report
    }

    fn check_region(&self, region: &EquilibriumRegion, config: &EquilConfig) -> RegionReport {
        let profile = self
            .engine_for(region)
            .and_then(|engine| compute_profile(region, engine, config.integration.node_count));
        match profile {
            Ok(profile) => {
                let diagnostics =
                    check_profile(&profile, &region.contacts(), &config.consistency);
                RegionReport::checked(region.eqlnum, region.pvtnum, diagnostics)
            }
            Err(e) => {
                error!(eqlnum = region.eqlnum, pvtnum = region.pvtnum, error = %e, "Region profile failed");
                RegionReport::failed(region.eqlnum, region.pvtnum, e)
            }
        }
    }

    /// Correct the trends of every active region, then recheck.
    ///
    /// Regions whose profile or correction fails keep their original trends
    /// and show up as failed in the reports.
    pub fn adjust(&self, config: &EquilConfig) -> Result<Adjustment> {
        let before = self.check(config);
        let saturate_goc = config.correction.saturate_goc;
        let node_count = config.integration.node_count;

        let regions: Vec<EquilibriumRegion> = self
            .regions
            .par_iter()
            .map(|region| {
                if !region.active {
                    return region.clone();
                }
                let corrected = self.engine_for(region).and_then(|engine| {
                    let profile = compute_profile(region, engine, node_count)?;
                    correct_trends(&profile, region, engine, saturate_goc)
                });
                match corrected {
                    Ok(trends) => region.with_trends(trends),
                    Err(e) => {
                        warn!(eqlnum = region.eqlnum, error = %e, "Trends left uncorrected");
                        region.clone()
                    }
                }
            })
            .collect();

        let field = Self::assemble(self.tables.clone(), self.engines.clone(), regions)?;
        let after = field.check(config);
        Ok(Adjustment {
            field,
            before,
            after,
        })
    }

    /// Same field with the OWC of one region moved.
    pub fn with_owc(&self, eqlnum: u32, owc: f64) -> Result<Self> {
        self.with_region(eqlnum, |r| r.with_owc(owc))
    }

    /// Same field with the GOC of one region moved.
    pub fn with_goc(&self, eqlnum: u32, goc: f64) -> Result<Self> {
        self.with_region(eqlnum, |r| r.with_goc(goc))
    }

    fn with_region<F>(&self, eqlnum: u32, update: F) -> Result<Self>
    where
        F: Fn(&EquilibriumRegion) -> EquilibriumRegion,
    {
        if self.region(eqlnum).is_none() {
            return Err(EquilError::config(format!("EQLNUM {eqlnum} not defined")));
        }
        let regions = self
            .regions
            .iter()
            .map(|r| if r.eqlnum == eqlnum { update(r) } else { r.clone() })
            .collect();
        Self::assemble(self.tables.clone(), self.engines.clone(), regions)
    }

    /// Field document with the current regions, for writing back.
    pub fn to_input(&self) -> FieldInput {
        FieldInput {
            pvt: self.tables.clone(),
            equil: self.regions.clone(),
        }
    }

    fn active(&self) -> Vec<&EquilibriumRegion> {
        self.active_regions().collect()
    }

    fn inactive_eqlnums(&self) -> Vec<u32> {
        self.inactive_regions().map(|r| r.eqlnum).collect()
    }
}
