//! Consistency report types: diagnostics, per-region reports, field report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a consistency finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// One consistency finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Depth the finding refers to (m); the deeper node for pair checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, depth: Option<f64>, message: impl Into<String>) -> Self {
        Self {
            severity,
            depth,
            message: message.into(),
        }
    }
}

/// Number of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub warnings: usize,
    pub errors: usize,
    pub fatals: usize,
}

impl SeverityCounts {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        diagnostics.iter().fold(Self::default(), |mut c, d| {
            match d.severity {
                Severity::Warning => c.warnings += 1,
                Severity::Error => c.errors += 1,
                Severity::Fatal => c.fatals += 1,
            }
            c
        })
    }

    pub fn total(&self) -> usize {
        self.warnings + self.errors + self.fatals
    }

    fn merged(self, other: Self) -> Self {
        Self {
            warnings: self.warnings + other.warnings,
            errors: self.errors + other.errors,
            fatals: self.fatals + other.fatals,
        }
    }
}

/// Outcome of computing one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegionStatus {
    /// Profile computed and checked
    Checked,
    /// Profile could not be computed; no checks ran
    Failed { error: String },
}

/// Consistency report of one equilibrium region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub eqlnum: u32,
    pub pvtnum: u32,
    #[serde(flatten)]
    pub status: RegionStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl RegionReport {
    pub fn checked(eqlnum: u32, pvtnum: u32, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            eqlnum,
            pvtnum,
            status: RegionStatus::Checked,
            diagnostics,
        }
    }

    pub fn failed(eqlnum: u32, pvtnum: u32, error: impl std::fmt::Display) -> Self {
        Self {
            eqlnum,
            pvtnum,
            status: RegionStatus::Failed {
                error: error.to_string(),
            },
            diagnostics: Vec::new(),
        }
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_diagnostics(&self.diagnostics)
    }

    /// Computed, and free of FATAL findings.
    pub fn is_valid(&self) -> bool {
        self.status == RegionStatus::Checked && self.counts().fatals == 0
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.severity == severity)
    }
}

/// Merged report over all regions of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub generated_at: DateTime<Utc>,
    /// Active regions, in input order
    pub regions: Vec<RegionReport>,
    /// EQLNUMs carried through without computation
    pub inactive_regions: Vec<u32>,
}

impl FieldReport {
    pub fn new(regions: Vec<RegionReport>, inactive_regions: Vec<u32>) -> Self {
        Self {
            generated_at: Utc::now(),
            regions,
            inactive_regions,
        }
    }

    pub fn totals(&self) -> SeverityCounts {
        self.regions
            .iter()
            .fold(SeverityCounts::default(), |acc, r| acc.merged(r.counts()))
    }

    pub fn failed_regions(&self) -> impl Iterator<Item = &RegionReport> {
        self.regions
            .iter()
            .filter(|r| matches!(r.status, RegionStatus::Failed { .. }))
    }

    pub fn is_valid(&self) -> bool {
        self.regions.iter().all(RegionReport::is_valid)
    }

    pub fn region(&self, eqlnum: u32) -> Option<&RegionReport> {
        self.regions.iter().find(|r| r.eqlnum == eqlnum)
    }
}

impl std::fmt::Display for FieldReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = "*".repeat(59);
        writeln!(f, "{rule}")?;
        writeln!(f, "*****             PVT consistency report              ****")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{} active equil regions, {} inactive",
            self.regions.len(),
            self.inactive_regions.len()
        )?;
        for region in &self.regions {
            writeln!(f, "{rule}")?;
            writeln!(f, "EQUIL nr: {}  PVTNUM: {}", region.eqlnum, region.pvtnum)?;
            if let RegionStatus::Failed { error } = &region.status {
                writeln!(f, "FAILED: {error}")?;
                continue;
            }
            for severity in [Severity::Fatal, Severity::Error, Severity::Warning] {
                let found: Vec<&Diagnostic> = region.with_severity(severity).collect();
                writeln!(f, "{severity}S: {}", found.len())?;
                for d in found {
                    match d.depth {
                        Some(depth) => writeln!(f, "   {:>9.2} m  {}", depth, d.message)?,
                        None => writeln!(f, "   {}", d.message)?,
                    }
                }
            }
        }
        let totals = self.totals();
        writeln!(f, "{rule}")?;
        write!(
            f,
            "Total: {} fatal, {} error, {} warning",
            totals.fatals, totals.errors, totals.warnings
        )
    }
}
