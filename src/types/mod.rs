//! Shared data structures for PVT-versus-depth equilibration
//!
//! - `tables`: measured PVT tables per PVT region (PVTO, PVTG, PVTW, DENSITY)
//! - `region`: equilibrium region descriptors and depth trend tables
//! - `profile`: computed depth profiles
//! - `report`: consistency diagnostics and per-region / field reports

mod tables;
mod region;
mod profile;
mod report;

pub use tables::*;
pub use region::*;
pub use profile::*;
pub use report::*;
