//! Consistency Checking and Table Correction
//!
//! ## Checker
//! - `check_profile()` - WARNING / ERROR / FATAL findings for one profile
//!
//! ## Corrector
//! - `correct_trends()` - monotone, never-oversaturated replacement trends
//!
//! Findings are data: they are collected into a
//! [`RegionReport`](crate::types::RegionReport), never raised as errors.

mod checker;
mod corrector;

pub use checker::check_profile;
pub use corrector::correct_trends;
