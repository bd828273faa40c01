//! Run Settings Module
//!
//! Operator-tunable settings loaded from TOML: march resolution, the PVT
//! table extrapolation policy, checker tolerances and corrector behaviour.
//!
//! ## Loading Order
//!
//! 1. `PVT_EQUIL_CONFIG` environment variable (path to TOML file)
//! 2. `pvt_equil.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Settings are passed explicitly to [`Field`](crate::field::Field) and the
//! check / correct functions; there is no global instance.

mod settings;
pub mod defaults;
pub mod validation;

pub use settings::*;
