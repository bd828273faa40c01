//! Error types shared by the PVT engine, depth integration and field runs.
//!
//! Consistency findings are not errors: they are accumulated as
//! [`Diagnostic`](crate::types::Diagnostic) records in a region report.

use thiserror::Error;

/// Failure of a table lookup, a depth march or a region load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquilError {
    /// Malformed or missing tables / region metadata. Fatal at load.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Interpolation argument outside the table domain.
    #[error("{quantity} of {value:.6e} outside PVT table interval [{min:.6e}, {max:.6e}]")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Conflicting or non-finite arguments to a single call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The supplied ratio implies a saturation point above the supplied pressure.
    #[error("{ratio} gives saturation pressure {saturation_pressure:.3} bar above pressure {pressure:.3} bar")]
    InconsistentInput {
        ratio: &'static str,
        saturation_pressure: f64,
        pressure: f64,
    },
}

impl EquilError {
    /// Shorthand for a configuration error built from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True for errors that stem from a table domain violation.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EquilError>;
