//! Error types for pump curve operations.

use thiserror::Error;

/// Errors from pump curve validation and root finding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PumpError {
    /// Fewer than 2 points, or flow values not strictly increasing.
    #[error("Invalid pump curve: {what}")]
    InvalidCurve { what: String },

    /// The pump and system curves have no sign change over the search
    /// range: there is no operating point to report.
    #[error("No pump/system intersection in flow range {q_min}..{q_max} m³/s")]
    NoIntersection { q_min: f64, q_max: f64 },

    #[error("Root finder did not converge after {iterations} iterations")]
    RootNonConvergence { iterations: usize },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type PumpResult<T> = Result<T, PumpError>;
