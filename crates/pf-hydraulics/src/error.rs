//! Error types for hydraulic calculations.

use thiserror::Error;

/// Errors that can occur during hydraulic calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicsError {
    /// A fitting has no override, no L/D entry, and no generic K entry.
    /// Never silently defaults to zero.
    #[error("No resolvable K-factor for fitting '{fitting}'")]
    MissingKFactor { fitting: String },

    #[error(
        "Colebrook iteration did not converge after {iterations} iterations \
         (Re={re}, eps/D={rel_roughness})"
    )]
    ColebrookNonConvergence {
        re: f64,
        rel_roughness: f64,
        iterations: usize,
    },

    #[error("Unknown pipe size: {nominal_in}\" {schedule}")]
    UnknownPipeSize {
        nominal_in: f64,
        schedule: &'static str,
    },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_k_factor_names_fitting() {
        let err = HydraulicsError::MissingKFactor {
            fitting: "venturi".into(),
        };
        assert!(err.to_string().contains("venturi"));
    }
}
