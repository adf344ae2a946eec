//! Error types for fluid property resolution.

use thiserror::Error;

/// Errors that can occur while resolving fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    #[error("Concentration is required for {kind} mixtures")]
    MissingConcentration { kind: &'static str },

    #[error("Concentration {value}% is outside the supported range {min}%..{max}%")]
    ConcentrationOutOfRange { value: f64, min: f64, max: f64 },

    #[error("Custom fluid is missing required property: {what}")]
    MissingCustomProperty { what: &'static str },

    #[error("Temperature {t_c}°C is outside the tabulated range {min_c}°C..{max_c}°C")]
    TemperatureOutOfRange { t_c: f64, min_c: f64, max_c: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type FluidResult<T> = Result<T, FluidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_kind() {
        let err = FluidError::MissingConcentration {
            kind: "ethylene glycol",
        };
        assert!(err.to_string().contains("ethylene glycol"));
    }
}
