//! pf-model: project schema, unit normalization, and validation.
//!
//! The schema is the serde boundary of the workspace: callers hand a
//! `Project` (parsed from JSON or built in code) to `pf-solver`. Projects
//! authored in US-customary units are normalized to SI by `convert::to_si`
//! before the solver sees them.

pub mod convert;
pub mod schema;
pub mod validate;

pub use convert::to_si;
pub use schema::*;
pub use validate::{validate_project, ValidationError};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse, normalize to SI, and validate a project from JSON text.
pub fn from_json(text: &str) -> ModelResult<Project> {
    let project: Project = serde_json::from_str(text)?;
    let project = to_si(project);
    validate_project(&project)?;
    Ok(project)
}

/// Validate and serialize a project to pretty JSON text.
pub fn to_json(project: &Project) -> ModelResult<String> {
    validate_project(project)?;
    Ok(serde_json::to_string_pretty(project)?)
}

impl FluidDef {
    /// SI-unit fluid spec for the property resolver. Call after `to_si`.
    pub fn to_spec(&self) -> pf_fluids::FluidSpec {
        use pf_core::units::celsius;
        use pf_core::units::{kgpm3, m2ps, pa};

        let kind = match self.kind {
            FluidKindDef::Water => pf_fluids::FluidKind::Water,
            FluidKindDef::EthyleneGlycol => pf_fluids::FluidKind::EthyleneGlycol,
            FluidKindDef::PropyleneGlycol => pf_fluids::FluidKind::PropyleneGlycol,
            FluidKindDef::Custom => pf_fluids::FluidKind::Custom,
        };
        pf_fluids::FluidSpec {
            kind,
            temperature: celsius(self.temperature),
            concentration_pct: self.concentration,
            custom: self.custom.map(|c| pf_fluids::CustomProperties {
                density: c.density.map(kgpm3),
                kinematic_viscosity: c.kinematic_viscosity.map(m2ps),
                vapor_pressure: c.vapor_pressure.map(pa),
            }),
        }
    }
}

impl FittingDef {
    pub fn to_fitting(&self) -> pf_hydraulics::Fitting {
        match self.k_factor_override {
            Some(k) => pf_hydraulics::Fitting::with_override(self.kind.clone(), self.quantity, k),
            None => pf_hydraulics::Fitting::new(self.kind.clone(), self.quantity),
        }
    }
}
