//! Error types for solver operations.
//!
//! Only pre-iteration failures surface as `SolverError`. Once Newton
//! starts, non-convergence is reported through the solved state, not here.

use pf_fluids::FluidError;
use pf_hydraulics::HydraulicsError;
use pf_model::ValidationError;
use pf_pumps::PumpError;
use thiserror::Error;

/// Errors that can occur while setting up a network solve.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Topology error: {what}")]
    Topology { what: String },

    #[error("No fixed-grade boundary reachable from component {component_id}")]
    NoBoundary { component_id: String },

    #[error("Boundary {component_id} is at or below its minimum level")]
    EmptyBoundary { component_id: String },

    #[error("Model error: {0}")]
    Model(#[from] ValidationError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Hydraulics error: {0}")]
    Hydraulics(#[from] HydraulicsError),

    #[error("Pump curve error: {0}")]
    Pump(#[from] PumpError),

    #[error("Graph error: {0}")]
    Graph(#[from] pf_core::PfError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub fn topology(what: impl Into<String>) -> Self {
        SolverError::Topology { what: what.into() }
    }
}
