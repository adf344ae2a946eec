//! pf-hydraulics: pipe-flow hydraulics for pipeflow.
//!
//! Contains:
//! - friction (Reynolds number + Darcy friction factor, Colebrook implicit)
//! - kfactor (minor-loss coefficient resolution for fittings)
//! - dimensions (pipe schedule and material roughness tables)
//! - pipe (Darcy-Weisbach head loss for a piping segment)

pub mod dimensions;
pub mod error;
pub mod friction;
pub mod kfactor;
pub mod pipe;

pub use dimensions::{inner_diameter, PipeMaterial, PipeSchedule};
pub use error::{HydraulicsError, HydraulicsResult};
pub use friction::{friction_factor, reynolds, FlowRegime, Friction};
pub use kfactor::{resolve_k, segment_minor_k, Fitting, FittingKind};
pub use pipe::{HeadLoss, PipeSegment};
