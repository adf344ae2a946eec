//! pf-fluids: fluid property resolution for pipeflow.
//!
//! Given a fluid specification (kind + temperature, plus concentration for
//! glycol mixtures or explicit properties for custom fluids), resolves the
//! transport properties the hydraulic solver needs: density, kinematic and
//! dynamic viscosity, vapor pressure, and specific gravity, all in SI.
//!
//! Resolution is a pure function of the specification; there is no caching
//! or shared state.

pub mod error;
pub mod glycol;
pub mod properties;
pub mod resolver;
pub mod water;

pub use error::{FluidError, FluidResult};
pub use properties::{CustomProperties, FluidKind, FluidProperties, FluidSpec};
pub use resolver::resolve;
