//! Fluid specification and resolved property types.

use crate::error::{FluidError, FluidResult};
use pf_core::units::{Density, DynVisc, KinVisc, Pressure, Temperature};

/// Closed set of supported fluids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidKind {
    Water,
    EthyleneGlycol,
    PropyleneGlycol,
    Custom,
}

impl FluidKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluidKind::Water => "water",
            FluidKind::EthyleneGlycol => "ethylene glycol",
            FluidKind::PropyleneGlycol => "propylene glycol",
            FluidKind::Custom => "custom",
        }
    }

    /// Glycol mixtures need a concentration; pure fluids don't.
    pub fn requires_concentration(&self) -> bool {
        matches!(self, FluidKind::EthyleneGlycol | FluidKind::PropyleneGlycol)
    }
}

/// User-supplied properties for a custom fluid.
///
/// All three are required; a partially specified custom fluid is a
/// validation error in the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomProperties {
    pub density: Option<Density>,
    pub kinematic_viscosity: Option<KinVisc>,
    pub vapor_pressure: Option<Pressure>,
}

/// A fluid specification: the solver-facing input contract.
///
/// Immutable during a solve; supplied once per solve request.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidSpec {
    pub kind: FluidKind,
    pub temperature: Temperature,
    /// Glycol concentration in percent by volume. Required for glycols.
    pub concentration_pct: Option<f64>,
    /// Required when `kind` is `Custom`.
    pub custom: Option<CustomProperties>,
}

impl FluidSpec {
    /// Water at the given temperature.
    pub fn water(temperature: Temperature) -> Self {
        Self {
            kind: FluidKind::Water,
            temperature,
            concentration_pct: None,
            custom: None,
        }
    }

    /// A glycol mixture at the given temperature and percent concentration.
    pub fn glycol(kind: FluidKind, temperature: Temperature, concentration_pct: f64) -> Self {
        Self {
            kind,
            temperature,
            concentration_pct: Some(concentration_pct),
            custom: None,
        }
    }
}

/// Resolved fluid properties, SI units throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    /// Density [kg/m³]
    pub density: Density,
    /// Kinematic viscosity [m²/s]
    pub kinematic_viscosity: KinVisc,
    /// Dynamic viscosity [Pa·s]
    pub dynamic_viscosity: DynVisc,
    /// Vapor pressure, absolute [Pa]
    pub vapor_pressure: Pressure,
    /// Specific gravity relative to water at 4°C (1000 kg/m³)
    pub specific_gravity: f64,
}

/// Reference density for specific gravity [kg/m³]: water at 4°C.
pub(crate) const RHO_REF_KG_M3: f64 = 1000.0;

/// Validation helpers shared by the table backends.
pub(crate) mod validation {
    use super::*;

    pub fn validate_density(rho_kg_m3: f64) -> FluidResult<()> {
        if !rho_kg_m3.is_finite() || rho_kg_m3 <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_kinematic_viscosity(nu_m2_s: f64) -> FluidResult<()> {
        if !nu_m2_s.is_finite() || nu_m2_s <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "kinematic viscosity must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_vapor_pressure(pv_pa: f64) -> FluidResult<()> {
        if !pv_pa.is_finite() || pv_pa < 0.0 {
            return Err(FluidError::NonPhysical {
                what: "vapor pressure must be non-negative and finite",
            });
        }
        Ok(())
    }
}
