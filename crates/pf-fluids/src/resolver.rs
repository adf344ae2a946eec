//! Top-level fluid property resolution.

use crate::error::{FluidError, FluidResult};
use crate::glycol::{self, GlycolFamily};
use crate::properties::{validation, FluidKind, FluidProperties, FluidSpec, RHO_REF_KG_M3};
use crate::water;
use pf_core::units::{kgpm3, m2ps, pa, pas};

/// Resolve a fluid specification into SI transport properties.
///
/// Pure function of its input: the same spec always yields the same
/// properties. Missing glycol concentration and incomplete custom fluids
/// are validation errors, never silent defaults.
pub fn resolve(spec: &FluidSpec) -> FluidResult<FluidProperties> {
    use uom::si::thermodynamic_temperature::degree_celsius;
    let t_c = spec.temperature.get::<degree_celsius>();

    let (rho, nu, pv) = match spec.kind {
        FluidKind::Water => water::properties_at(t_c)?,
        FluidKind::EthyleneGlycol | FluidKind::PropyleneGlycol => {
            let conc = spec
                .concentration_pct
                .ok_or(FluidError::MissingConcentration {
                    kind: spec.kind.as_str(),
                })?;
            let family = if spec.kind == FluidKind::EthyleneGlycol {
                GlycolFamily::Ethylene
            } else {
                GlycolFamily::Propylene
            };
            glycol::properties_at(family, conc, t_c)?
        }
        FluidKind::Custom => {
            let custom = spec.custom.ok_or(FluidError::MissingCustomProperty {
                what: "custom property block",
            })?;
            let rho = custom
                .density
                .ok_or(FluidError::MissingCustomProperty { what: "density" })?;
            let nu = custom
                .kinematic_viscosity
                .ok_or(FluidError::MissingCustomProperty {
                    what: "kinematic viscosity",
                })?;
            let pv = custom
                .vapor_pressure
                .ok_or(FluidError::MissingCustomProperty {
                    what: "vapor pressure",
                })?;
            (rho.value, nu.value, pv.value)
        }
    };

    validation::validate_density(rho)?;
    validation::validate_kinematic_viscosity(nu)?;
    validation::validate_vapor_pressure(pv)?;

    Ok(FluidProperties {
        density: kgpm3(rho),
        kinematic_viscosity: m2ps(nu),
        dynamic_viscosity: pas(nu * rho),
        vapor_pressure: pa(pv),
        specific_gravity: rho / RHO_REF_KG_M3,
    })
}
