//! Reynolds number and Darcy friction factor.
//!
//! Laminar flow uses the closed-form `f = 64/Re`. Turbulent flow solves the
//! implicit Colebrook equation by fixed-point iteration on `1/sqrt(f)`,
//! seeded with the explicit Swamee-Jain approximation. The transitional
//! band (2300 <= Re <= 4000) blends linearly in Re between the laminar
//! value at 2300 and the Colebrook value at 4000, which keeps the friction
//! factor continuous at both regime boundaries.

use crate::error::{HydraulicsError, HydraulicsResult};
use serde::{Deserialize, Serialize};

/// Upper Reynolds bound of the laminar regime.
pub const RE_LAMINAR_MAX: f64 = 2300.0;

/// Lower Reynolds bound of the fully turbulent regime.
pub const RE_TURBULENT_MIN: f64 = 4000.0;

/// Below this Reynolds number the link is treated as carrying no flow.
pub const RE_STILL: f64 = 1e-8;

const COLEBROOK_MAX_ITER: usize = 50;
const COLEBROOK_TOL: f64 = 1e-10;

/// Flow regime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    /// No flow: friction factor undefined, head loss is zero by branch,
    /// never by division.
    Still,
    Laminar,
    Transitional,
    Turbulent,
}

impl FlowRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowRegime::Still => "still",
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
        }
    }
}

/// Result of a friction-factor evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Friction {
    pub reynolds: f64,
    /// Darcy friction factor. Zero when the regime is `Still`.
    pub factor: f64,
    pub regime: FlowRegime,
}

/// Reynolds number `Re = v * D / nu`.
pub fn reynolds(velocity_m_s: f64, diameter_m: f64, kin_viscosity_m2_s: f64) -> f64 {
    velocity_m_s.abs() * diameter_m / kin_viscosity_m2_s
}

/// Solve the Colebrook equation for the Darcy friction factor.
///
/// `1/sqrt(f) = -2 log10(eps/(3.7 D) + 2.51/(Re sqrt(f)))`
///
/// Fixed-point iteration on `x = 1/sqrt(f)` with a bounded iteration count;
/// exceeding the cap is an explicit error, never an unbounded loop.
pub fn colebrook(re: f64, rel_roughness: f64) -> HydraulicsResult<f64> {
    if re <= 0.0 || !re.is_finite() {
        return Err(HydraulicsError::NonPhysical {
            what: "Reynolds number must be positive and finite",
        });
    }
    if rel_roughness < 0.0 || !rel_roughness.is_finite() {
        return Err(HydraulicsError::NonPhysical {
            what: "relative roughness must be non-negative and finite",
        });
    }

    // Swamee-Jain explicit approximation as the starting iterate.
    let seed = 0.25 / (rel_roughness / 3.7 + 5.74 / re.powf(0.9)).log10().powi(2);
    let mut x = 1.0 / seed.sqrt();

    for _ in 0..COLEBROOK_MAX_ITER {
        let x_next = -2.0 * (rel_roughness / 3.7 + 2.51 * x / re).log10();
        if (x_next - x).abs() < COLEBROOK_TOL * x_next.abs().max(1.0) {
            return Ok(1.0 / (x_next * x_next));
        }
        x = x_next;
    }

    Err(HydraulicsError::ColebrookNonConvergence {
        re,
        rel_roughness,
        iterations: COLEBROOK_MAX_ITER,
    })
}

/// Classify the regime and compute the Darcy friction factor.
pub fn friction_factor(re: f64, rel_roughness: f64) -> HydraulicsResult<Friction> {
    if re < RE_STILL {
        return Ok(Friction {
            reynolds: re,
            factor: 0.0,
            regime: FlowRegime::Still,
        });
    }

    if re < RE_LAMINAR_MAX {
        return Ok(Friction {
            reynolds: re,
            factor: 64.0 / re,
            regime: FlowRegime::Laminar,
        });
    }

    if re <= RE_TURBULENT_MIN {
        let f_lam = 64.0 / RE_LAMINAR_MAX;
        let f_turb = colebrook(RE_TURBULENT_MIN, rel_roughness)?;
        let w = (re - RE_LAMINAR_MAX) / (RE_TURBULENT_MIN - RE_LAMINAR_MAX);
        return Ok(Friction {
            reynolds: re,
            factor: f_lam + w * (f_turb - f_lam),
            regime: FlowRegime::Transitional,
        });
    }

    Ok(Friction {
        reynolds: re,
        factor: colebrook(re, rel_roughness)?,
        regime: FlowRegime::Turbulent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn laminar_closed_form_ignores_roughness() {
        for re in [100.0, 500.0, 1500.0, 2299.0] {
            let smooth = friction_factor(re, 0.0).unwrap();
            let rough = friction_factor(re, 0.01).unwrap();
            assert_eq!(smooth.regime, FlowRegime::Laminar);
            assert_relative_eq!(smooth.factor, 64.0 / re);
            assert_relative_eq!(rough.factor, 64.0 / re);
        }
    }

    #[test]
    fn still_branch_for_zero_flow() {
        let f = friction_factor(0.0, 1e-4).unwrap();
        assert_eq!(f.regime, FlowRegime::Still);
        assert_eq!(f.factor, 0.0);
    }

    #[test]
    fn colebrook_known_point() {
        // Re = 78243, eps/D = 4.4006e-4: hand-iterated value 0.020802
        let f = colebrook(78_243.0, 4.4006e-4).unwrap();
        assert_relative_eq!(f, 0.020802, epsilon = 1e-5);
    }

    #[test]
    fn transitional_continuous_at_boundaries() {
        let rr = 1e-4;
        let at_2300 = friction_factor(2300.0 - 1e-9, rr).unwrap().factor;
        let just_above = friction_factor(2300.0 + 1e-6, rr).unwrap().factor;
        assert_relative_eq!(at_2300, just_above, epsilon = 1e-6);

        let at_4000 = friction_factor(4000.0, rr).unwrap().factor;
        let turb_4000 = colebrook(4000.0, rr).unwrap();
        assert_relative_eq!(at_4000, turb_4000, epsilon = 1e-9);
    }

    #[test]
    fn transitional_regime_reported() {
        let f = friction_factor(3000.0, 1e-4).unwrap();
        assert_eq!(f.regime, FlowRegime::Transitional);
    }

    #[test]
    fn reynolds_uses_flow_magnitude() {
        let re_fwd = reynolds(1.5, 0.1, 1e-6);
        let re_rev = reynolds(-1.5, 0.1, 1e-6);
        assert_relative_eq!(re_fwd, re_rev);
        assert_relative_eq!(re_fwd, 150_000.0);
    }

    proptest! {
        /// Colebrook residual property: the returned f satisfies the
        /// implicit equation to within tolerance over the full physically
        /// reasonable range.
        #[test]
        fn colebrook_satisfies_implicit_equation(
            re in 4.0e3..1.0e8_f64,
            rr in 1.0e-6..0.05_f64,
        ) {
            let f = colebrook(re, rr).unwrap();
            let residual = 1.0 / f.sqrt()
                + 2.0 * (rr / 3.7 + 2.51 / (re * f.sqrt())).log10();
            prop_assert!(residual.abs() < 1e-6, "residual = {residual}");
        }

        #[test]
        fn friction_factor_positive_and_bounded(
            re in 1.0..1.0e8_f64,
            rr in 0.0..0.05_f64,
        ) {
            let f = friction_factor(re, rr).unwrap();
            prop_assert!(f.factor > 0.0);
            prop_assert!(f.factor < 1.0e2);
        }
    }
}
