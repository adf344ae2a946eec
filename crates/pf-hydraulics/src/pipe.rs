//! Darcy-Weisbach head loss for a piping segment.

use crate::error::HydraulicsResult;
use crate::friction::{friction_factor, reynolds, FlowRegime};
use crate::kfactor::{segment_minor_k, Fitting};
use pf_core::units::constants::G0_MPS2;

/// A hydraulic piping segment in SI units, ready for head-loss evaluation.
///
/// This is the solver-internal form; the boundary schema (material, nominal
/// size, schedule) is resolved into `diameter_m`/`roughness_m` before the
/// solve begins.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSegment {
    pub length_m: f64,
    pub diameter_m: f64,
    pub roughness_m: f64,
    pub fittings: Vec<Fitting>,
}

/// Head loss breakdown for one segment at one flow rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadLoss {
    /// Total head loss magnitude [m]
    pub total_m: f64,
    /// Friction (major) component [m]
    pub friction_m: f64,
    /// Minor (fitting) component [m]
    pub minor_m: f64,
    /// Mean velocity magnitude [m/s]
    pub velocity_m_s: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub regime: FlowRegime,
}

impl PipeSegment {
    pub fn new(length_m: f64, diameter_m: f64, roughness_m: f64, fittings: Vec<Fitting>) -> Self {
        Self {
            length_m,
            diameter_m,
            roughness_m,
            fittings,
        }
    }

    /// Flow area [m²].
    pub fn area_m2(&self) -> f64 {
        std::f64::consts::PI * self.diameter_m * self.diameter_m / 4.0
    }

    /// Mean velocity magnitude for a volumetric flow [m/s].
    pub fn velocity_m_s(&self, flow_m3_s: f64) -> f64 {
        flow_m3_s.abs() / self.area_m2()
    }

    /// Verify every fitting on this segment has a resolvable K-factor.
    ///
    /// Run before the solve with a nominal turbulent friction factor, so a
    /// missing table entry fails validation instead of surfacing mid-iteration
    /// (or never, on a zero-flow branch).
    pub fn check_fittings_resolvable(&self) -> HydraulicsResult<()> {
        const F_NOMINAL: f64 = 0.02;
        segment_minor_k(&self.fittings, F_NOMINAL)?;
        Ok(())
    }

    /// Head loss magnitude at a volumetric flow rate.
    ///
    /// `h = (f*L/D + sum K) * v^2 / 2g`, split into friction and minor
    /// parts. The caller applies the flow sign. Zero flow takes an explicit
    /// branch: no Reynolds number, no division.
    pub fn head_loss(&self, flow_m3_s: f64, kin_viscosity_m2_s: f64) -> HydraulicsResult<HeadLoss> {
        let v = self.velocity_m_s(flow_m3_s);
        let re = reynolds(v, self.diameter_m, kin_viscosity_m2_s);
        let friction = friction_factor(re, self.roughness_m / self.diameter_m)?;

        if friction.regime == FlowRegime::Still {
            return Ok(HeadLoss {
                total_m: 0.0,
                friction_m: 0.0,
                minor_m: 0.0,
                velocity_m_s: 0.0,
                reynolds: 0.0,
                friction_factor: 0.0,
                regime: FlowRegime::Still,
            });
        }

        let velocity_head = v * v / (2.0 * G0_MPS2);
        let h_friction = friction.factor * (self.length_m / self.diameter_m) * velocity_head;

        let k_total = segment_minor_k(&self.fittings, friction.factor)?;
        let h_minor = k_total * velocity_head;

        Ok(HeadLoss {
            total_m: h_friction + h_minor,
            friction_m: h_friction,
            minor_m: h_minor,
            velocity_m_s: v,
            reynolds: re,
            friction_factor: friction.factor,
            regime: friction.regime,
        })
    }
}
