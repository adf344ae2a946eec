//! Pump curves: head/efficiency/NPSHr interpolation, affinity scaling,
//! operating-point intersection, NPSH available, hydraulic/shaft power.

use crate::brent::brent;
use crate::error::{PumpError, PumpResult};
use crate::interp::Interpolant;
use crate::spline::CubicSpline;
use pf_core::units::constants::G0_MPS2;

/// One (flow, value) sample on a manufacturer curve, SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub flow_m3_s: f64,
    pub value: f64,
}

impl CurveSample {
    pub fn new(flow_m3_s: f64, value: f64) -> Self {
        Self { flow_m3_s, value }
    }
}

/// Interpolated value plus whether it came from outside the sampled range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveValue {
    pub value: f64,
    pub extrapolated: bool,
}

/// Converged pump operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingPoint {
    pub flow_m3_s: f64,
    pub head_m: f64,
    pub extrapolated: bool,
    pub efficiency_pct: Option<f64>,
    /// Hydraulic power rho*g*Q*H, W.
    pub hydraulic_power_w: f64,
    /// Shaft power, W. Present only when an efficiency curve exists.
    pub shaft_power_w: Option<f64>,
    pub npshr_m: Option<f64>,
}

/// A pump's head/capacity curve with optional efficiency and NPSHr curves.
///
/// All curves are spline-interpolated over strictly increasing flow. Values
/// interpolated beyond the sampled flow range are flagged, never rejected:
/// the solver may probe outside the range while iterating, and the final
/// state carries the flag as a warning.
#[derive(Debug, Clone)]
pub struct PumpCurve {
    head: CubicSpline,
    efficiency: Option<CubicSpline>,
    npshr: Option<CubicSpline>,
}

impl PumpCurve {
    pub fn new(
        head_points: &[CurveSample],
        efficiency_points: Option<&[CurveSample]>,
        npshr_points: Option<&[CurveSample]>,
    ) -> PumpResult<Self> {
        let head = Self::build_spline("head", head_points)?;
        let efficiency = efficiency_points
            .map(|pts| Self::build_spline("efficiency", pts))
            .transpose()?;
        let npshr = npshr_points
            .map(|pts| Self::build_spline("npshr", pts))
            .transpose()?;
        Ok(Self {
            head,
            efficiency,
            npshr,
        })
    }

    fn build_spline(what: &str, points: &[CurveSample]) -> PumpResult<CubicSpline> {
        if points.len() < 2 {
            return Err(PumpError::InvalidCurve {
                what: format!("{what} curve needs at least 2 points, got {}", points.len()),
            });
        }
        let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.flow_m3_s, p.value)).collect();
        CubicSpline::new(&pairs).map_err(|e| match e {
            PumpError::InvalidCurve { what: detail } => PumpError::InvalidCurve {
                what: format!("{what} curve: {detail}"),
            },
            other => other,
        })
    }

    /// Sampled flow range of the head curve at a given speed ratio.
    pub fn flow_domain(&self, speed_ratio: f64) -> (f64, f64) {
        let (lo, hi) = self.head.domain();
        (lo * speed_ratio, hi * speed_ratio)
    }

    /// Head at a flow, with affinity scaling for off-nominal speed.
    ///
    /// Affinity laws: Q scales with s, H with s². The curve is sampled at
    /// rated speed, so we evaluate at `flow / s` and scale the head by s².
    pub fn head_at(&self, flow_m3_s: f64, speed_ratio: f64) -> PumpResult<CurveValue> {
        if speed_ratio <= 0.0 || !speed_ratio.is_finite() {
            return Err(PumpError::NonPhysical {
                what: "speed ratio must be positive and finite",
            });
        }
        let q_rated = flow_m3_s / speed_ratio;
        let value = self.head.eval(q_rated) * speed_ratio * speed_ratio;
        Ok(CurveValue {
            value,
            extrapolated: !self.head.in_range(q_rated),
        })
    }

    /// Efficiency (percent) at a flow, if an efficiency curve exists.
    pub fn efficiency_at(&self, flow_m3_s: f64, speed_ratio: f64) -> Option<CurveValue> {
        let eff = self.efficiency.as_ref()?;
        let q_rated = flow_m3_s / speed_ratio;
        Some(CurveValue {
            value: eff.eval(q_rated),
            extrapolated: !eff.in_range(q_rated),
        })
    }

    /// Required NPSH at a flow, if an NPSHr curve exists. NPSHr scales
    /// with s² like head.
    pub fn npshr_at(&self, flow_m3_s: f64, speed_ratio: f64) -> Option<CurveValue> {
        let npshr = self.npshr.as_ref()?;
        let q_rated = flow_m3_s / speed_ratio;
        Some(CurveValue {
            value: npshr.eval(q_rated) * speed_ratio * speed_ratio,
            extrapolated: !npshr.in_range(q_rated),
        })
    }

    /// Intersect the pump curve with a system resistance curve over the
    /// sampled flow range. The system curve is any head-vs-flow relation;
    /// typically `h_static + r*Q²`.
    ///
    /// Scans the range for a sign change of `head_pump - head_system`, then
    /// refines with Brent. No sign change anywhere in range is
    /// `NoIntersection`.
    pub fn operating_point<S>(
        &self,
        system: &S,
        speed_ratio: f64,
        rho_kg_m3: f64,
    ) -> PumpResult<OperatingPoint>
    where
        S: Interpolant + ?Sized,
    {
        const SCAN_INTERVALS: usize = 64;

        let (q_lo, q_hi) = self.flow_domain(speed_ratio);
        let q_lo = q_lo.max(0.0);
        if q_hi <= q_lo {
            return Err(PumpError::InvalidCurve {
                what: "head curve flow range is empty".into(),
            });
        }

        let gap = |q: f64| -> PumpResult<f64> {
            Ok(self.head_at(q, speed_ratio)?.value - system.value_at(q))
        };

        let step = (q_hi - q_lo) / SCAN_INTERVALS as f64;
        let mut bracket = None;
        let mut prev_q = q_lo;
        let mut prev_g = gap(prev_q)?;
        for i in 1..=SCAN_INTERVALS {
            let q = q_lo + step * i as f64;
            let g = gap(q)?;
            if prev_g == 0.0 || prev_g * g < 0.0 {
                bracket = Some((prev_q, q));
                break;
            }
            prev_q = q;
            prev_g = g;
        }
        let (a, b) = bracket.ok_or(PumpError::NoIntersection {
            q_min: q_lo,
            q_max: q_hi,
        })?;

        let tol = (q_hi - q_lo) * 1e-10;
        let root = brent(|q| gap(q).unwrap_or(f64::NAN), a, b, tol)?;
        self.point_at(root.root, speed_ratio, rho_kg_m3)
    }

    /// Full operating-point record at a known flow (e.g. read from a
    /// converged network state).
    pub fn point_at(
        &self,
        flow_m3_s: f64,
        speed_ratio: f64,
        rho_kg_m3: f64,
    ) -> PumpResult<OperatingPoint> {
        let head = self.head_at(flow_m3_s, speed_ratio)?;
        let efficiency = self.efficiency_at(flow_m3_s, speed_ratio);
        let npshr = self.npshr_at(flow_m3_s, speed_ratio);

        let hydraulic_power_w = rho_kg_m3 * G0_MPS2 * flow_m3_s * head.value;
        let shaft_power_w = efficiency.as_ref().and_then(|e| {
            if e.value > 0.0 {
                Some(hydraulic_power_w / (e.value / 100.0))
            } else {
                None
            }
        });

        let extrapolated = head.extrapolated
            || efficiency.as_ref().is_some_and(|e| e.extrapolated)
            || npshr.as_ref().is_some_and(|n| n.extrapolated);

        Ok(OperatingPoint {
            flow_m3_s,
            head_m: head.value,
            extrapolated,
            efficiency_pct: efficiency.map(|e| e.value),
            hydraulic_power_w,
            shaft_power_w,
            npshr_m: npshr.map(|n| n.value),
        })
    }
}

/// Net positive suction head available at the pump inlet, in meters.
///
/// `p_suction_abs_pa` and `p_vapor_abs_pa` are absolute pressures; gauge
/// inputs must be converted by the caller. `h_static_m` is the elevation
/// head of the liquid surface above the pump centerline (negative for a
/// suction lift), `h_friction_m` the suction-line loss at the operating
/// flow.
pub fn npsh_available(
    p_suction_abs_pa: f64,
    p_vapor_abs_pa: f64,
    rho_kg_m3: f64,
    h_static_m: f64,
    h_friction_m: f64,
) -> PumpResult<f64> {
    if rho_kg_m3 <= 0.0 || !rho_kg_m3.is_finite() {
        return Err(PumpError::NonPhysical {
            what: "density must be positive and finite",
        });
    }
    Ok((p_suction_abs_pa - p_vapor_abs_pa) / (rho_kg_m3 * G0_MPS2) + h_static_m - h_friction_m)
}
