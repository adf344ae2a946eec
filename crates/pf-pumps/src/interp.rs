//! Interpolation strategy trait for flow-dependent boundary relations.
//!
//! Pressure/flow-dependent boundaries (pump curves, non-ideal reference
//! nodes) all share one capability: given x, produce y. Concrete strategies
//! differ; the solver core dispatches through this trait instead of
//! special-casing each boundary type.

use crate::error::{PumpError, PumpResult};
use crate::spline::CubicSpline;

/// "Given x, produce y" with a known valid domain.
pub trait Interpolant: Send + Sync {
    /// Evaluate at x. Outside `domain`, the result is an extrapolation the
    /// caller should flag.
    fn value_at(&self, x: f64) -> f64;

    /// Valid (x_min, x_max) range.
    fn domain(&self) -> (f64, f64);

    fn in_domain(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }
}

/// Cubic-spline strategy.
#[derive(Debug, Clone)]
pub struct SplineInterpolant {
    spline: CubicSpline,
}

impl SplineInterpolant {
    pub fn new(points: &[(f64, f64)]) -> PumpResult<Self> {
        Ok(Self {
            spline: CubicSpline::new(points)?,
        })
    }
}

impl Interpolant for SplineInterpolant {
    fn value_at(&self, x: f64) -> f64 {
        self.spline.eval(x)
    }

    fn domain(&self) -> (f64, f64) {
        self.spline.domain()
    }
}

/// Piecewise-linear strategy.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    points: Vec<(f64, f64)>,
}

impl LinearInterpolant {
    pub fn new(points: &[(f64, f64)]) -> PumpResult<Self> {
        if points.len() < 2 {
            return Err(PumpError::InvalidCurve {
                what: format!("need at least 2 points, got {}", points.len()),
            });
        }
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(PumpError::InvalidCurve {
                    what: "x values must be strictly increasing".into(),
                });
            }
        }
        Ok(Self {
            points: points.to_vec(),
        })
    }
}

impl Interpolant for LinearInterpolant {
    fn value_at(&self, x: f64) -> f64 {
        let n = self.points.len();
        // End intervals also serve as the extrapolation slope.
        let mut i = 0;
        while i + 2 < n && x > self.points[i + 1].0 {
            i += 1;
        }
        let (x0, y0) = self.points[i];
        let (x1, y1) = self.points[i + 1];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    fn domain(&self) -> (f64, f64) {
        (self.points[0].0, self.points[self.points.len() - 1].0)
    }
}

/// Constant-value strategy (ideal fixed boundary).
#[derive(Debug, Clone, Copy)]
pub struct FixedValue(pub f64);

impl Interpolant for FixedValue {
    fn value_at(&self, _x: f64) -> f64 {
        self.0
    }

    fn domain(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}
