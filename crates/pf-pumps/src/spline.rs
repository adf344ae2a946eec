//! Natural cubic spline interpolation.

use crate::error::{PumpError, PumpResult};

/// Natural cubic spline through a set of (x, y) points.
///
/// Exact at every control point; second derivative zero at both ends.
/// Evaluation outside the knot range extrapolates linearly with the end
/// slope — callers that care (pump curves do) must check `in_range` and
/// flag the result.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots (natural: zero at both ends).
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build a spline. Requires >= 2 points with strictly increasing x.
    pub fn new(points: &[(f64, f64)]) -> PumpResult<Self> {
        if points.len() < 2 {
            return Err(PumpError::InvalidCurve {
                what: format!("need at least 2 points, got {}", points.len()),
            });
        }
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(PumpError::InvalidCurve {
                    what: format!(
                        "x values must be strictly increasing ({} then {})",
                        pair[0].0, pair[1].0
                    ),
                });
            }
        }
        for &(x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                return Err(PumpError::NonPhysical {
                    what: "spline points must be finite",
                });
            }
        }

        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let m = Self::second_derivatives(&xs, &ys);

        Ok(Self { xs, ys, m })
    }

    /// Solve the tridiagonal system for the natural-spline second
    /// derivatives (Thomas algorithm).
    fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
        let n = xs.len();
        let mut m = vec![0.0; n];
        if n == 2 {
            return m; // straight line
        }

        // Interior equations: h[i-1]*M[i-1] + 2(h[i-1]+h[i])*M[i] + h[i]*M[i+1] = rhs[i]
        let mut diag = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        let mut upper = vec![0.0; n];

        for i in 1..n - 1 {
            let h_lo = xs[i] - xs[i - 1];
            let h_hi = xs[i + 1] - xs[i];
            diag[i] = 2.0 * (h_lo + h_hi);
            upper[i] = h_hi;
            rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h_hi - (ys[i] - ys[i - 1]) / h_lo);
        }

        // Forward sweep (M[0] = M[n-1] = 0 are not unknowns).
        for i in 2..n - 1 {
            let h_lo = xs[i] - xs[i - 1];
            let w = h_lo / diag[i - 1];
            diag[i] -= w * upper[i - 1];
            rhs[i] -= w * rhs[i - 1];
        }

        // Back substitution.
        if n >= 3 {
            m[n - 2] = rhs[n - 2] / diag[n - 2];
            for i in (1..n - 2).rev() {
                m[i] = (rhs[i] - upper[i] * m[i + 1]) / diag[i];
            }
        }

        m
    }

    /// Knot domain (x_min, x_max).
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Whether x lies within the knot range (no extrapolation needed).
    pub fn in_range(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }

    /// Evaluate the spline. Outside the knot range, extrapolates linearly
    /// with the boundary slope.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();

        if x < self.xs[0] {
            return self.ys[0] + self.end_slope_low() * (x - self.xs[0]);
        }
        if x > self.xs[n - 1] {
            return self.ys[n - 1] + self.end_slope_high() * (x - self.xs[n - 1]);
        }

        // Binary search for the containing interval.
        let i = match self
            .xs
            .binary_search_by(|v| v.partial_cmp(&x).expect("finite knots"))
        {
            Ok(i) => i.min(n - 2),
            Err(i) => i.saturating_sub(1).min(n - 2),
        };

        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    fn end_slope_low(&self) -> f64 {
        let h = self.xs[1] - self.xs[0];
        (self.ys[1] - self.ys[0]) / h - h * self.m[1] / 6.0
    }

    fn end_slope_high(&self) -> f64 {
        let n = self.xs.len();
        let h = self.xs[n - 1] - self.xs[n - 2];
        (self.ys[n - 1] - self.ys[n - 2]) / h + h * self.m[n - 2] / 6.0
    }
}
