//! Brent's method: bracketing root finder.

use crate::error::{PumpError, PumpResult};

const DEFAULT_MAX_ITER: usize = 100;

/// Result of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrentResult {
    pub root: f64,
    pub f_root: f64,
    pub iterations: usize,
}

/// Find a root of `f` in `[a, b]` using Brent's method.
///
/// Requires f(a) and f(b) to have opposite signs; a missing sign change is
/// `NoIntersection`, never a spurious root. Bounded iteration count; the
/// cap is an explicit `RootNonConvergence` error.
pub fn brent<F>(f: F, a: f64, b: f64, tol: f64) -> PumpResult<BrentResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(BrentResult {
            root: a,
            f_root: 0.0,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(BrentResult {
            root: b,
            f_root: 0.0,
            iterations: 0,
        });
    }
    if fa * fb > 0.0 {
        return Err(PumpError::NoIntersection { q_min: a, q_max: b });
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = b - a;

    for iter in 1..=DEFAULT_MAX_ITER {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);

        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(BrentResult {
                root: b,
                f_root: fb,
                iterations: iter,
            });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Attempt inverse quadratic interpolation (secant when a == c).
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                // Interpolation accepted
                e = d;
                d = p / q;
            } else {
                // Fall back to bisection
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b);
    }

    Err(PumpError::RootNonConvergence {
        iterations: DEFAULT_MAX_ITER,
    })
}
