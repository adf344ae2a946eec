//! pf-pumps: pump curve engine for pipeflow.
//!
//! Contains:
//! - spline (natural cubic spline with tridiagonal solve)
//! - interp (interpolation strategy trait: spline, linear, fixed)
//! - brent (bracketing root finder)
//! - curve (pump curves: head/efficiency/NPSHr interpolation, affinity
//!   scaling, operating-point intersection, NPSH available, power)

pub mod brent;
pub mod curve;
pub mod error;
pub mod interp;
pub mod spline;

pub use brent::{brent, BrentResult};
pub use curve::{npsh_available, CurveSample, CurveValue, OperatingPoint, PumpCurve};
pub use error::{PumpError, PumpResult};
pub use interp::{FixedValue, Interpolant, LinearInterpolant, SplineInterpolant};
pub use spline::CubicSpline;
