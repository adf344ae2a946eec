//! Saturated liquid water property table, 0–100°C.

use crate::error::{FluidError, FluidResult};

/// (T [°C], density [kg/m³], kinematic viscosity [m²/s], vapor pressure [Pa])
///
/// Standard handbook values at atmospheric pressure.
const WATER_TABLE: &[(f64, f64, f64, f64)] = &[
    (0.0, 999.8, 1.787e-6, 611.0),
    (5.0, 1000.0, 1.519e-6, 872.0),
    (10.0, 999.7, 1.307e-6, 1_228.0),
    (15.0, 999.1, 1.139e-6, 1_705.0),
    (20.0, 998.2, 1.004e-6, 2_339.0),
    (25.0, 997.0, 0.893e-6, 3_169.0),
    (30.0, 995.7, 0.801e-6, 4_246.0),
    (40.0, 992.2, 0.658e-6, 7_384.0),
    (50.0, 988.0, 0.553e-6, 12_349.0),
    (60.0, 983.2, 0.475e-6, 19_940.0),
    (70.0, 977.8, 0.413e-6, 31_190.0),
    (80.0, 971.8, 0.365e-6, 47_390.0),
    (90.0, 965.3, 0.326e-6, 70_140.0),
    (100.0, 958.4, 0.294e-6, 101_325.0),
];

pub const T_MIN_C: f64 = 0.0;
pub const T_MAX_C: f64 = 100.0;

/// Interpolated water properties at `t_c` °C.
///
/// Returns (density [kg/m³], kinematic viscosity [m²/s], vapor pressure [Pa]).
/// Out-of-range temperatures are an error, not an extrapolation.
pub fn properties_at(t_c: f64) -> FluidResult<(f64, f64, f64)> {
    if !t_c.is_finite() || t_c < T_MIN_C || t_c > T_MAX_C {
        return Err(FluidError::TemperatureOutOfRange {
            t_c,
            min_c: T_MIN_C,
            max_c: T_MAX_C,
        });
    }

    // Find the bracketing rows. The table is small; a linear scan is fine.
    let mut lo = &WATER_TABLE[0];
    let mut hi = &WATER_TABLE[WATER_TABLE.len() - 1];
    for pair in WATER_TABLE.windows(2) {
        if t_c >= pair[0].0 && t_c <= pair[1].0 {
            lo = &pair[0];
            hi = &pair[1];
            break;
        }
    }

    let span = hi.0 - lo.0;
    let w = if span > 0.0 { (t_c - lo.0) / span } else { 0.0 };

    let rho = lo.1 + w * (hi.1 - lo.1);
    let nu = lo.2 + w * (hi.2 - lo.2);
    let pv = lo.3 + w * (hi.3 - lo.3);

    Ok((rho, nu, pv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_at_table_rows() {
        let (rho, nu, pv) = properties_at(20.0).unwrap();
        assert_relative_eq!(rho, 998.2);
        assert_relative_eq!(nu, 1.004e-6);
        assert_relative_eq!(pv, 2_339.0);
    }

    #[test]
    fn interpolates_between_rows() {
        // Midway between 20°C and 25°C rows
        let (rho, _, _) = properties_at(22.5).unwrap();
        assert_relative_eq!(rho, (998.2 + 997.0) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            properties_at(-5.0),
            Err(FluidError::TemperatureOutOfRange { .. })
        ));
        assert!(matches!(
            properties_at(150.0),
            Err(FluidError::TemperatureOutOfRange { .. })
        ));
        assert!(properties_at(f64::NAN).is_err());
    }

    #[test]
    fn viscosity_decreases_with_temperature() {
        let (_, nu_cold, _) = properties_at(10.0).unwrap();
        let (_, nu_hot, _) = properties_at(80.0).unwrap();
        assert!(nu_cold > nu_hot);
    }
}
