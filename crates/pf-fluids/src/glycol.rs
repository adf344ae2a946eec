//! Aqueous glycol mixture property grids.
//!
//! Bilinear interpolation over (concentration % by volume, temperature °C)
//! grids. Vapor pressure follows the water curve scaled by the water
//! fraction, which is conservative for cavitation checks.

use crate::error::{FluidError, FluidResult};
use crate::water;

pub const CONC_MIN_PCT: f64 = 0.0;
pub const CONC_MAX_PCT: f64 = 60.0;
pub const T_MIN_C: f64 = 0.0;
pub const T_MAX_C: f64 = 100.0;

/// Grid axes shared by both glycols.
const CONC_AXIS: &[f64] = &[0.0, 20.0, 40.0, 60.0];
const TEMP_AXIS: &[f64] = &[0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

/// Density [kg/m³], rows = concentration, cols = temperature.
const EG_DENSITY: &[[f64; 6]; 4] = &[
    [999.8, 998.2, 992.2, 983.2, 971.8, 958.4],
    [1031.0, 1026.0, 1018.0, 1008.0, 996.0, 983.0],
    [1058.0, 1052.0, 1043.0, 1032.0, 1019.0, 1005.0],
    [1084.0, 1077.0, 1067.0, 1055.0, 1041.0, 1026.0],
];

/// Kinematic viscosity [m²/s × 1e-6].
const EG_KIN_VISC: &[[f64; 6]; 4] = &[
    [1.787, 1.004, 0.658, 0.475, 0.365, 0.294],
    [3.90, 1.93, 1.17, 0.80, 0.60, 0.48],
    [9.10, 3.60, 1.93, 1.22, 0.86, 0.66],
    [25.0, 7.20, 3.35, 1.92, 1.26, 0.91],
];

const PG_DENSITY: &[[f64; 6]; 4] = &[
    [999.8, 998.2, 992.2, 983.2, 971.8, 958.4],
    [1019.0, 1014.0, 1005.0, 995.0, 983.0, 970.0],
    [1037.0, 1030.0, 1020.0, 1008.0, 994.0, 980.0],
    [1050.0, 1041.0, 1029.0, 1016.0, 1001.0, 986.0],
];

const PG_KIN_VISC: &[[f64; 6]; 4] = &[
    [1.787, 1.004, 0.658, 0.475, 0.365, 0.294],
    [5.20, 2.30, 1.30, 0.86, 0.63, 0.50],
    [17.0, 5.60, 2.60, 1.50, 1.00, 0.74],
    [72.0, 15.5, 5.80, 2.90, 1.75, 1.20],
];

/// Which glycol family a grid lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlycolFamily {
    Ethylene,
    Propylene,
}

impl GlycolFamily {
    fn tables(self) -> (&'static [[f64; 6]; 4], &'static [[f64; 6]; 4]) {
        match self {
            GlycolFamily::Ethylene => (EG_DENSITY, EG_KIN_VISC),
            GlycolFamily::Propylene => (PG_DENSITY, PG_KIN_VISC),
        }
    }
}

/// Interpolated glycol-mixture properties.
///
/// Returns (density [kg/m³], kinematic viscosity [m²/s], vapor pressure [Pa]).
pub fn properties_at(family: GlycolFamily, conc_pct: f64, t_c: f64) -> FluidResult<(f64, f64, f64)> {
    if !conc_pct.is_finite() || conc_pct < CONC_MIN_PCT || conc_pct > CONC_MAX_PCT {
        return Err(FluidError::ConcentrationOutOfRange {
            value: conc_pct,
            min: CONC_MIN_PCT,
            max: CONC_MAX_PCT,
        });
    }
    if !t_c.is_finite() || t_c < T_MIN_C || t_c > T_MAX_C {
        return Err(FluidError::TemperatureOutOfRange {
            t_c,
            min_c: T_MIN_C,
            max_c: T_MAX_C,
        });
    }

    let (rho_grid, nu_grid) = family.tables();

    let (ci, cw) = bracket(CONC_AXIS, conc_pct);
    let (ti, tw) = bracket(TEMP_AXIS, t_c);

    let rho = bilinear(rho_grid, ci, cw, ti, tw);
    let nu = bilinear(nu_grid, ci, cw, ti, tw) * 1e-6;

    // Raoult-style scaling of the water vapor pressure by water fraction.
    let (_, _, pv_water) = water::properties_at(t_c)?;
    let pv = pv_water * (1.0 - conc_pct / 100.0);

    Ok((rho, nu, pv))
}

/// Find the axis interval containing `v`: returns (lower index, weight).
fn bracket(axis: &[f64], v: f64) -> (usize, f64) {
    for i in 0..axis.len() - 1 {
        if v >= axis[i] && v <= axis[i + 1] {
            let span = axis[i + 1] - axis[i];
            let w = if span > 0.0 { (v - axis[i]) / span } else { 0.0 };
            return (i, w);
        }
    }
    // Bounds were validated by the caller; the last interval covers v == max.
    (axis.len() - 2, 1.0)
}

fn bilinear(grid: &[[f64; 6]; 4], ci: usize, cw: f64, ti: usize, tw: f64) -> f64 {
    let lo = grid[ci][ti] + tw * (grid[ci][ti + 1] - grid[ci][ti]);
    let hi = grid[ci + 1][ti] + tw * (grid[ci + 1][ti + 1] - grid[ci + 1][ti]);
    lo + cw * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_concentration_matches_water() {
        let (rho, nu, _) = properties_at(GlycolFamily::Ethylene, 0.0, 20.0).unwrap();
        assert_relative_eq!(rho, 998.2, epsilon = 1e-9);
        assert_relative_eq!(nu, 1.004e-6, epsilon = 1e-12);
    }

    #[test]
    fn concentration_raises_density_and_viscosity() {
        let (rho_0, nu_0, _) = properties_at(GlycolFamily::Ethylene, 0.0, 20.0).unwrap();
        let (rho_40, nu_40, _) = properties_at(GlycolFamily::Ethylene, 40.0, 20.0).unwrap();
        assert!(rho_40 > rho_0);
        assert!(nu_40 > nu_0);
    }

    #[test]
    fn propylene_more_viscous_than_ethylene() {
        let (_, nu_eg, _) = properties_at(GlycolFamily::Ethylene, 40.0, 20.0).unwrap();
        let (_, nu_pg, _) = properties_at(GlycolFamily::Propylene, 40.0, 20.0).unwrap();
        assert!(nu_pg > nu_eg);
    }

    #[test]
    fn vapor_pressure_depressed_by_glycol() {
        let (_, _, pv_water) = properties_at(GlycolFamily::Ethylene, 0.0, 20.0).unwrap();
        let (_, _, pv_mix) = properties_at(GlycolFamily::Ethylene, 40.0, 20.0).unwrap();
        assert!(pv_mix < pv_water);
    }

    #[test]
    fn rejects_out_of_range_concentration() {
        assert!(matches!(
            properties_at(GlycolFamily::Ethylene, 75.0, 20.0),
            Err(FluidError::ConcentrationOutOfRange { .. })
        ));
    }
}
