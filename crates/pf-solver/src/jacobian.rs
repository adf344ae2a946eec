//! Finite difference Jacobian computation.

use nalgebra::{DMatrix, DVector};

use crate::error::SolverResult;

/// Compute the Jacobian by forward finite differences.
///
/// For each column j, perturbs x[j] by a scaled epsilon and evaluates
/// (f(x + e) - f(x)) / e.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let f_perturbed = f(&x_perturbed)?;
        let df = (f_perturbed - &f_x) / dx;

        for i in 0..m {
            jac[(i, j)] = df[i];
        }
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jacobian_of_linear_map() {
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![2.0 * x[0] + x[1], -x[0]]))
        };
        let x = DVector::from_vec(vec![3.0, 1.0]);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();
        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
        assert!((jac[(0, 1)] - 1.0).abs() < 1e-5);
        assert!((jac[(1, 0)] + 1.0).abs() < 1e-5);
        assert!(jac[(1, 1)].abs() < 1e-5);
    }

    #[test]
    fn jacobian_of_quadratic() {
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0]))
        };
        let x = DVector::from_element(1, 3.0);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();
        assert!((jac[(0, 0)] - 6.0).abs() < 1e-5);
    }
}
