//! Damped Newton iteration with backtracking line search.
//!
//! Non-convergence is an outcome, not an error: a run that exhausts its
//! iteration budget, stagnates, or hits a singular Jacobian returns
//! `converged: false` with a diagnostic string. Errors are reserved for
//! residual evaluations that themselves fail.

use std::time::{Duration, Instant};

use nalgebra::DVector;
use tracing::{debug, info};

use crate::error::SolverResult;

pub struct NewtonConfig {
    pub max_iterations: u32,
    /// Absolute tolerance on the residual norm.
    pub tolerance: f64,
    /// Wall-clock budget, checked once per iteration.
    pub deadline: Option<Duration>,
    /// Line search backtracking factor.
    pub line_search_beta: f64,
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-3,
            deadline: None,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

pub struct NewtonOutcome {
    pub x: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: u32,
    pub converged: bool,
    /// Populated when `converged` is false.
    pub diagnostic: Option<String>,
}

pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonOutcome>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<nalgebra::DMatrix<f64>>,
{
    let start = Instant::now();
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();

    for iter in 0..config.max_iterations {
        if r_norm < config.tolerance {
            info!(iterations = iter, residual = r_norm, "converged");
            return Ok(NewtonOutcome {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
                diagnostic: None,
            });
        }

        if let Some(deadline) = config.deadline {
            if start.elapsed() > deadline {
                return Ok(not_converged(
                    x,
                    r_norm,
                    iter,
                    format!("time budget exhausted after {iter} iterations"),
                ));
            }
        }

        let jac = jacobian_fn(&x)?;
        let Some(dx) = jac.lu().solve(&(-&r)) else {
            return Ok(not_converged(
                x,
                r_norm,
                iter,
                format!("singular Jacobian at iteration {iter}"),
            ));
        };

        // Backtrack until the residual norm drops.
        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        let mut r_new = residual_fn(&x_new)?;
        let mut r_new_norm = r_new.norm();
        for _ in 0..config.max_line_search_iters {
            if r_new_norm < r_norm {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            r_new_norm = r_new.norm();
        }

        if r_new_norm >= r_norm && alpha < 1e-9 {
            return Ok(not_converged(
                x,
                r_norm,
                iter,
                format!("line search stagnated at iteration {iter}, residual {r_norm:.3e}"),
            ));
        }

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
        debug!(iteration = iter + 1, residual = r_norm, alpha, "newton step");
    }

    if r_norm < config.tolerance {
        info!(
            iterations = config.max_iterations,
            residual = r_norm,
            "converged"
        );
        return Ok(NewtonOutcome {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
            converged: true,
            diagnostic: None,
        });
    }

    Ok(not_converged(
        x,
        r_norm,
        config.max_iterations,
        format!(
            "did not converge within {} iterations, residual {r_norm:.3e}",
            config.max_iterations
        ),
    ))
}

fn not_converged(x: DVector<f64>, r_norm: f64, iterations: u32, what: String) -> NewtonOutcome {
    info!(iterations, residual = r_norm, diagnostic = %what, "not converged");
    NewtonOutcome {
        x,
        residual_norm: r_norm,
        iterations,
        converged: false,
        diagnostic: Some(what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jacobian::finite_difference_jacobian;

    #[test]
    fn solves_quadratic() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let config = NewtonConfig {
            tolerance: 1e-9,
            ..NewtonConfig::default()
        };
        let outcome = newton_solve(
            DVector::from_element(1, 3.0),
            residual,
            |x| finite_difference_jacobian(x, residual, 1e-7),
            &config,
        )
        .unwrap();
        assert!(outcome.converged);
        assert!((outcome.x[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn reports_non_convergence_as_outcome() {
        // No real root: x² + 1 = 0.
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let config = NewtonConfig {
            max_iterations: 15,
            tolerance: 1e-9,
            ..NewtonConfig::default()
        };
        let outcome = newton_solve(
            DVector::from_element(1, 3.0),
            residual,
            |x| finite_difference_jacobian(x, residual, 1e-7),
            &config,
        )
        .unwrap();
        assert!(!outcome.converged);
        assert!(outcome.diagnostic.is_some());
    }

    #[test]
    fn deadline_stops_iteration() {
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let config = NewtonConfig {
            max_iterations: 10_000,
            tolerance: 1e-12,
            deadline: Some(Duration::from_millis(20)),
            ..NewtonConfig::default()
        };
        let outcome = newton_solve(
            DVector::from_element(1, 3.0),
            residual,
            |x| finite_difference_jacobian(x, residual, 1e-7),
            &config,
        )
        .unwrap();
        assert!(!outcome.converged);
        assert!(outcome.diagnostic.unwrap().contains("time budget"));
    }
}
