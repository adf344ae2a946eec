//! High-level solver interface.
//!
//! Three caller-distinguishable outcomes:
//! 1. `Err(SolverError)` for validation failures found before iterating.
//! 2. `Ok` with `converged: false` plus a diagnostic warning for Newton
//!    non-convergence or a pump that cannot meet its static head.
//! 3. `Ok` with `converged: true`, possibly carrying design-check warnings.

use std::time::Duration;

use nalgebra::DVector;
use pf_core::units::constants::G0_MPS2;
use pf_model::Project;
use pf_pumps::npsh_available;
use pf_results::{PumpResult, Severity, SolvedState, Warning, WarningCategory};
use tracing::info;

use crate::checks::run_checks;
use crate::compile::{compile, Compiled, LinkKind};
use crate::error::SolverResult;
use crate::extract::{absolute_pressure_pa, link_results, node_results};
use crate::init::initial_guess;
use crate::jacobian::finite_difference_jacobian;
use crate::newton::{newton_solve, NewtonConfig};
use crate::problem::SteadyProblem;
use crate::system_curve::{pump_static_head, system_curve};

const FD_EPSILON: f64 = 1e-7;

/// Relative mismatch between the converged pump flow and the Brent
/// cross-check before a warning is raised.
const CROSS_CHECK_REL_TOL: f64 = 0.02;

/// Solve a project for its steady state.
///
/// Accepts either unit system; US-customary projects are normalized to SI
/// first. The returned state is always SI.
pub fn solve(project: &Project) -> SolverResult<SolvedState> {
    let project = pf_model::to_si(project.clone());
    pf_model::validate_project(&project)?;

    let options = &project.solver_options;
    let fluid = pf_fluids::resolve(&project.fluid.to_spec())?;
    let compiled = compile(&project, &fluid, options)?;
    let problem = SteadyProblem::new(&compiled, &fluid);

    info!(
        nodes = compiled.nodes.len(),
        links = compiled.links.len(),
        unknowns = problem.n_unknowns(),
        "solving steady state"
    );

    let x0 = initial_guess(&problem, options.flow_range_factor);
    let config = NewtonConfig {
        max_iterations: options.max_iterations,
        tolerance: options.tolerance,
        deadline: options.max_time_s.map(Duration::from_secs_f64),
        ..NewtonConfig::default()
    };
    let residual = |x: &DVector<f64>| problem.residuals(x);
    let outcome = newton_solve(
        x0,
        residual,
        |x| finite_difference_jacobian(x, residual, FD_EPSILON),
        &config,
    )?;

    let heads = problem.heads(&outcome.x);
    let flows = problem.flows(&outcome.x);

    let mut state = SolvedState {
        converged: outcome.converged,
        iterations: outcome.iterations,
        timestamp: pf_results::now_timestamp(),
        residual: outcome.residual_norm,
        node_results: node_results(&problem, &heads, &flows),
        link_results: link_results(&problem, &flows)?,
        pump_results: Vec::new(),
        warnings: compiled.warnings.clone(),
    };

    if let Some(diagnostic) = outcome.diagnostic {
        state.warnings.push(Warning::new(
            WarningCategory::Convergence,
            Severity::Error,
            diagnostic,
        ));
        diagnose_pump_intersections(&compiled, &mut state)?;
        return Ok(state);
    }

    attach_pump_results(&compiled, &fluid, &heads, &flows, options, &mut state)?;
    run_checks(&mut state, &options.checks);

    Ok(state)
}

/// When Newton fails, check whether a pump simply cannot meet its static
/// head; that names the actual design problem instead of a generic
/// convergence message.
fn diagnose_pump_intersections(
    compiled: &Compiled,
    state: &mut SolvedState,
) -> SolverResult<()> {
    for &pi in &compiled.pumps {
        let LinkKind::Pump { curve, speed_ratio } = &compiled.links[pi].kind else {
            continue;
        };
        let h_static = pump_static_head(compiled, pi);
        let shutoff = curve.head_at(0.0, *speed_ratio)?.value;
        if shutoff < h_static {
            state.warnings.push(Warning::for_component(
                WarningCategory::NoIntersection,
                Severity::Error,
                compiled.links[pi].name.clone(),
                format!(
                    "pump shutoff head {shutoff:.2} m is below the static head {h_static:.2} m; \
                     the pump and system curves do not intersect"
                ),
            ));
        }
    }
    Ok(())
}

fn attach_pump_results(
    compiled: &Compiled,
    fluid: &pf_fluids::FluidProperties,
    heads: &[f64],
    flows: &[f64],
    options: &pf_model::SolverOptions,
    state: &mut SolvedState,
) -> SolverResult<()> {
    let rho = fluid.density.value;

    for &pi in &compiled.pumps {
        let LinkKind::Pump { curve, speed_ratio } = &compiled.links[pi].kind else {
            continue;
        };
        let component_id = compiled.links[pi].name.clone();
        let q = flows[pi];
        let op = curve.point_at(q, *speed_ratio, rho)?;

        if op.extrapolated {
            state.warnings.push(Warning::for_component(
                WarningCategory::CurveExtrapolation,
                Severity::Warning,
                component_id.clone(),
                format!(
                    "operating flow {q:.4e} m³/s is outside the sampled curve range"
                ),
            ));
        }

        // Suction conditions come straight from the converged upstream
        // node: its head already accounts for static lift and line losses.
        let link = &compiled.network.links()[pi];
        let up = link.upstream.index() as usize;
        let p_suction_abs = absolute_pressure_pa(fluid, heads[up], compiled.nodes[up].elevation_m);
        let v_suction = suction_velocity(compiled, pi, flows);
        let npsha = npsh_available(
            p_suction_abs,
            fluid.vapor_pressure.value,
            rho,
            v_suction * v_suction / (2.0 * G0_MPS2),
            0.0,
        )?;

        let report = system_curve(
            compiled,
            pi,
            curve,
            *speed_ratio,
            rho,
            q,
            op.head_m,
            options.system_curve_points,
        );
        match &report.cross_check {
            Ok(cross) => {
                let scale = q.abs().max(1e-12);
                if (cross.flow_m3_s - q).abs() / scale > CROSS_CHECK_REL_TOL {
                    state.warnings.push(Warning::for_component(
                        WarningCategory::Convergence,
                        Severity::Info,
                        component_id.clone(),
                        format!(
                            "system-curve intersection at {:.4e} m³/s differs from the \
                             converged flow {q:.4e} m³/s",
                            cross.flow_m3_s
                        ),
                    ));
                }
            }
            Err(_) => {
                state.warnings.push(Warning::for_component(
                    WarningCategory::NoIntersection,
                    Severity::Warning,
                    component_id.clone(),
                    "pump curve does not intersect the fitted system curve".to_string(),
                ));
            }
        }

        state.pump_results.push(PumpResult {
            component_id,
            flow_m3_s: q,
            head_m: op.head_m,
            npsh_available_m: npsha,
            npsh_required_m: op.npshr_m,
            efficiency_pct: op.efficiency_pct,
            power_w: op.shaft_power_w,
            system_curve: report.points,
        });
    }
    Ok(())
}

/// Velocity in the conveying link feeding the pump suction, for the
/// velocity-head term of NPSH available.
fn suction_velocity(compiled: &Compiled, pump_link_idx: usize, flows: &[f64]) -> f64 {
    let link = &compiled.network.links()[pump_link_idx];
    compiled
        .network
        .node_links(link.upstream)
        .iter()
        .filter_map(|&(link_id, _)| {
            let li = link_id.index() as usize;
            if li == pump_link_idx {
                return None;
            }
            let area = compiled.links[li].kind.area_m2()?;
            Some((flows[li] / area).abs())
        })
        .fold(0.0_f64, f64::max)
}
