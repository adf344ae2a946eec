//! Converged-state extraction: solver vector to result records.

use pf_core::units::constants::{G0_MPS2, P_ATM_PA};
use pf_core::NodeId;
use pf_fluids::FluidProperties;
use pf_hydraulics::{friction_factor, reynolds, FlowRegime};
use pf_results::{LinkResult, NodeResult};

use crate::compile::{Compiled, LinkKind};
use crate::error::SolverResult;
use crate::problem::SteadyProblem;

/// Per-link results. Pump links are reported through `PumpResult` instead,
/// so they are skipped here.
pub fn link_results(
    problem: &SteadyProblem<'_>,
    flows: &[f64],
) -> SolverResult<Vec<LinkResult>> {
    let nu = problem.fluid.kinematic_viscosity.value;
    let mut results = Vec::with_capacity(problem.compiled.links.len());

    for (i, link) in problem.compiled.links.iter().enumerate() {
        let q = flows[i];
        match &link.kind {
            LinkKind::Pipe(segment) => {
                let loss = segment.head_loss(q.abs(), nu)?;
                let v = if segment.area_m2() > 0.0 {
                    q / segment.area_m2()
                } else {
                    0.0
                };
                results.push(LinkResult {
                    link_id: link.name.clone(),
                    flow_m3_s: q,
                    velocity_m_s: v,
                    head_loss_m: loss.total_m,
                    friction_loss_m: loss.friction_m,
                    minor_loss_m: loss.minor_m,
                    reynolds: loss.reynolds,
                    friction_factor: (loss.regime != FlowRegime::Still)
                        .then_some(loss.friction_factor),
                    regime: loss.regime,
                });
            }
            LinkKind::Resistance { k, diameter_m } => {
                let area = std::f64::consts::PI * diameter_m * diameter_m / 4.0;
                let v = q / area;
                let re = reynolds(v, *diameter_m, nu);
                let regime = friction_factor(re, 0.0)?.regime;
                let head = k * v * v / (2.0 * G0_MPS2);
                results.push(LinkResult {
                    link_id: link.name.clone(),
                    flow_m3_s: q,
                    velocity_m_s: v,
                    head_loss_m: head,
                    friction_loss_m: 0.0,
                    minor_loss_m: head,
                    reynolds: re,
                    // Element K, not a pipe friction factor.
                    friction_factor: None,
                    regime,
                });
            }
            LinkKind::Pump { .. } => {}
        }
    }
    Ok(results)
}

/// Per-node results. EGL adds the velocity head of the fastest incident
/// conveying link; pump links carry no velocity of their own.
pub fn node_results(
    problem: &SteadyProblem<'_>,
    heads: &[f64],
    flows: &[f64],
) -> Vec<NodeResult> {
    let rho_g = problem.fluid.density.value * G0_MPS2;
    let compiled = problem.compiled;

    compiled
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let head = heads[i];
            let id = NodeId::from_index(i as u32);
            let v_max = compiled
                .network
                .node_links(id)
                .iter()
                .filter_map(|&(link_id, _)| {
                    let li = link_id.index() as usize;
                    let area = compiled.links[li].kind.area_m2()?;
                    Some((flows[li] / area).abs())
                })
                .fold(0.0_f64, f64::max);

            NodeResult {
                node_id: node.name.clone(),
                pressure_pa: rho_g * (head - node.elevation_m),
                hgl_m: head,
                egl_m: head + v_max * v_max / (2.0 * G0_MPS2),
            }
        })
        .collect()
}

/// Absolute pressure at a node, for NPSH accounting.
pub fn absolute_pressure_pa(fluid: &FluidProperties, head_m: f64, elevation_m: f64) -> f64 {
    fluid.density.value * G0_MPS2 * (head_m - elevation_m) + P_ATM_PA
}
