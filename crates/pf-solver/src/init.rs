//! Deterministic initial guess.
//!
//! Heads seed at the mean of the fixed-grade boundary heads (falling back
//! to node elevation when a part of the network has only curve boundaries).
//! Flows seed at a uniform small positive value sized by the flow-range
//! option. No randomness: the same model always starts from the same
//! iterate, so iteration counts are reproducible.

use nalgebra::DVector;
use pf_pumps::Interpolant;

use crate::compile::NodeClass;
use crate::problem::SteadyProblem;

/// Fraction of the flow range used as the uniform link flow seed.
const FLOW_SEED_FRACTION: f64 = 0.05;

pub fn initial_guess(problem: &SteadyProblem<'_>, flow_range_factor: f64) -> DVector<f64> {
    let compiled = problem.compiled;

    let mut head_sum = 0.0;
    let mut head_count = 0usize;
    for node in &compiled.nodes {
        match &node.class {
            NodeClass::FixedHead { head_m } => {
                head_sum += head_m;
                head_count += 1;
            }
            NodeClass::ReferenceCurve { head_m } => {
                head_sum += head_m.value_at(0.0);
                head_count += 1;
            }
            _ => {}
        }
    }
    let mean_head = if head_count > 0 {
        head_sum / head_count as f64
    } else {
        0.0
    };

    let mut x = DVector::zeros(problem.n_unknowns());
    for (i, node) in compiled.nodes.iter().enumerate() {
        if let Some(slot) = problem.head_slot(i) {
            x[slot] = if head_count > 0 {
                mean_head
            } else {
                node.elevation_m
            };
        }
    }

    let q_seed = FLOW_SEED_FRACTION * flow_range_factor;
    for i in 0..compiled.links.len() {
        x[problem.flow_slot(i)] = q_seed;
    }

    x
}
