//! Steady-state problem: unknown layout and residual assembly.
//!
//! Unknowns are `x = [H at unknown-head nodes..., Q per link...]`.
//! Residuals pair one equation with each unknown: a mass balance (or
//! boundary head relation) per unknown-head node, and an energy balance
//! per link.

use nalgebra::DVector;
use pf_core::units::constants::G0_MPS2;
use pf_core::NodeId;
use pf_fluids::FluidProperties;
use pf_pumps::Interpolant;
use rayon::prelude::*;

use crate::compile::{Compiled, LinkKind, NodeClass};
use crate::error::{SolverError, SolverResult};

/// Head drop per unit reverse flow through a pump [m / (m³/s)].
const PUMP_REVERSE_SLOPE: f64 = 1e8;

pub struct SteadyProblem<'a> {
    pub compiled: &'a Compiled,
    pub fluid: &'a FluidProperties,
    /// Slot in `x` for each node's head; `None` for fixed-head nodes.
    head_slots: Vec<Option<usize>>,
    pub n_heads: usize,
}

impl<'a> SteadyProblem<'a> {
    pub fn new(compiled: &'a Compiled, fluid: &'a FluidProperties) -> Self {
        let mut head_slots = Vec::with_capacity(compiled.nodes.len());
        let mut n_heads = 0;
        for node in &compiled.nodes {
            if node.class.is_fixed() {
                head_slots.push(None);
            } else {
                head_slots.push(Some(n_heads));
                n_heads += 1;
            }
        }
        Self {
            compiled,
            fluid,
            head_slots,
            n_heads,
        }
    }

    pub fn n_unknowns(&self) -> usize {
        self.n_heads + self.compiled.links.len()
    }

    pub fn flow_slot(&self, link_idx: usize) -> usize {
        self.n_heads + link_idx
    }

    pub fn head_slot(&self, node_idx: usize) -> Option<usize> {
        self.head_slots[node_idx]
    }

    /// Total head at every node for an iterate, fixed values filled in.
    pub fn heads(&self, x: &DVector<f64>) -> Vec<f64> {
        self.compiled
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| match (&node.class, self.head_slots[i]) {
                (NodeClass::FixedHead { head_m }, _) => *head_m,
                (_, Some(slot)) => x[slot],
                // Unreachable by construction of head_slots.
                (_, None) => node.elevation_m,
            })
            .collect()
    }

    pub fn flows(&self, x: &DVector<f64>) -> Vec<f64> {
        (0..self.compiled.links.len())
            .map(|i| x[self.flow_slot(i)])
            .collect()
    }

    /// Signed head change across a link at flow `q`: positive means the
    /// link removes head in the positive flow direction. Pumps return a
    /// negative value (head gain).
    pub fn link_head_drop(&self, link_idx: usize, q: f64) -> SolverResult<f64> {
        let nu = self.fluid.kinematic_viscosity.value;
        match &self.compiled.links[link_idx].kind {
            LinkKind::Pipe(segment) => {
                let loss = segment.head_loss(q.abs(), nu)?;
                Ok(q.signum() * loss.total_m)
            }
            LinkKind::Resistance { k, diameter_m } => {
                let area = std::f64::consts::PI * diameter_m * diameter_m / 4.0;
                let v = q / area;
                Ok(k * v * v.abs() / (2.0 * G0_MPS2))
            }
            LinkKind::Pump { curve, speed_ratio } => {
                if q >= 0.0 {
                    Ok(-curve.head_at(q, *speed_ratio)?.value)
                } else {
                    // Pumps do not pass reverse flow. A steep linear
                    // resistance below zero keeps any equilibrium at or
                    // above zero flow, continuous at q = 0.
                    let shutoff = curve.head_at(0.0, *speed_ratio)?.value;
                    Ok(-shutoff + PUMP_REVERSE_SLOPE * (-q))
                }
            }
        }
    }

    /// Net inflow into a node at the current flows (m³/s).
    pub fn net_inflow(&self, node_idx: usize, flows: &[f64]) -> f64 {
        let id = NodeId::from_index(node_idx as u32);
        self.compiled
            .network
            .node_links(id)
            .iter()
            .map(|&(link_id, incidence)| {
                let li = (link_id.index()) as usize;
                incidence.sign() * flows[li]
            })
            .sum()
    }

    /// Assemble the full residual vector at an iterate.
    pub fn residuals(&self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let heads = self.heads(x);
        let flows = self.flows(x);
        let network = &self.compiled.network;

        // Energy residual per link: H_up - H_dn - h_drop(Q). Evaluations
        // are independent, so they run in parallel.
        let link_residuals: Vec<f64> = (0..self.compiled.links.len())
            .into_par_iter()
            .map(|i| {
                let link = &network.links()[i];
                let h_up = heads[link.upstream.index() as usize];
                let h_dn = heads[link.downstream.index() as usize];
                Ok(h_up - h_dn - self.link_head_drop(i, flows[i])?)
            })
            .collect::<SolverResult<Vec<f64>>>()?;

        let mut r = DVector::zeros(self.n_unknowns());

        for (i, node) in self.compiled.nodes.iter().enumerate() {
            let Some(slot) = self.head_slots[i] else {
                continue;
            };
            let inflow = self.net_inflow(i, &flows);
            r[slot] = match &node.class {
                NodeClass::Free { demand_m3_s } => inflow - demand_m3_s,
                NodeClass::Emitter { coeff } => {
                    let pressure_head = (heads[i] - node.elevation_m).max(0.0);
                    inflow - coeff * pressure_head.sqrt()
                }
                NodeClass::ReferenceCurve { head_m } => {
                    // The boundary absorbs the net inflow; its head tracks
                    // the withdrawn flow.
                    heads[i] - head_m.value_at(-inflow)
                }
                NodeClass::FixedHead { .. } => {
                    return Err(SolverError::Numeric {
                        what: format!("fixed node {} has an unknown slot", node.name),
                    })
                }
            };
        }

        for (i, res) in link_residuals.into_iter().enumerate() {
            r[self.flow_slot(i)] = res;
        }

        Ok(r)
    }
}
