//! System resistance curve through a pump's operating point.
//!
//! The reported curve is the quadratic `h(Q) = h_static + r·Q²` anchored at
//! the converged operating point. Static head comes from the nearest
//! fixed-grade boundaries on the suction and discharge sides of the pump;
//! the resistance coefficient absorbs everything else. A Brent intersection
//! of the (affinity-scaled) pump spline against this quadratic cross-checks
//! the converged flow.

use pf_core::NodeId;
use pf_pumps::{Interpolant, OperatingPoint, PumpCurve, PumpError};
use pf_results::SystemCurvePoint;

use crate::compile::{Compiled, NodeClass};

/// Quadratic system head relation, valid for non-negative flow.
#[derive(Debug, Clone, Copy)]
pub struct QuadraticSystem {
    pub h_static_m: f64,
    /// Resistance coefficient [m / (m³/s)²].
    pub resistance: f64,
}

impl QuadraticSystem {
    pub fn head_at(&self, q: f64) -> f64 {
        self.h_static_m + self.resistance * q * q
    }
}

impl Interpolant for QuadraticSystem {
    fn value_at(&self, x: f64) -> f64 {
        self.head_at(x)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }
}

/// Nearest fixed-grade head reachable from `start`, never crossing
/// `blocked_link`. `None` when the side has no fixed boundary.
fn nearest_fixed_head(compiled: &Compiled, start: NodeId, blocked_link: usize) -> Option<f64> {
    let network = &compiled.network;
    let n = network.nodes().len();
    let mut visited = vec![false; n];
    let mut queue = std::collections::VecDeque::new();
    visited[start.index() as usize] = true;
    queue.push_back(start);

    while let Some(id) = queue.pop_front() {
        let idx = id.index() as usize;
        if let NodeClass::FixedHead { head_m } = &compiled.nodes[idx].class {
            return Some(*head_m);
        }
        for &(link_id, _) in network.node_links(id) {
            if link_id.index() as usize == blocked_link {
                continue;
            }
            if let Some(next) = network.opposite(link_id, id) {
                let j = next.index() as usize;
                if !visited[j] {
                    visited[j] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    None
}

/// Static head the pump works against: discharge-side boundary head minus
/// suction-side boundary head. Sides without a fixed boundary contribute
/// nothing.
pub fn pump_static_head(compiled: &Compiled, pump_link_idx: usize) -> f64 {
    let link = &compiled.network.links()[pump_link_idx];
    let suction = nearest_fixed_head(compiled, link.upstream, pump_link_idx);
    let discharge = nearest_fixed_head(compiled, link.downstream, pump_link_idx);
    match (suction, discharge) {
        (Some(s), Some(d)) => d - s,
        _ => 0.0,
    }
}

pub struct SystemCurveReport {
    pub points: Vec<SystemCurvePoint>,
    pub system: QuadraticSystem,
    /// Brent intersection of pump curve and quadratic; `Err` when the
    /// curves do not cross in the pump's flow range.
    pub cross_check: Result<OperatingPoint, PumpError>,
}

/// Build the system curve anchored at a converged operating point and
/// cross-check it against the pump curve.
pub fn system_curve(
    compiled: &Compiled,
    pump_link_idx: usize,
    curve: &PumpCurve,
    speed_ratio: f64,
    rho_kg_m3: f64,
    q_op: f64,
    h_op: f64,
    n_points: u32,
) -> SystemCurveReport {
    let h_static = pump_static_head(compiled, pump_link_idx);

    // Anchor: h_op = h_static + r·q_op². Zero or reverse operating flow
    // gives a flat curve; a negative anchor gap clamps to pure static.
    let resistance = if q_op > 0.0 {
        ((h_op - h_static) / (q_op * q_op)).max(0.0)
    } else {
        0.0
    };
    let system = QuadraticSystem {
        h_static_m: h_static,
        resistance,
    };

    let q_max = if q_op > 0.0 {
        1.25 * q_op
    } else {
        curve.flow_domain(speed_ratio).1
    };
    let n = n_points.max(20);
    let points = (0..n)
        .map(|i| {
            let q = q_max * i as f64 / (n - 1) as f64;
            SystemCurvePoint {
                flow_m3_s: q,
                head_m: system.head_at(q),
            }
        })
        .collect();

    let cross_check = curve.operating_point(&system, speed_ratio, rho_kg_m3);

    SystemCurveReport {
        points,
        system,
        cross_check,
    }
}
